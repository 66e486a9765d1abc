//! Color utilities: parsing, interpolation, palette sampling.
//!
//! Colors are `glam::Vec3` RGB triples with components in `0.0..=1.0`.
//! Every color that reaches the renderer must be displayable, so parsing
//! and sanitizing never fail - malformed input resolves to [`NEUTRAL`].

use glam::Vec3;

/// Substitute for malformed or missing colors: a soft blue-gray that reads
/// on both light and dark glass backgrounds.
pub const NEUTRAL: Vec3 = Vec3::new(0.62, 0.64, 0.70);

/// Linear interpolation with exact endpoints.
///
/// `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b` componentwise, with no
/// floating-point drift at either end. `t` outside `0..=1` extrapolates.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Clamp a color into displayable range, replacing non-finite components.
///
/// A color with any NaN or infinite component resolves to [`NEUTRAL`] as a
/// whole; finite out-of-range components are clamped per channel.
pub fn sanitize(c: Vec3) -> Vec3 {
    if !c.is_finite() {
        return NEUTRAL;
    }
    c.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Parse a `#rgb` or `#rrggbb` hex color. Leading `#` is optional.
pub fn parse_hex(s: &str) -> Option<Vec3> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    let channel = |h: &str| u8::from_str_radix(h, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        3 => {
            let mut it = hex.chars();
            let mut next = || {
                let c = it.next()?;
                let v = c.to_digit(16)? as f32;
                // "a" expands to "aa"
                Some((v * 16.0 + v) / 255.0)
            };
            Some(Vec3::new(next()?, next()?, next()?))
        }
        6 => Some(Vec3::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Resolve a hex string to a concrete color, falling back to [`NEUTRAL`].
pub fn resolve_hex(s: &str) -> Vec3 {
    match parse_hex(s) {
        Some(c) => c,
        None => {
            log::warn!("malformed color {:?}, substituting neutral", s);
            NEUTRAL
        }
    }
}

/// Convert HSV to RGB.
///
/// * `h` - hue 0.0 to 1.0 (wraps)
/// * `s` - saturation 0.0 (gray) to 1.0 (vivid)
/// * `v` - value 0.0 (black) to 1.0 (bright)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// Sample a five-stop gradient at `t` in `0..=1`.
///
/// Stops are evenly spaced; between stops the color is linearly
/// interpolated with [`lerp`].
pub fn sample_stops(stops: &[Vec3; 5], t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * 4.0;
    let i = (scaled as usize).min(3);
    lerp(stops[i], stops[i + 1], scaled - i as f32)
}
