//! Rendering onto an abstract 2D surface.
//!
//! The engine never talks to a concrete graphics API. [`Surface`] is the
//! minimal contract - clear, fills, strokes, a radial gradient, and pixel
//! dimensions - so the same simulation can target a raster buffer, SVG,
//! or a GPU-backed canvas without change. [`RasterSurface`](crate::raster::RasterSurface)
//! is the built-in software implementation.
//!
//! [`Renderer::draw`] runs strictly after a tick's mutations complete and
//! holds the only reference to the surface for the duration of the call.

use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::color;
use crate::config::SimulationConfig;
use crate::connections::ConnectionGraph;
use crate::environment::{AtmosphericEvent, AtmosphericKind, Environment};
use crate::particle::{Particle, ParticleKind};

/// Abstract 2D drawing surface.
///
/// Implementations own their pixels; the engine only issues primitive
/// calls. All colors are RGB in `0..=1` with a separate alpha.
pub trait Surface {
    /// Surface dimensions in pixels. A non-positive dimension makes every
    /// draw a no-op.
    fn size(&self) -> (f32, f32);
    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Vec3);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32);
    /// Filled ellipse with half-axes `radii`, rotated by `rotation` radians.
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Vec3, alpha: f32);
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec3, alpha: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec3, alpha: f32);
    /// Radial gradient: `inner_alpha` at the center fading to
    /// `outer_alpha` at the rim, constant color.
    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Vec3,
        inner_alpha: f32,
        outer_alpha: f32,
    );
    /// Translucent full-surface tint.
    fn fill_tint(&mut self, color: Vec3, alpha: f32);
}

/// Rendering primitive for a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Pick per particle kind; see [`Shape::for_kind`].
    #[default]
    Auto,
    Circle,
    Square,
    Triangle,
    /// Elongated ellipse oriented by the particle rotation.
    Leaf,
    /// Five-point star.
    Star,
    /// Six radial arms.
    Snowflake,
    /// Line along the velocity vector (rain).
    Streak,
}

impl Shape {
    /// Default primitive for a particle kind.
    pub fn for_kind(kind: ParticleKind) -> Shape {
        match kind {
            ParticleKind::Leaf => Shape::Leaf,
            ParticleKind::Snow => Shape::Snowflake,
            ParticleKind::Ice => Shape::Star,
            ParticleKind::Rain => Shape::Streak,
            ParticleKind::Sand => Shape::Square,
            ParticleKind::Insect => Shape::Triangle,
            _ => Shape::Circle,
        }
    }
}

const RAINBOW_BANDS: [Vec3; 7] = [
    Vec3::new(0.90, 0.15, 0.15),
    Vec3::new(0.95, 0.55, 0.15),
    Vec3::new(0.95, 0.90, 0.20),
    Vec3::new(0.25, 0.75, 0.30),
    Vec3::new(0.20, 0.45, 0.90),
    Vec3::new(0.30, 0.20, 0.70),
    Vec3::new(0.55, 0.25, 0.75),
];

/// Draws particles, connection edges, and atmospheric overlays.
///
/// Stateless: everything it needs arrives per call, so a renderer can be
/// shared across engines.
#[derive(Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. A surface without area is a no-op, never an error.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        config: &SimulationConfig,
        particles: &[Particle],
        graph: &ConnectionGraph,
        env: &Environment,
        events: &[AtmosphericEvent],
    ) {
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let palette = env.palette();
        surface.clear(color::sanitize(env.day_night_modulate(palette.sky[0])));
        surface.fill_tint(color::sanitize(env.day_night_modulate(palette.sky[1])), 0.25);

        // Humid air reads as a soft wash over the whole scene.
        if env.humidity > 0.7 {
            surface.fill_tint(color::sanitize(palette.sky[1]), (env.humidity - 0.7) * 0.5);
        }

        self.draw_edges(surface, config, particles, graph, palette.accent);
        for p in particles {
            self.draw_particle(surface, config, p);
        }
        for event in events {
            self.draw_event(surface, event, width, height);
        }
    }

    fn draw_edges<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        config: &SimulationConfig,
        particles: &[Particle],
        graph: &ConnectionGraph,
        accent: Vec3,
    ) {
        if config.connection_distance <= 0.0 {
            return;
        }
        let accent = color::sanitize(accent);
        for edge in graph.edges() {
            let alpha = ConnectionGraph::edge_opacity(
                edge,
                config.connection_distance,
                config.link_opacity,
            );
            if alpha <= 0.0 {
                continue;
            }
            let (Some(a), Some(b)) = (particles.get(edge.a), particles.get(edge.b)) else {
                continue;
            };
            surface.stroke_line(a.position, b.position, 1.0, accent, alpha);
        }
    }

    fn draw_particle<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        config: &SimulationConfig,
        p: &Particle,
    ) {
        let color = color::sanitize(p.color);
        let alpha = p.opacity.clamp(0.0, 1.0);

        if p.kind.is_soft() {
            surface.fill_radial_gradient(p.position, p.size * 4.0, color, alpha * 0.5, 0.0);
            return;
        }
        if config.glow {
            surface.fill_radial_gradient(p.position, p.size * 3.0, color, alpha * 0.25, 0.0);
        }

        let shape = match config.shape {
            Shape::Auto => Shape::for_kind(p.kind),
            explicit => explicit,
        };
        match shape {
            Shape::Auto | Shape::Circle => {
                surface.fill_circle(p.position, p.size, color, alpha);
            }
            Shape::Square => {
                surface.fill_polygon(&rotated_ngon(p.position, p.size, 4, p.rotation), color, alpha);
            }
            Shape::Triangle => {
                surface.fill_polygon(&rotated_ngon(p.position, p.size, 3, p.rotation), color, alpha);
            }
            Shape::Leaf => {
                surface.fill_ellipse(
                    p.position,
                    Vec2::new(p.size, p.size * 0.55),
                    p.rotation,
                    color,
                    alpha,
                );
            }
            Shape::Star => {
                surface.fill_polygon(&star_points(p.position, p.size, p.rotation), color, alpha);
            }
            Shape::Snowflake => {
                for arm in 0..3 {
                    let angle = p.rotation + arm as f32 * std::f32::consts::PI / 3.0;
                    let dir = Vec2::new(angle.cos(), angle.sin()) * p.size;
                    surface.stroke_line(p.position - dir, p.position + dir, 1.0, color, alpha);
                }
            }
            Shape::Streak => {
                let tail = if p.velocity.length_squared() > 1e-4 {
                    p.velocity.normalize() * p.size * 4.0
                } else {
                    Vec2::new(0.0, p.size * 4.0)
                };
                surface.stroke_line(p.position - tail, p.position, 1.0, color, alpha * 0.8);
            }
        }
    }

    fn draw_event<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        event: &AtmosphericEvent,
        width: f32,
        height: f32,
    ) {
        match event.kind {
            AtmosphericKind::Lightning => {
                surface.fill_tint(Vec3::ONE, 0.08 * event.intensity);
                let bolt = Vec3::new(0.98, 0.97, 0.85);
                let mut from = Vec2::new(event.position.x, 0.0);
                let segments = 7;
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    // Deterministic jag from the strike position, no RNG in
                    // the draw path.
                    let jag = ((event.position.x * 0.37 + i as f32 * 2.1).sin()) * width * 0.02;
                    let to = Vec2::new(event.position.x + jag, t * height * 0.6);
                    surface.stroke_line(from, to, 2.0, bolt, event.intensity);
                    from = to;
                }
            }
            AtmosphericKind::Rainbow => {
                let center = Vec2::new(event.position.x, height * 1.05);
                let base_radius = width.min(height) * 0.55;
                for (band, &band_color) in RAINBOW_BANDS.iter().enumerate() {
                    let radius = base_radius + band as f32 * 5.0;
                    self.stroke_arc(surface, center, radius, band_color, 0.25 * event.intensity);
                }
            }
            AtmosphericKind::Mist => {
                let radii = Vec2::new(width * 0.45, height * 0.12);
                surface.fill_ellipse(
                    event.position,
                    radii,
                    0.0,
                    Vec3::new(0.92, 0.93, 0.95),
                    0.18 * event.intensity,
                );
            }
        }
    }

    /// Upper semicircle approximated with short line segments.
    fn stroke_arc<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        center: Vec2,
        radius: f32,
        color: Vec3,
        alpha: f32,
    ) {
        let steps = 48;
        let mut last: Option<Vec2> = None;
        for i in 0..=steps {
            let angle = std::f32::consts::PI * (1.0 + i as f32 / steps as f32);
            let point = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            if let Some(prev) = last {
                surface.stroke_line(prev, point, 3.0, color, alpha);
            }
            last = Some(point);
        }
    }
}

/// Regular n-gon vertices around `center`, first vertex at `rotation`.
fn rotated_ngon(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = rotation + i as f32 * std::f32::consts::TAU / sides as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Five-point star: alternating outer/inner vertices.
fn star_points(center: Vec2, radius: f32, rotation: f32) -> Vec<Vec2> {
    (0..10)
        .map(|i| {
            let angle = rotation + i as f32 * std::f32::consts::TAU / 10.0;
            let r = if i % 2 == 0 { radius } else { radius * 0.45 };
            center + Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}
