//! Software raster backend.
//!
//! [`RasterSurface`] implements [`Surface`] over a plain RGBA8 buffer with
//! per-pixel coverage tests. It exists for headless hosts and tests, and
//! can export frames as PNG.

use glam::{Vec2, Vec3};

use crate::error::ExportError;
use crate::render::Surface;

pub struct RasterSurface {
    width: u32,
    height: u32,
    /// RGBA8, row-major.
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel at integer coordinates, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Export the current frame as a PNG file.
    pub fn save_png(&self, path: &std::path::Path) -> Result<(), ExportError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(ExportError::EmptySurface)?;
        img.save(path)?;
        Ok(())
    }

    /// Source-over blend of one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Vec3, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let src = [color.x, color.y, color.z];
        for c in 0..3 {
            let dst = self.pixels[i + c] as f32 / 255.0;
            let out = src[c] * alpha + dst * (1.0 - alpha);
            self.pixels[i + c] = (out * 255.0).round() as u8;
        }
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        self.pixels[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Iterate a clamped bounding box.
    fn bbox(&self, min: Vec2, max: Vec2) -> (i64, i64, i64, i64) {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        (x0, y0, x1, y1)
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn clear(&mut self, color: Vec3) {
        let rgba = [
            (color.x.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.y.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.z.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ];
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.bbox(center - Vec2::splat(radius), center + Vec2::splat(radius));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance(center) <= radius {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Vec3, alpha: f32) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let extent = radii.x.max(radii.y);
        let (x0, y0, x1, y1) = self.bbox(center - Vec2::splat(extent), center + Vec2::splat(extent));
        let (sin, cos) = rotation.sin_cos();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                // Rotate into the ellipse frame.
                let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
                let n = (local.x / radii.x).powi(2) + (local.y / radii.y).powi(2);
                if n <= 1.0 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Vec3, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        let mut min = points[0];
        let mut max = points[0];
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        let (x0, y0, x1, y1) = self.bbox(min, max);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if point_in_polygon(p, points) {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec3, alpha: f32) {
        let half = (width * 0.5).max(0.5);
        let pad = Vec2::splat(half + 1.0);
        let (x0, y0, x1, y1) = self.bbox(from.min(to) - pad, from.max(to) + pad);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(p, from, to) <= half {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Vec3,
        inner_alpha: f32,
        outer_alpha: f32,
    ) {
        if radius <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.bbox(center - Vec2::splat(radius), center + Vec2::splat(radius));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = p.distance(center) / radius;
                if t <= 1.0 {
                    let alpha = inner_alpha * (1.0 - t) + outer_alpha * t;
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn fill_tint(&mut self, color: Vec3, alpha: f32) {
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                self.blend(x, y, color, alpha);
            }
        }
    }
}

/// Even-odd crossing test.
fn point_in_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
