//! Simulation configuration.
//!
//! [`SimulationConfig`] is the single option surface consumed at engine
//! construction (and on update). It is deserializable so hosts can ship
//! presets as JSON:
//!
//! ```ignore
//! let config: SimulationConfig = serde_json::from_str(r#"{
//!     "count": 120,
//!     "behavior": "swarm",
//!     "connection_distance": 110.0,
//!     "color_scheme": "gradient",
//!     "colors": ["#8ec5fc", "#e0c3fc"]
//! }"#)?;
//! ```
//!
//! Every field has a default, so `SimulationConfig::default()` (or `{}` in
//! JSON) is a complete, runnable configuration. Non-positive values are
//! treated as "off" or clamped at the point of use - they never error.

use serde::Deserialize;

use crate::behavior::{Behavior, BoundaryPolicy};
use crate::render::Shape;

/// How particle colors are sampled at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// All particles use the first configured color.
    #[default]
    Monochrome,
    /// Random hue per particle, full saturation.
    Rainbow,
    /// Each particle samples a random point on the gradient between the
    /// first two configured colors.
    Gradient,
    /// Each particle picks a random color from the configured list.
    Custom,
}

/// Engine configuration. See the module docs for the JSON shape.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Target live population before the density multiplier.
    pub count: usize,
    /// Particle size sampling range, surface pixels.
    pub min_size: f32,
    pub max_size: f32,
    /// Speed scale: initial velocities are sampled from
    /// `0.25 * speed ..= speed` pixels per tick.
    pub speed: f32,
    /// Edge threshold for the connection graph. `<= 0` disables links.
    pub connection_distance: f32,
    /// Enable the pointer repulsion force.
    pub mouse_interaction: bool,
    /// Pointer force radius, surface pixels.
    pub mouse_radius: f32,
    pub color_scheme: ColorScheme,
    /// Hex color strings consumed by the color scheme. Malformed entries
    /// resolve to the neutral default rather than erroring.
    pub colors: Vec<String>,
    /// Rendering primitive. `Auto` picks per particle kind.
    pub shape: Shape,
    /// Force/motion strategy applied to every particle.
    pub behavior: Behavior,
    /// Boundary override. `None` uses the behavior's default policy.
    pub boundary: Option<BoundaryPolicy>,
    /// Continuous spawn rate in particles per second on top of the target
    /// population, capped at twice the target. `0` disables.
    pub emit_rate: f32,
    /// Particle time-to-live in ticks. `None` = unbounded.
    pub lifetime: Option<f32>,
    /// Population multiplier applied to `count`.
    pub density: f32,
    /// Out-of-bounds margin before a particle is considered gone.
    pub margin: f32,
    /// Draw a blurred halo behind each particle.
    pub glow: bool,
    /// Base opacity for connection edges.
    pub link_opacity: f32,
    /// Honor the host's reduced-motion preference: render one static
    /// frame and never animate.
    pub respect_motion_preference: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: 80,
            min_size: 1.0,
            max_size: 4.0,
            speed: 1.0,
            connection_distance: 0.0,
            mouse_interaction: false,
            mouse_radius: 100.0,
            color_scheme: ColorScheme::Monochrome,
            colors: Vec::new(),
            shape: Shape::Auto,
            behavior: Behavior::Float,
            boundary: None,
            emit_rate: 0.0,
            lifetime: None,
            density: 1.0,
            margin: 50.0,
            glow: false,
            link_opacity: 0.35,
            respect_motion_preference: true,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target particle count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the particle size sampling range.
    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set the speed scale.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Enable connection links below the given distance.
    pub fn with_connections(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Enable pointer repulsion within the given radius.
    pub fn with_mouse_interaction(mut self, radius: f32) -> Self {
        self.mouse_interaction = true;
        self.mouse_radius = radius;
        self
    }

    /// Set the color scheme and its source colors.
    pub fn with_colors(mut self, scheme: ColorScheme, colors: Vec<String>) -> Self {
        self.color_scheme = scheme;
        self.colors = colors;
        self
    }

    /// Set the behavior strategy.
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Override the per-behavior boundary policy.
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Set continuous emission in particles per second.
    pub fn with_emit_rate(mut self, rate: f32) -> Self {
        self.emit_rate = rate;
        self
    }

    /// Set particle time-to-live in ticks.
    pub fn with_lifetime(mut self, ticks: f32) -> Self {
        self.lifetime = Some(ticks);
        self
    }

    /// Set the population density multiplier.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Target live population: `count * density`, never negative.
    pub fn target_count(&self) -> usize {
        if self.count == 0 || self.density <= 0.0 {
            return 0;
        }
        ((self.count as f32) * self.density).round().max(0.0) as usize
    }

    /// Hard population ceiling bounding memory: twice the target.
    pub fn population_ceiling(&self) -> usize {
        self.target_count() * 2
    }

    /// Size sampling range with min/max ordered.
    pub fn size_range(&self) -> (f32, f32) {
        let lo = self.min_size.max(0.1);
        let hi = self.max_size.max(lo);
        (lo, hi)
    }

    /// Velocity magnitude sampling range derived from `speed`.
    pub fn speed_range(&self) -> (f32, f32) {
        let hi = self.speed.max(0.0);
        (hi * 0.25, hi)
    }

    /// Resolved boundary policy for the configured behavior.
    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary.unwrap_or_else(|| self.behavior.default_boundary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_runnable() {
        let config = SimulationConfig::default();
        assert!(config.target_count() > 0);
        assert_eq!(config.population_ceiling(), config.target_count() * 2);
    }

    #[test]
    fn json_defaults_fill_missing_fields() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.count, 80);
        assert_eq!(config.behavior, Behavior::Float);
    }

    #[test]
    fn json_preset_roundtrip() {
        let config: SimulationConfig = serde_json::from_str(
            r##"{
                "count": 120,
                "behavior": "swarm",
                "connection_distance": 110.0,
                "color_scheme": "gradient",
                "colors": ["#8ec5fc", "#e0c3fc"],
                "lifetime": 300.0
            }"##,
        )
        .unwrap();
        assert_eq!(config.count, 120);
        assert_eq!(config.behavior, Behavior::Swarm);
        assert_eq!(config.color_scheme, ColorScheme::Gradient);
        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.lifetime, Some(300.0));
    }

    #[test]
    fn zero_count_targets_zero() {
        let config = SimulationConfig::default().with_count(0);
        assert_eq!(config.target_count(), 0);
        let config = SimulationConfig::default().with_density(-1.0);
        assert_eq!(config.target_count(), 0);
    }

    #[test]
    fn size_range_orders_min_max() {
        let config = SimulationConfig::default().with_size_range(5.0, 2.0);
        let (lo, hi) = config.size_range();
        assert!(lo <= hi);
    }
}
