//! Spawn sampling for new and respawned particles.
//!
//! [`SpawnContext`] owns the engine RNG and the id counter, and turns a
//! configuration + environment pair into concrete particles. Sampling is
//! total: an empty or degenerate weight set falls back to a single default
//! kind instead of failing.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::behavior::Behavior;
use crate::color;
use crate::config::{ColorScheme, SimulationConfig};
use crate::environment::Environment;
use crate::particle::{Particle, ParticleKind};

/// Seeded sampling state for particle creation.
pub struct SpawnContext {
    rng: SmallRng,
    next_id: u32,
}

impl SpawnContext {
    /// Create a context with a deterministic seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Create a context seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            next_id: 0,
        }
    }

    /// Random f32 in `0.0..1.0`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range. Degenerate ranges return `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Sample a particle kind from relative weights.
    ///
    /// Weights with non-positive total (or an empty list) fall back to
    /// [`ParticleKind::default`], so sampling never selects outside the
    /// configured set and never fails.
    pub fn weighted_kind(&mut self, weights: &[(ParticleKind, f32)]) -> ParticleKind {
        let total: f32 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return ParticleKind::default();
        }
        let mut roll = self.rng.gen_range(0.0..total);
        for &(kind, weight) in weights {
            let weight = weight.max(0.0);
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        // Floating-point spillover lands on the last entry.
        weights.last().map(|&(kind, _)| kind).unwrap_or_default()
    }

    /// Create a brand-new particle sampled from the configuration and
    /// environment.
    pub fn spawn(
        &mut self,
        config: &SimulationConfig,
        env: &Environment,
        width: f32,
        height: f32,
    ) -> Particle {
        let kind = self.weighted_kind(&env.particle_weights());
        let (min_size, max_size) = config.size_range();
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let mut p = Particle {
            id,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            size: self.random_range(min_size, max_size),
            opacity: self.random_range(0.3, 1.0),
            color: self.sample_color(config, env),
            kind,
            rotation: self.random_range(0.0, TAU),
            rotation_speed: self.random_range(-0.05, 0.05),
            lifetime: config.lifetime,
            max_lifetime: config.lifetime,
            connections: Vec::new(),
        };
        self.place(&mut p, config, width, height);
        p
    }

    /// Reset a dead particle in place: position, velocity, and lifetime.
    ///
    /// Kind, color, and size persist across respawns so the population's
    /// visual mix stays stable.
    pub fn respawn(
        &mut self,
        p: &mut Particle,
        config: &SimulationConfig,
        width: f32,
        height: f32,
    ) {
        self.place(p, config, width, height);
        p.lifetime = p.max_lifetime;
        p.connections.clear();
    }

    /// Position + velocity sampling shared by spawn and respawn.
    fn place(&mut self, p: &mut Particle, config: &SimulationConfig, width: f32, height: f32) {
        let (min_speed, max_speed) = config.speed_range();
        let gravity_seeded = config.behavior == Behavior::Gravity && p.kind.spawns_at_top();

        p.position = if gravity_seeded {
            // Falling kinds re-enter from above the visible surface.
            Vec2::new(
                self.random_range(0.0, width.max(1.0)),
                self.random_range(-config.margin.max(1.0), 0.0),
            )
        } else {
            Vec2::new(
                self.random_range(0.0, width.max(1.0)),
                self.random_range(0.0, height.max(1.0)),
            )
        };

        p.velocity = match config.behavior {
            Behavior::Gravity => Vec2::new(
                self.random_range(-0.3, 0.3),
                self.random_range(min_speed, max_speed),
            ),
            Behavior::Explode => {
                let center = Vec2::new(width * 0.5, height * 0.5);
                let offset = p.position - center;
                let dir = if offset.length_squared() > 1e-4 {
                    offset.normalize()
                } else {
                    let angle = self.random_range(0.0, TAU);
                    Vec2::new(angle.cos(), angle.sin())
                };
                dir * self.random_range(max_speed, max_speed * 3.0 + 0.1)
            }
            // Orbit positions are angle-driven; start at rest.
            Behavior::Orbit => Vec2::ZERO,
            _ => {
                let angle = self.random_range(0.0, TAU);
                let speed = self.random_range(min_speed, max_speed);
                Vec2::new(angle.cos(), angle.sin()) * speed
            }
        };
    }

    fn sample_color(&mut self, config: &SimulationConfig, env: &Environment) -> Vec3 {
        match config.color_scheme {
            ColorScheme::Monochrome => match config.colors.first() {
                Some(hex) => color::resolve_hex(hex),
                None => env.palette().accent,
            },
            ColorScheme::Rainbow => color::hsv_to_rgb(self.random(), 0.7, 0.9),
            ColorScheme::Gradient => {
                let palette = env.palette();
                let (a, b) = match (config.colors.first(), config.colors.get(1)) {
                    (Some(a), Some(b)) => (color::resolve_hex(a), color::resolve_hex(b)),
                    _ => (palette.accent, palette.sky[0]),
                };
                color::lerp(a, b, self.random())
            }
            ColorScheme::Custom => {
                if config.colors.is_empty() {
                    color::NEUTRAL
                } else {
                    let i = self.rng.gen_range(0..config.colors.len());
                    color::resolve_hex(&config.colors[i])
                }
            }
        }
    }
}
