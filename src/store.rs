//! The live particle population.
//!
//! [`ParticleStore`] owns every live particle and the spawn state. Each
//! tick it advances the whole population through the configured behavior,
//! respawns particles whose lifetime expired or that left the extended
//! bounds, and tops the population up to the target count. Particles are
//! removed outright only when the population exceeds the ceiling of twice
//! the target - otherwise they respawn, keeping the population roughly
//! stable.

use glam::Vec2;

use crate::behavior::TickContext;
use crate::config::SimulationConfig;
use crate::environment::Environment;
use crate::particle::Particle;
use crate::scheduler::LOGICAL_DT_SECS;
use crate::spawn::SpawnContext;

pub struct ParticleStore {
    particles: Vec<Particle>,
    spawner: SpawnContext,
    width: f32,
    height: f32,
    /// Fractional particles owed by the continuous emitter.
    emit_accumulator: f32,
}

impl ParticleStore {
    /// Create an empty store over a surface of the given size.
    pub fn new(seed: Option<u64>, width: f32, height: f32) -> Self {
        Self {
            particles: Vec::new(),
            spawner: match seed {
                Some(seed) => SpawnContext::new(seed),
                None => SpawnContext::from_entropy(),
            },
            width,
            height,
            emit_accumulator: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Mean position of the live population, or the surface center when
    /// empty.
    pub fn centroid(&self) -> Vec2 {
        if self.particles.is_empty() {
            return Vec2::new(self.width * 0.5, self.height * 0.5);
        }
        let sum: Vec2 = self.particles.iter().map(|p| p.position).sum();
        sum / self.particles.len() as f32
    }

    /// Populate the store with the configured target count.
    ///
    /// A no-op when the target is zero or the surface has no area; the
    /// store is left empty rather than erroring.
    pub fn initialize(&mut self, config: &SimulationConfig, env: &Environment) {
        self.particles.clear();
        self.emit_accumulator = 0.0;
        let target = config.target_count();
        if target == 0 || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        self.particles.reserve(target);
        for _ in 0..target {
            let p = self.spawner.spawn(config, env, self.width, self.height);
            self.particles.push(p);
        }
    }

    /// Reinitialize the population for a new surface size.
    ///
    /// This is a full reset, not a rescale: callers must expect every
    /// particle to move. Non-positive dimensions are ignored.
    pub fn resize(
        &mut self,
        config: &SimulationConfig,
        env: &Environment,
        width: f32,
        height: f32,
    ) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        log::debug!(
            "resize {}x{} -> {}x{}, reinitializing population",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.initialize(config, env);
    }

    /// Advance every live particle by one tick.
    ///
    /// Order per particle: behavior + pointer force, rotation, aging,
    /// boundary policy, then respawn or removal. After the sweep the
    /// population is topped up to the target and the continuous emitter
    /// runs, both capped at the population ceiling.
    pub fn tick(
        &mut self,
        config: &SimulationConfig,
        env: &Environment,
        pointer: Option<Vec2>,
        tick: u64,
        dt: f32,
    ) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        let target = config.target_count();
        if target == 0 {
            self.particles.clear();
            return;
        }

        let ctx = TickContext {
            env,
            pointer,
            mouse_radius: if config.mouse_interaction {
                config.mouse_radius
            } else {
                0.0
            },
            centroid: self.centroid(),
            tick,
            width: self.width,
            height: self.height,
            speed: config.speed,
            dt,
        };
        let policy = config.boundary_policy();
        let ceiling = config.population_ceiling();

        let (width, height) = (self.width, self.height);
        let Self {
            particles, spawner, ..
        } = self;

        let mut i = 0;
        while i < particles.len() {
            let p = &mut particles[i];
            config.behavior.apply(p, &ctx);
            p.rotation += p.rotation_speed * dt;
            p.age(dt);

            let contained = policy.apply(p, width, height, config.margin);
            let expired = matches!(p.lifetime, Some(t) if t <= 0.0);

            if expired || !contained {
                if particles.len() > ceiling {
                    particles.swap_remove(i);
                    continue;
                }
                spawner.respawn(&mut particles[i], config, width, height);
            }
            i += 1;
        }

        // Top up to the target, then run the continuous emitter.
        while self.particles.len() < target {
            let p = self.spawner.spawn(config, env, self.width, self.height);
            self.particles.push(p);
        }

        if config.emit_rate > 0.0 {
            self.emit_accumulator +=
                config.emit_rate * env.spawn_rate_multiplier() * dt * LOGICAL_DT_SECS;
            while self.emit_accumulator >= 1.0 && self.particles.len() < ceiling {
                self.emit_accumulator -= 1.0;
                let p = self.spawner.spawn(config, env, self.width, self.height);
                self.particles.push(p);
            }
            if self.particles.len() >= ceiling {
                // Owed spawns are dropped at the ceiling, not deferred.
                self.emit_accumulator = 0.0;
            }
        }
    }

    /// Drop any fractional spawns owed by the emitter.
    pub fn clear_pending(&mut self) {
        self.emit_accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, BoundaryPolicy};

    fn store(config: &SimulationConfig) -> ParticleStore {
        let env = Environment::default();
        let mut store = ParticleStore::new(Some(9), 640.0, 480.0);
        store.initialize(config, &env);
        store
    }

    #[test]
    fn population_stable_after_ticks() {
        let config = SimulationConfig::default().with_count(50);
        let env = Environment::default();
        let mut store = store(&config);
        assert_eq!(store.len(), 50);
        for tick in 0..120 {
            store.tick(&config, &env, None, tick, 1.0);
            assert_eq!(store.len(), 50);
        }
    }

    #[test]
    fn density_scales_target() {
        let config = SimulationConfig::default().with_count(50).with_density(2.0);
        let store = store(&config);
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn zero_count_is_noop() {
        let config = SimulationConfig::default().with_count(0);
        let env = Environment::default();
        let mut store = store(&config);
        assert!(store.is_empty());
        store.tick(&config, &env, None, 0, 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn nonpositive_dimensions_are_noop() {
        let config = SimulationConfig::default();
        let env = Environment::default();
        let mut store = ParticleStore::new(Some(9), 0.0, 480.0);
        store.initialize(&config, &env);
        assert!(store.is_empty());
        store.resize(&config, &env, -10.0, 480.0);
        assert!(store.is_empty());
    }

    #[test]
    fn lifetimes_decrease_and_reset() {
        let config = SimulationConfig::default().with_count(10).with_lifetime(3.0);
        let env = Environment::default();
        let mut store = store(&config);
        for tick in 0..20 {
            store.tick(&config, &env, None, tick, 1.0);
            for p in store.particles() {
                let t = p.lifetime.expect("finite lifetime configured");
                assert!(t > 0.0, "lifetime must never be observable as expired");
                assert!(t <= 3.0);
            }
        }
    }

    #[test]
    fn emitter_grows_population_to_ceiling() {
        let config = SimulationConfig::default()
            .with_count(20)
            .with_emit_rate(10_000.0);
        let env = Environment::default();
        let mut store = store(&config);
        for tick in 0..60 {
            store.tick(&config, &env, None, tick, 1.0);
            assert!(store.len() <= config.population_ceiling());
        }
        assert_eq!(store.len(), config.population_ceiling());
    }

    #[test]
    fn resize_reinitializes_within_new_bounds() {
        let config = SimulationConfig::default().with_count(40);
        let env = Environment::default();
        let mut store = store(&config);
        store.resize(&config, &env, 100.0, 80.0);
        assert_eq!(store.len(), 40);
        for p in store.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= 100.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 80.0);
        }
    }

    #[test]
    fn culled_gravity_particles_respawn() {
        let config = SimulationConfig::default()
            .with_count(30)
            .with_behavior(Behavior::Gravity)
            .with_boundary(BoundaryPolicy::Cull)
            .with_speed(50.0);
        let env = Environment::default();
        let mut store = store(&config);
        for tick in 0..200 {
            store.tick(&config, &env, None, tick, 1.0);
            assert_eq!(store.len(), 30, "culled particles respawn, not vanish");
        }
    }
}
