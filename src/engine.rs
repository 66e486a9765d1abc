//! The simulation engine façade.
//!
//! [`Engine`] ties the particle store, connection graph, environment, and
//! renderer together behind the tick/draw contract. The whole simulation
//! is an explicit handle owned by the caller - there is no module-level
//! or ambient state, and the engine is fully re-derivable from its
//! configuration and environment at any time.
//!
//! # Example
//!
//! ```ignore
//! use driftglass::prelude::*;
//!
//! let config = SimulationConfig::new()
//!     .with_count(120)
//!     .with_behavior(Behavior::Float)
//!     .with_connections(110.0);
//!
//! let mut engine = Engine::new(config, Environment::weather(Weather::Snow), 800.0, 600.0);
//! let mut surface = RasterSurface::new(800, 600);
//! let mut scheduler = AnimationScheduler::new();
//!
//! while scheduler.frame(&mut engine, &mut surface) {
//!     // hand the frame to the host, wait for the next callback...
//! }
//! ```
//!
//! Pointer positions and resize notifications are the only asynchronous
//! inputs. Both land in small fields that the next tick reads: a resize
//! never interleaves with an in-progress tick, it is applied as the first
//! step of the following one.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::SimulationConfig;
use crate::connections::{ConnectionGraph, Edge};
use crate::environment::{AtmosphericEvent, Environment, EnvironmentKind};
use crate::particle::Particle;
use crate::render::{Renderer, Surface};
use crate::store::ParticleStore;

/// Notifications surfaced to the host observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    /// A transient atmospheric event began (lightning, rainbow, mist).
    Atmospheric(AtmosphericEvent),
    /// The environment was replaced wholesale.
    EnvironmentChanged(EnvironmentKind),
}

type Observer = Box<dyn FnMut(&EngineEvent)>;

pub struct Engine {
    config: SimulationConfig,
    env: Environment,
    store: ParticleStore,
    graph: ConnectionGraph,
    renderer: Renderer,
    rng: SmallRng,
    pointer: Option<Vec2>,
    pending_resize: Option<(f32, f32)>,
    tick_count: u64,
    events: Vec<AtmosphericEvent>,
    observer: Option<Observer>,
    reduced_motion: bool,
}

impl Engine {
    /// Create an engine and populate it for the given surface size.
    ///
    /// Non-positive dimensions or a zero target count yield an empty but
    /// valid engine; a later [`Engine::resize`] brings it to life.
    pub fn new(config: SimulationConfig, env: Environment, width: f32, height: f32) -> Self {
        let mut store = ParticleStore::new(None, width, height);
        store.initialize(&config, &env);
        Self {
            config,
            env,
            store,
            graph: ConnectionGraph::new(),
            renderer: Renderer::new(),
            rng: SmallRng::from_entropy(),
            pointer: None,
            pending_resize: None,
            tick_count: 0,
            events: Vec::new(),
            observer: None,
            reduced_motion: false,
        }
    }

    /// Reseed and reinitialize for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        let (width, height) = self.store.dimensions();
        self.store = ParticleStore::new(Some(seed), width, height);
        self.store.initialize(&self.config, &self.env);
        self.rng = SmallRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9));
        self.tick_count = 0;
        self
    }

    /// Register the observer callback for atmospheric and environment
    /// events.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&EngineEvent) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Active atmospheric events, newest last.
    pub fn active_events(&self) -> &[AtmosphericEvent] {
        &self.events
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Latest pointer position, or `None` when the pointer left.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    /// Note a new surface size. The reinitialization happens as the first
    /// step of the next tick, never mid-tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.pending_resize = Some((width, height));
        }
    }

    /// Replace the environment wholesale.
    ///
    /// Existing particles keep their kind and color; new spawns sample
    /// from the new environment. Swapping out of a precipitation kind
    /// emits a rainbow event.
    pub fn set_environment(&mut self, env: Environment) {
        let was_precipitation = self.env.is_precipitation();
        log::debug!("environment replaced: {:?} -> {:?}", self.env.kind, env.kind);
        self.env = env;
        if was_precipitation && !self.env.is_precipitation() {
            let (width, height) = self.store.dimensions();
            if width > 0.0 && height > 0.0 {
                let rainbow = Environment::rainbow_event(width, height);
                self.events.push(rainbow);
                self.notify(EngineEvent::Atmospheric(rainbow));
            }
        }
        self.notify(EngineEvent::EnvironmentChanged(self.env.kind));
    }

    /// Update the host's reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Whether animation is frozen: preference active and honored.
    pub fn is_motion_reduced(&self) -> bool {
        self.config.respect_motion_preference && self.reduced_motion
    }

    /// Advance the simulation by one logical tick.
    pub fn tick(&mut self) {
        self.tick_by(1.0);
    }

    /// Advance by `dt` logical ticks: pending resize, atmospheric events,
    /// particle update, connection rebuild, in that order.
    pub fn tick_by(&mut self, dt: f32) {
        if let Some((width, height)) = self.pending_resize.take() {
            self.store.resize(&self.config, &self.env, width, height);
        }

        for event in self.events.iter_mut() {
            event.duration -= dt;
        }
        self.events.retain(|e| e.duration > 0.0);

        let (width, height) = self.store.dimensions();
        if let Some(event) = self.env.roll_event(&mut self.rng, width, height) {
            self.events.push(event);
            self.notify(EngineEvent::Atmospheric(event));
        }

        self.store
            .tick(&self.config, &self.env, self.pointer, self.tick_count, dt);
        self.graph
            .rebuild(self.store.particles_mut(), self.config.connection_distance);
        self.tick_count += 1;
    }

    /// Render the current state. Runs strictly after tick mutations; the
    /// surface is exclusively borrowed for the duration of the call.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.renderer.draw(
            surface,
            &self.config,
            self.store.particles(),
            &self.graph,
            &self.env,
            &self.events,
        );
    }

    /// Drop pending fractional spawns. Called on scheduler stop.
    pub fn clear_pending(&mut self) {
        self.store.clear_pending();
    }

    fn notify(&mut self, event: EngineEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{AtmosphericKind, Weather};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(count: usize) -> Engine {
        let config = SimulationConfig::default().with_count(count);
        Engine::new(config, Environment::default(), 640.0, 480.0).with_seed(21)
    }

    #[test]
    fn tick_preserves_population() {
        let mut engine = engine(50);
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(engine.particles().len(), 50);
        assert_eq!(engine.tick_count(), 30);
    }

    #[test]
    fn resize_applies_on_next_tick() {
        let mut engine = engine(40);
        engine.resize(200.0, 100.0);
        // Not yet applied: positions may still exceed the new bounds.
        engine.tick();
        for p in engine.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= 200.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 100.0);
        }
    }

    #[test]
    fn nonpositive_resize_ignored() {
        let mut engine = engine(40);
        engine.resize(0.0, -5.0);
        engine.tick();
        assert_eq!(engine.particles().len(), 40);
    }

    #[test]
    fn rainbow_on_rain_clearing() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let config = SimulationConfig::default().with_count(10);
        let mut engine =
            Engine::new(config, Environment::weather(Weather::Rain), 640.0, 480.0)
                .with_seed(5)
                .with_observer(move |event| sink.borrow_mut().push(*event));

        engine.set_environment(Environment::weather(Weather::Clear));

        let seen = events.borrow();
        assert!(seen.iter().any(|e| matches!(
            e,
            EngineEvent::Atmospheric(AtmosphericEvent {
                kind: AtmosphericKind::Rainbow,
                ..
            })
        )));
        assert!(seen
            .iter()
            .any(|e| matches!(e, EngineEvent::EnvironmentChanged(_))));
        assert!(!engine.active_events().is_empty());
    }

    #[test]
    fn events_expire() {
        let mut engine = engine(5);
        engine.set_environment(Environment::weather(Weather::Rain));
        engine.set_environment(Environment::weather(Weather::Clear));
        assert!(!engine.active_events().is_empty());
        for _ in 0..500 {
            engine.tick();
        }
        assert!(engine.active_events().is_empty());
    }

    #[test]
    fn reduced_motion_respects_config() {
        let mut engine = engine(5);
        engine.set_reduced_motion(true);
        assert!(engine.is_motion_reduced());

        let config = SimulationConfig {
            respect_motion_preference: false,
            ..SimulationConfig::default()
        };
        let mut engine = Engine::new(config, Environment::default(), 640.0, 480.0);
        engine.set_reduced_motion(true);
        assert!(!engine.is_motion_reduced());
    }

    #[test]
    fn connections_rebuilt_each_tick() {
        let config = SimulationConfig::default().with_count(60).with_connections(150.0);
        let mut engine =
            Engine::new(config, Environment::default(), 400.0, 300.0).with_seed(8);
        engine.tick();
        assert!(!engine.edges().is_empty());
        for edge in engine.edges() {
            assert!(edge.distance < 150.0);
        }
    }
}
