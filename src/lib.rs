//! # driftglass - Ambient Particle & Weather Simulation
//!
//! A backend-agnostic 2D engine for ambient particle effects: hundreds of
//! point entities spawned, moved, connected, and rendered each frame under
//! pluggable force behaviors and environment-driven parameters. Built for
//! glass-style UI surfaces, usable anywhere a host can provide a drawing
//! surface and a frame callback.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftglass::prelude::*;
//!
//! let config = SimulationConfig::new()
//!     .with_count(120)
//!     .with_behavior(Behavior::Float)
//!     .with_connections(110.0)
//!     .with_mouse_interaction(100.0);
//!
//! let mut engine = Engine::new(config, Environment::weather(Weather::Snow), 800.0, 600.0);
//! let mut surface = RasterSurface::new(800, 600);
//! let mut scheduler = AnimationScheduler::new();
//!
//! // Host frame callback:
//! while scheduler.frame(&mut engine, &mut surface) {
//!     // present the surface, wait for the next frame...
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Each [`Particle`] carries position, velocity, size, opacity, a concrete
//! color, a [`ParticleKind`] from a fixed vocabulary (leaf, pollen, dust,
//! snow, rain, ...), and a lifetime in logical ticks. Expired or escaped
//! particles respawn rather than vanish, so the population stays at the
//! configured target.
//!
//! ### Behaviors
//!
//! A [`Behavior`] selects the force terms and boundary policy applied to
//! every particle each tick:
//!
//! | Behavior | Motion |
//! |----------|--------|
//! | [`Behavior::Float`] | wind + sinusoidal drift |
//! | [`Behavior::Swarm`] | centroid attraction, capped speed |
//! | [`Behavior::Orbit`] | angular steps, radius preserved |
//! | [`Behavior::Explode`] | decaying radial velocity |
//! | [`Behavior::Gravity`] | downward acceleration, restituting floor |
//!
//! ### Environments
//!
//! An [`Environment`] bundles a biome or weather kind with scalar fields
//! (temperature, humidity, wind, time of day). Palettes, spawn weights,
//! and behavior tuning are derived from it on demand; transient
//! atmospheric events (lightning, rainbows, mist) reach the renderer and
//! the optional host observer.
//!
//! ### Surfaces
//!
//! Rendering goes through the [`Surface`] trait - clear, fills, strokes,
//! a radial gradient - so the engine never depends on a concrete graphics
//! backend. [`RasterSurface`] is the built-in software implementation
//! with PNG export.
//!
//! ### Scheduling
//!
//! [`AnimationScheduler`] advances a fixed 16 ms logical step per frame,
//! honors the reduced-motion preference with a single static render, and
//! stops deterministically: after [`AnimationScheduler::stop`] returns,
//! no further ticks or surface writes occur.

pub mod behavior;
pub mod color;
pub mod config;
pub mod connections;
pub mod engine;
pub mod environment;
pub mod error;
pub mod forces;
pub mod particle;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod spawn;
pub mod store;

pub use behavior::{Behavior, BoundaryPolicy, TickContext};
pub use config::{ColorScheme, SimulationConfig};
pub use connections::{ConnectionGraph, Edge};
pub use engine::{Engine, EngineEvent};
pub use environment::{
    AtmosphericEvent, AtmosphericKind, Biome, Environment, EnvironmentKind, Palette, Season,
    Weather,
};
pub use error::ExportError;
pub use glam::{Vec2, Vec3};
pub use particle::{Particle, ParticleKind};
pub use raster::RasterSurface;
pub use render::{Renderer, Shape, Surface};
pub use scheduler::{AnimationScheduler, FrameClock, LOGICAL_DT_MS, LOGICAL_DT_SECS};
pub use spawn::SpawnContext;
pub use store::ParticleStore;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use driftglass::prelude::*;
/// ```
pub mod prelude {
    pub use crate::behavior::{Behavior, BoundaryPolicy};
    pub use crate::config::{ColorScheme, SimulationConfig};
    pub use crate::engine::{Engine, EngineEvent};
    pub use crate::environment::{Biome, Environment, Season, Weather};
    pub use crate::particle::{Particle, ParticleKind};
    pub use crate::raster::RasterSurface;
    pub use crate::render::{Renderer, Shape, Surface};
    pub use crate::scheduler::AnimationScheduler;
    pub use crate::{Vec2, Vec3};
}
