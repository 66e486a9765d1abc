//! Particle behavior strategies.
//!
//! A [`Behavior`] selects which force terms apply to a particle each tick
//! and which boundary policy contains it. Behaviors are applied in a fixed
//! order per tick:
//!
//! 1. the primary behavior term (wind/drift, centroid pull, angular step,
//!    radial decay, or downward acceleration)
//! 2. the pointer force, when enabled
//! 3. position integration
//! 4. the boundary policy
//!
//! # Behavior Overview
//!
//! | Behavior | Force terms | Default boundary |
//! |----------|-------------|------------------|
//! | [`Behavior::Float`] | wind + sinusoidal drift | [`BoundaryPolicy::Reflect`] |
//! | [`Behavior::Swarm`] | centroid attraction + speed clamp | [`BoundaryPolicy::Reflect`] |
//! | [`Behavior::Orbit`] | angular step, radius preserved | [`BoundaryPolicy::None`] |
//! | [`Behavior::Explode`] | decaying radial velocity | [`BoundaryPolicy::Reflect`] |
//! | [`Behavior::Gravity`] | downward acceleration + floor bounce | [`BoundaryPolicy::BounceFloor`] |
//!
//! The coordinate system is surface pixels: `x` grows rightward, `y` grows
//! downward, so gravity is positive `y` and the floor is `y == height`.

use glam::Vec2;
use serde::Deserialize;

use crate::environment::Environment;
use crate::forces;
use crate::particle::Particle;

/// Per-tick inputs shared by every particle update.
///
/// Built once per tick by the store; behaviors read from it and never
/// write, so a single context serves the whole population.
pub struct TickContext<'a> {
    pub env: &'a Environment,
    /// Pointer position, if the host reported one.
    pub pointer: Option<Vec2>,
    /// Pointer force radius; `<= 0` disables the term.
    pub mouse_radius: f32,
    /// Live population centroid, recomputed each tick.
    pub centroid: Vec2,
    /// Global tick counter driving the float drift phase.
    pub tick: u64,
    pub width: f32,
    pub height: f32,
    /// Configured speed scale.
    pub speed: f32,
    /// Logical timestep in ticks (1.0 per scheduled frame).
    pub dt: f32,
}

impl TickContext<'_> {
    /// Orbit center: the middle of the surface.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Named force/motion strategy applied to a particle each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Wind plus a small sinusoidal drift for organic wobble.
    ///
    /// The drift phase comes from the global tick counter offset by the
    /// particle id, so neighbors wobble out of phase.
    #[default]
    Float,

    /// Attraction toward the population centroid with a velocity cap.
    ///
    /// The cap ([`forces::SWARM_MAX_SPEED`]) prevents runaway acceleration
    /// when the swarm collapses inward.
    Swarm,

    /// Constant angular motion around the surface center.
    ///
    /// Not a linear force: the angle advances by
    /// [`forces::ORBIT_STEP`] `* speed` each tick and the radius is
    /// preserved exactly, so no boundary handling is needed.
    Orbit,

    /// Outward radial velocity decaying by [`forces::EXPLOSION_DECAY`]
    /// each tick, giving a settling-outward effect.
    Explode,

    /// Downward acceleration with a restituting floor bounce.
    ///
    /// Side walls reflect, the floor bounces with
    /// [`forces::RESTITUTION`], and there is no ceiling clamp - particles
    /// may exit the top and fall back, or respawn once past the margin.
    Gravity,
}

impl Behavior {
    /// The boundary policy this behavior uses unless overridden.
    pub fn default_boundary(self) -> BoundaryPolicy {
        match self {
            Behavior::Float | Behavior::Swarm | Behavior::Explode => BoundaryPolicy::Reflect,
            Behavior::Orbit => BoundaryPolicy::None,
            Behavior::Gravity => BoundaryPolicy::BounceFloor,
        }
    }

    /// Advance one particle by one tick: primary term, pointer force,
    /// integration. Boundary handling is separate so the store can apply
    /// a configured override.
    pub fn apply(self, p: &mut Particle, ctx: &TickContext<'_>) {
        let dt = ctx.dt;
        match self {
            Behavior::Float => {
                let w = forces::wind(p.kind, ctx.env);
                p.velocity += w * dt;
                let phase = ctx.tick as f32 * 0.02 + p.id as f32 * 0.7;
                p.velocity.x += phase.sin() * 0.01 * dt;
                p.velocity.y += (phase * 0.9).cos() * 0.01 * dt;
                // Drag keeps accumulated wind bounded at a terminal speed.
                p.velocity *= 0.985_f32.powf(dt);
            }
            Behavior::Swarm => {
                p.velocity += forces::centroid_attraction(p.position, ctx.centroid) * dt;
                p.velocity = forces::clamp_speed(p.velocity, forces::SWARM_MAX_SPEED);
            }
            Behavior::Orbit => {
                let next = forces::orbit_step(p.position, ctx.center(), ctx.speed, dt);
                p.velocity = next - p.position;
                p.position = next;
            }
            Behavior::Explode => {
                p.velocity = forces::explosion_decay(p.velocity, dt);
            }
            Behavior::Gravity => {
                let w = forces::wind(p.kind, ctx.env);
                p.velocity.x += w.x * dt;
                p.velocity.y += forces::GRAVITY_ACCEL * ctx.env.fall_speed_scale() * dt;
            }
        }

        if ctx.mouse_radius > 0.0 {
            if let Some(pointer) = ctx.pointer {
                let push = forces::mouse(p.position, pointer, ctx.mouse_radius);
                if self == Behavior::Orbit {
                    // Orbit overwrites velocity from the angular step, so
                    // the pointer displaces position directly.
                    p.position += push * dt;
                } else {
                    p.velocity += push * dt;
                }
            }
        }

        if self != Behavior::Orbit {
            p.position += p.velocity * dt;
        }
    }
}

/// What happens when a particle meets the surface edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Clamp to the edge and invert the crossing velocity component.
    Reflect,
    /// Re-enter from the opposite edge with velocity preserved.
    Wrap,
    /// Side walls reflect, the floor bounces with restitution, the top is
    /// open.
    BounceFloor,
    /// No containment: particles leaving the extended bound are respawned
    /// by the store.
    Cull,
    /// No boundary handling at all (orbit radii are bounded by
    /// construction).
    None,
}

impl BoundaryPolicy {
    /// Contain `p` within `width x height`. Returns `false` when the
    /// particle has left the extended bound and should respawn.
    pub fn apply(self, p: &mut Particle, width: f32, height: f32, margin: f32) -> bool {
        match self {
            BoundaryPolicy::Reflect => {
                if p.position.x < 0.0 {
                    p.position.x = 0.0;
                    p.velocity.x = -p.velocity.x;
                } else if p.position.x > width {
                    p.position.x = width;
                    p.velocity.x = -p.velocity.x;
                }
                if p.position.y < 0.0 {
                    p.position.y = 0.0;
                    p.velocity.y = -p.velocity.y;
                } else if p.position.y > height {
                    p.position.y = height;
                    p.velocity.y = -p.velocity.y;
                }
                true
            }
            BoundaryPolicy::Wrap => {
                let span_x = width + 2.0 * margin;
                let span_y = height + 2.0 * margin;
                if span_x > 0.0 {
                    p.position.x = (p.position.x + margin).rem_euclid(span_x) - margin;
                }
                if span_y > 0.0 {
                    p.position.y = (p.position.y + margin).rem_euclid(span_y) - margin;
                }
                true
            }
            BoundaryPolicy::BounceFloor => {
                if p.position.x < 0.0 {
                    p.position.x = 0.0;
                    p.velocity.x = -p.velocity.x;
                } else if p.position.x > width {
                    p.position.x = width;
                    p.velocity.x = -p.velocity.x;
                }
                if p.position.y > height {
                    p.position.y = height;
                    p.velocity.y = -p.velocity.y * forces::RESTITUTION;
                }
                // Top stays open; the margin check below catches runaways.
                p.in_extended_bounds(width, height, margin)
            }
            BoundaryPolicy::Cull => p.in_extended_bounds(width, height, margin),
            BoundaryPolicy::None => true,
        }
    }
}
