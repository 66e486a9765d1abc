//! Force terms combined each tick.
//!
//! Each function computes one directional or radial contribution given a
//! particle and an environment snapshot. Behaviors pick which terms apply;
//! see [`Behavior`](crate::behavior::Behavior) for the composition rules.
//!
//! All terms are total: zero-distance cases are guarded and contribute
//! zero force for that tick instead of dividing by zero.

use glam::Vec2;

use crate::environment::Environment;
use crate::particle::ParticleKind;

/// Downward acceleration for gravity-behavior particles, pixels per tick
/// squared.
pub const GRAVITY_ACCEL: f32 = 0.12;

/// Energy retained on floor contact. Velocity inverts and shrinks by this
/// factor instead of passing through the boundary.
pub const RESTITUTION: f32 = 0.8;

/// Attraction constant pulling swarm particles toward the population
/// centroid.
pub const SWARM_ATTRACTION: f32 = 0.0005;

/// Velocity magnitude cap for swarm particles, pixels per tick.
pub const SWARM_MAX_SPEED: f32 = 2.0;

/// Angular step per tick for orbit particles, radians, before the speed
/// scale.
pub const ORBIT_STEP: f32 = 0.01;

/// Multiplicative decay applied to explosion velocity each tick.
pub const EXPLOSION_DECAY: f32 = 0.98;

/// Scale from environment wind speed to applied force.
pub const WIND_STRENGTH: f32 = 0.04;

/// Wind force for a particle kind under the given environment.
///
/// Magnitude is `wind_speed * WIND_STRENGTH` scaled by the kind's wind
/// sensitivity; direction comes from `wind_direction` in degrees. The
/// environment's horizontal bias (sand-laden wind) stretches the x
/// component only.
pub fn wind(kind: ParticleKind, env: &Environment) -> Vec2 {
    let angle = env.wind_direction.to_radians();
    let magnitude = env.wind_speed * WIND_STRENGTH * kind.wind_sensitivity();
    Vec2::new(
        angle.cos() * magnitude * env.wind_bias(),
        angle.sin() * magnitude,
    )
}

/// Pointer repulsion with linear falloff.
///
/// Within `radius` of the pointer the magnitude is `(radius - d) / radius`
/// - exactly 1 at the pointer, 0 at the rim - directed away from the
/// pointer. At `d == 0` the direction is undefined, so the term is skipped
/// for that tick.
pub fn mouse(position: Vec2, pointer: Vec2, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let away = position - pointer;
    let distance = away.length();
    if distance >= radius || distance == 0.0 {
        return Vec2::ZERO;
    }
    let magnitude = (radius - distance) / radius;
    away / distance * magnitude
}

/// Attraction toward the population centroid.
pub fn centroid_attraction(position: Vec2, centroid: Vec2) -> Vec2 {
    (centroid - position) * SWARM_ATTRACTION
}

/// Clamp a velocity to a maximum magnitude, preserving direction.
pub fn clamp_speed(velocity: Vec2, max: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > max && speed > 0.0 {
        velocity / speed * max
    } else {
        velocity
    }
}

/// One orbital step: rotate the particle around `center` by
/// `ORBIT_STEP * speed * dt` radians, preserving the radius exactly.
///
/// Returns the new position. This is a positional update, not a force.
pub fn orbit_step(position: Vec2, center: Vec2, speed: f32, dt: f32) -> Vec2 {
    let offset = position - center;
    let radius = offset.length();
    if radius == 0.0 {
        return position;
    }
    let angle = offset.y.atan2(offset.x) + ORBIT_STEP * speed * dt;
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Exponential decay of outward explosion velocity.
pub fn explosion_decay(velocity: Vec2, dt: f32) -> Vec2 {
    velocity * EXPLOSION_DECAY.powf(dt)
}
