//! The particle data model.
//!
//! A [`Particle`] is a simulated point entity: position, velocity, visual
//! attributes, and a bounded lifetime measured in logical ticks. Particles
//! are mutated in place once per tick by their [`Behavior`](crate::behavior::Behavior)
//! and respawned rather than destroyed, so the live population stays
//! roughly stable.

use glam::{Vec2, Vec3};
use serde::Deserialize;

/// Fixed vocabulary of particle categories.
///
/// The kind determines the default rendering shape, how strongly wind acts
/// on the particle, and where it respawns after its lifetime expires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Leaf,
    Pollen,
    #[default]
    Dust,
    Sand,
    Snow,
    Ice,
    Insect,
    Spore,
    Fog,
    Bubble,
    Cloud,
    Rain,
    Droplet,
    Ember,
}

impl ParticleKind {
    /// How strongly wind acts on this kind.
    ///
    /// Light airborne matter (dust, sand, snow) rides the wind almost
    /// fully; self-propelled insects barely register it.
    pub fn wind_sensitivity(self) -> f32 {
        match self {
            ParticleKind::Dust | ParticleKind::Sand => 1.0,
            ParticleKind::Snow | ParticleKind::Pollen | ParticleKind::Spore => 0.9,
            ParticleKind::Leaf => 0.8,
            ParticleKind::Fog | ParticleKind::Cloud => 0.6,
            ParticleKind::Rain | ParticleKind::Droplet => 0.5,
            ParticleKind::Ice | ParticleKind::Bubble | ParticleKind::Ember => 0.4,
            ParticleKind::Insect => 0.1,
        }
    }

    /// Whether respawns seed from the top edge (falling precipitation)
    /// instead of a random point.
    pub fn spawns_at_top(self) -> bool {
        matches!(
            self,
            ParticleKind::Rain | ParticleKind::Snow | ParticleKind::Droplet
        )
    }

    /// Soft kinds render as gradient blobs rather than hard shapes.
    pub fn is_soft(self) -> bool {
        matches!(self, ParticleKind::Fog | ParticleKind::Cloud)
    }
}

/// A simulated point entity.
///
/// All coordinates are in surface pixel units. `connections` is transient
/// scratch state rebuilt every tick by the connection graph; it is never
/// carried across ticks.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Stable identity within a session.
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radius-ish visual size, bounded by the configured size range.
    pub size: f32,
    /// Opacity in `0..=1`.
    pub opacity: f32,
    /// Concrete displayable color. Never unset; malformed input is
    /// sanitized at the boundary.
    pub color: Vec3,
    pub kind: ParticleKind,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rotation delta per tick.
    pub rotation_speed: f32,
    /// Remaining ticks to live. `None` means unbounded.
    pub lifetime: Option<f32>,
    /// Total ticks to live, restored on respawn.
    pub max_lifetime: Option<f32>,
    /// Neighbor ids within connection distance, rebuilt every tick.
    pub connections: Vec<u32>,
}

impl Particle {
    /// Whether the particle counts as alive: lifetime not expired and
    /// position within the extended bound `-margin..dimension + margin`.
    pub fn is_alive(&self, width: f32, height: f32, margin: f32) -> bool {
        if matches!(self.lifetime, Some(t) if t <= 0.0) {
            return false;
        }
        self.in_extended_bounds(width, height, margin)
    }

    /// Position check against the extended bound only.
    pub fn in_extended_bounds(&self, width: f32, height: f32, margin: f32) -> bool {
        self.position.x >= -margin
            && self.position.x <= width + margin
            && self.position.y >= -margin
            && self.position.y <= height + margin
    }

    /// Age the particle by `dt` ticks. Unbounded lifetimes are untouched.
    pub fn age(&mut self, dt: f32) {
        if let Some(t) = self.lifetime.as_mut() {
            *t -= dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(pos: Vec2, lifetime: Option<f32>) -> Particle {
        Particle {
            id: 0,
            position: pos,
            velocity: Vec2::ZERO,
            size: 2.0,
            opacity: 1.0,
            color: Vec3::ONE,
            kind: ParticleKind::Dust,
            rotation: 0.0,
            rotation_speed: 0.0,
            lifetime,
            max_lifetime: lifetime,
            connections: Vec::new(),
        }
    }

    #[test]
    fn alive_within_margin() {
        let p = dummy(Vec2::new(-10.0, 50.0), None);
        assert!(p.is_alive(100.0, 100.0, 20.0));
        assert!(!p.is_alive(100.0, 100.0, 5.0));
    }

    #[test]
    fn expired_lifetime_is_dead() {
        let mut p = dummy(Vec2::new(50.0, 50.0), Some(1.0));
        assert!(p.is_alive(100.0, 100.0, 20.0));
        p.age(1.0);
        assert!(!p.is_alive(100.0, 100.0, 20.0));
    }

    #[test]
    fn unbounded_lifetime_never_expires() {
        let mut p = dummy(Vec2::new(50.0, 50.0), None);
        for _ in 0..1000 {
            p.age(1.0);
        }
        assert!(p.is_alive(100.0, 100.0, 20.0));
    }

    #[test]
    fn precipitation_spawns_at_top() {
        assert!(ParticleKind::Rain.spawns_at_top());
        assert!(ParticleKind::Snow.spawns_at_top());
        assert!(!ParticleKind::Leaf.spawns_at_top());
    }
}
