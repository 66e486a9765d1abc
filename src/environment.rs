//! Environment descriptors and their derivations.
//!
//! An [`Environment`] bundles a kind tag (biome or weather) with scalar
//! fields: temperature, humidity, wind, light, time of day. It is owned by
//! the host and replaced wholesale on biome/weather change - nothing here
//! mutates after construction.
//!
//! Everything the engine consumes is *derived* on demand, never stored:
//!
//! | derivation | consumed by |
//! |------------|-------------|
//! | [`Environment::palette`] | renderer (sky, ground, accent) |
//! | [`Environment::particle_weights`] | spawn sampling |
//! | [`Environment::spawn_rate_multiplier`] | particle store top-up |
//! | [`Environment::fall_speed_scale`], [`Environment::wind_bias`] | behavior tuning |
//! | [`Environment::light_intensity`], [`Environment::day_night_modulate`] | renderer |
//! | [`Environment::roll_event`] | renderer overlays + host observer |

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Deserialize;
use std::f32::consts::PI;

use crate::particle::ParticleKind;

/// Biome kinds for ambient scene effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Forest,
    Desert,
    Ocean,
    Tundra,
    Swamp,
    Meadow,
}

/// Weather kinds for atmospheric effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Fog,
}

/// Kind tag: either a biome or a weather condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    Biome(Biome),
    Weather(Weather),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Sky/ground/accent color bundle derived from an environment kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Vertical sky gradient, top then horizon.
    pub sky: [Vec3; 2],
    pub ground: Vec3,
    pub accent: Vec3,
}

/// Transient atmospheric event kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtmosphericKind {
    Lightning,
    Rainbow,
    Mist,
}

/// A transient atmospheric event consumed by the renderer and optionally
/// surfaced to the host observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphericEvent {
    pub kind: AtmosphericKind,
    /// Strength in `0..=1`.
    pub intensity: f32,
    /// Remaining duration in logical ticks.
    pub duration: f32,
    /// Anchor position in surface pixels.
    pub position: Vec2,
}

/// Weather/biome parameter bundle. See the module docs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub kind: EnvironmentKind,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in `0..=1`.
    pub humidity: f32,
    /// Wind magnitude in pixels per tick before per-kind sensitivity.
    pub wind_speed: f32,
    /// Wind direction in degrees, 0 = rightward, 90 = downward.
    pub wind_direction: f32,
    /// Base light level in `0..=1` before the day/night cycle.
    pub light_level: f32,
    /// Hour of day, `0.0..24.0`.
    pub time_of_day: f32,
    pub season: Option<Season>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::weather(Weather::Clear)
    }
}

impl Environment {
    /// A weather environment with scalar presets for the given kind.
    pub fn weather(weather: Weather) -> Self {
        let (temperature, humidity, wind_speed) = match weather {
            Weather::Clear => (22.0, 0.4, 0.3),
            Weather::Cloudy => (17.0, 0.6, 0.6),
            Weather::Rain => (13.0, 0.85, 1.0),
            Weather::Storm => (11.0, 0.9, 2.2),
            Weather::Snow => (-3.0, 0.7, 0.8),
            Weather::Fog => (9.0, 0.95, 0.15),
        };
        Self {
            kind: EnvironmentKind::Weather(weather),
            temperature,
            humidity,
            wind_speed,
            wind_direction: 15.0,
            light_level: 1.0,
            time_of_day: 12.0,
            season: None,
        }
    }

    /// A biome environment with scalar presets for the given kind.
    pub fn biome(biome: Biome) -> Self {
        let (temperature, humidity, wind_speed) = match biome {
            Biome::Forest => (16.0, 0.65, 0.4),
            Biome::Desert => (34.0, 0.1, 1.4),
            Biome::Ocean => (19.0, 0.8, 1.1),
            Biome::Tundra => (-8.0, 0.5, 1.0),
            Biome::Swamp => (24.0, 0.9, 0.2),
            Biome::Meadow => (20.0, 0.5, 0.5),
        };
        Self {
            kind: EnvironmentKind::Biome(biome),
            temperature,
            humidity,
            wind_speed,
            wind_direction: 0.0,
            light_level: 1.0,
            time_of_day: 12.0,
            season: None,
        }
    }

    /// Hour of day, consuming self for builder chaining.
    pub fn at_hour(mut self, hour: f32) -> Self {
        self.time_of_day = hour.rem_euclid(24.0);
        self
    }

    pub fn with_wind(mut self, speed: f32, direction_degrees: f32) -> Self {
        self.wind_speed = speed;
        self.wind_direction = direction_degrees;
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Sky/ground/accent palette for this kind.
    pub fn palette(&self) -> Palette {
        match self.kind {
            EnvironmentKind::Biome(Biome::Forest) => Palette {
                sky: [Vec3::new(0.53, 0.71, 0.60), Vec3::new(0.77, 0.87, 0.72)],
                ground: Vec3::new(0.18, 0.30, 0.16),
                accent: Vec3::new(0.55, 0.78, 0.35),
            },
            EnvironmentKind::Biome(Biome::Desert) => Palette {
                sky: [Vec3::new(0.96, 0.78, 0.52), Vec3::new(0.99, 0.90, 0.70)],
                ground: Vec3::new(0.76, 0.60, 0.38),
                accent: Vec3::new(0.93, 0.80, 0.55),
            },
            EnvironmentKind::Biome(Biome::Ocean) => Palette {
                sky: [Vec3::new(0.35, 0.62, 0.82), Vec3::new(0.62, 0.84, 0.92)],
                ground: Vec3::new(0.06, 0.25, 0.42),
                accent: Vec3::new(0.72, 0.92, 0.96),
            },
            EnvironmentKind::Biome(Biome::Tundra) => Palette {
                sky: [Vec3::new(0.72, 0.80, 0.88), Vec3::new(0.88, 0.93, 0.97)],
                ground: Vec3::new(0.85, 0.89, 0.93),
                accent: Vec3::new(0.65, 0.82, 0.95),
            },
            EnvironmentKind::Biome(Biome::Swamp) => Palette {
                sky: [Vec3::new(0.42, 0.48, 0.36), Vec3::new(0.60, 0.66, 0.48)],
                ground: Vec3::new(0.22, 0.26, 0.15),
                accent: Vec3::new(0.58, 0.72, 0.40),
            },
            EnvironmentKind::Biome(Biome::Meadow) => Palette {
                sky: [Vec3::new(0.55, 0.76, 0.92), Vec3::new(0.80, 0.91, 0.96)],
                ground: Vec3::new(0.36, 0.55, 0.25),
                accent: Vec3::new(0.96, 0.88, 0.45),
            },
            EnvironmentKind::Weather(Weather::Clear) => Palette {
                sky: [Vec3::new(0.40, 0.66, 0.92), Vec3::new(0.72, 0.87, 0.97)],
                ground: Vec3::new(0.42, 0.56, 0.36),
                accent: Vec3::new(0.99, 0.93, 0.60),
            },
            EnvironmentKind::Weather(Weather::Cloudy) => Palette {
                sky: [Vec3::new(0.58, 0.63, 0.70), Vec3::new(0.76, 0.79, 0.84)],
                ground: Vec3::new(0.40, 0.46, 0.42),
                accent: Vec3::new(0.85, 0.87, 0.90),
            },
            EnvironmentKind::Weather(Weather::Rain) => Palette {
                sky: [Vec3::new(0.38, 0.44, 0.54), Vec3::new(0.55, 0.62, 0.70)],
                ground: Vec3::new(0.30, 0.36, 0.34),
                accent: Vec3::new(0.62, 0.72, 0.84),
            },
            EnvironmentKind::Weather(Weather::Storm) => Palette {
                sky: [Vec3::new(0.16, 0.18, 0.26), Vec3::new(0.32, 0.34, 0.44)],
                ground: Vec3::new(0.14, 0.17, 0.20),
                accent: Vec3::new(0.95, 0.95, 0.75),
            },
            EnvironmentKind::Weather(Weather::Snow) => Palette {
                sky: [Vec3::new(0.70, 0.76, 0.85), Vec3::new(0.88, 0.91, 0.96)],
                ground: Vec3::new(0.92, 0.94, 0.97),
                accent: Vec3::new(0.80, 0.88, 0.98),
            },
            EnvironmentKind::Weather(Weather::Fog) => Palette {
                sky: [Vec3::new(0.70, 0.72, 0.75), Vec3::new(0.82, 0.83, 0.85)],
                ground: Vec3::new(0.58, 0.60, 0.62),
                accent: Vec3::new(0.90, 0.90, 0.92),
            },
        }
    }

    /// Relative particle-kind weights used when sampling a new particle's
    /// category at spawn. Never empty.
    pub fn particle_weights(&self) -> Vec<(ParticleKind, f32)> {
        use ParticleKind::*;
        match self.kind {
            EnvironmentKind::Biome(Biome::Forest) => vec![
                (Leaf, 3.0),
                (Pollen, 2.0),
                (Spore, 1.0),
                (Insect, 1.0),
                (Dust, 0.5),
            ],
            EnvironmentKind::Biome(Biome::Desert) => {
                vec![(Sand, 4.0), (Dust, 2.0), (Ember, 0.3)]
            }
            EnvironmentKind::Biome(Biome::Ocean) => {
                vec![(Bubble, 3.0), (Droplet, 2.0), (Fog, 0.8)]
            }
            EnvironmentKind::Biome(Biome::Tundra) => {
                vec![(Snow, 3.0), (Ice, 2.0), (Fog, 0.5)]
            }
            EnvironmentKind::Biome(Biome::Swamp) => vec![
                (Insect, 3.0),
                (Spore, 2.0),
                (Fog, 1.5),
                (Bubble, 0.8),
            ],
            EnvironmentKind::Biome(Biome::Meadow) => {
                vec![(Pollen, 3.0), (Insect, 1.5), (Leaf, 1.0)]
            }
            EnvironmentKind::Weather(Weather::Clear) => {
                vec![(Dust, 2.0), (Pollen, 1.0)]
            }
            EnvironmentKind::Weather(Weather::Cloudy) => {
                vec![(Cloud, 2.0), (Dust, 1.0)]
            }
            EnvironmentKind::Weather(Weather::Rain) => {
                vec![(Rain, 4.0), (Droplet, 1.5), (Cloud, 0.5)]
            }
            EnvironmentKind::Weather(Weather::Storm) => {
                vec![(Rain, 5.0), (Droplet, 2.0), (Cloud, 1.0), (Leaf, 0.5)]
            }
            EnvironmentKind::Weather(Weather::Snow) => {
                vec![(Snow, 4.0), (Ice, 1.0)]
            }
            EnvironmentKind::Weather(Weather::Fog) => {
                vec![(Fog, 3.0), (Droplet, 0.8)]
            }
        }
    }

    /// Spawn-rate multiplier applied to the configured emit rate.
    pub fn spawn_rate_multiplier(&self) -> f32 {
        match self.kind {
            EnvironmentKind::Weather(Weather::Storm) => 2.0,
            EnvironmentKind::Weather(Weather::Rain) => 1.5,
            EnvironmentKind::Weather(Weather::Snow) => 1.2,
            EnvironmentKind::Weather(Weather::Fog) => 0.6,
            EnvironmentKind::Biome(Biome::Swamp) => 1.3,
            _ => 1.0,
        }
    }

    /// Downward-speed scale for falling kinds. Snow drifts; rain does not.
    pub fn fall_speed_scale(&self) -> f32 {
        match self.kind {
            EnvironmentKind::Weather(Weather::Snow) => 0.35,
            EnvironmentKind::Biome(Biome::Tundra) => 0.4,
            EnvironmentKind::Weather(Weather::Storm) => 1.4,
            _ => 1.0,
        }
    }

    /// Horizontal wind bias. Sand rides the wind sideways harder than it
    /// falls; fog barely moves.
    pub fn wind_bias(&self) -> f32 {
        match self.kind {
            EnvironmentKind::Biome(Biome::Desert) => 1.8,
            EnvironmentKind::Weather(Weather::Storm) => 1.4,
            EnvironmentKind::Weather(Weather::Fog) => 0.4,
            _ => 1.0,
        }
    }

    /// Whether the kind precipitates. Used for the rainbow transition.
    pub fn is_precipitation(&self) -> bool {
        matches!(
            self.kind,
            EnvironmentKind::Weather(Weather::Rain) | EnvironmentKind::Weather(Weather::Storm)
        )
    }

    /// Light intensity for the current time of day.
    ///
    /// Daytime (`6..=18`) follows `sin(((t - 6) / 12) * PI)`: zero at
    /// sunrise and sunset, one at noon. Night is a fixed `0.2`.
    pub fn light_intensity(&self) -> f32 {
        let t = self.time_of_day;
        let cycle = if (6.0..=18.0).contains(&t) {
            ((t - 6.0) / 12.0 * PI).sin()
        } else {
            0.2
        };
        cycle * self.light_level.clamp(0.0, 1.0)
    }

    /// Apply the day/night cycle to a base color.
    ///
    /// Night additionally biases toward blue, so scenes cool down instead
    /// of merely darkening.
    pub fn day_night_modulate(&self, base: Vec3) -> Vec3 {
        let intensity = self.light_intensity();
        let lit = base * intensity.max(0.08);
        if (6.0..=18.0).contains(&self.time_of_day) {
            lit
        } else {
            (lit + Vec3::new(0.0, 0.01, 0.06)).clamp(Vec3::ZERO, Vec3::ONE)
        }
    }

    /// Probabilistically emit a transient atmospheric event for this tick.
    ///
    /// Lightning strikes during storms; mist forms at high humidity.
    /// Rainbows are transition events and are emitted by the engine when a
    /// precipitation environment is replaced by a drier one.
    pub fn roll_event(
        &self,
        rng: &mut SmallRng,
        width: f32,
        height: f32,
    ) -> Option<AtmosphericEvent> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        if matches!(self.kind, EnvironmentKind::Weather(Weather::Storm)) && rng.gen::<f32>() < 0.008
        {
            return Some(AtmosphericEvent {
                kind: AtmosphericKind::Lightning,
                intensity: rng.gen_range(0.6..1.0),
                duration: rng.gen_range(5.0..14.0),
                position: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height * 0.4)),
            });
        }
        if self.humidity > 0.75 && rng.gen::<f32>() < 0.002 {
            return Some(AtmosphericEvent {
                kind: AtmosphericKind::Mist,
                intensity: (self.humidity - 0.5) * 1.6,
                duration: rng.gen_range(120.0..300.0),
                position: Vec2::new(width * 0.5, rng.gen_range(height * 0.6..height)),
            });
        }
        None
    }

    /// The rainbow event emitted when rain intensity drops.
    pub(crate) fn rainbow_event(width: f32, height: f32) -> AtmosphericEvent {
        AtmosphericEvent {
            kind: AtmosphericKind::Rainbow,
            intensity: 0.8,
            duration: 400.0,
            position: Vec2::new(width * 0.5, height * 0.55),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn noon_brighter_than_midnight() {
        let noon = Environment::weather(Weather::Clear).at_hour(12.0);
        let midnight = Environment::weather(Weather::Clear).at_hour(0.0);
        assert!(noon.light_intensity() > midnight.light_intensity());
    }

    #[test]
    fn sunrise_and_sunset_are_dark() {
        let dawn = Environment::weather(Weather::Clear).at_hour(6.0);
        let dusk = Environment::weather(Weather::Clear).at_hour(18.0);
        assert!(dawn.light_intensity() < 0.01);
        assert!(dusk.light_intensity() < 0.01);
    }

    #[test]
    fn night_has_blue_bias() {
        let night = Environment::weather(Weather::Clear).at_hour(2.0);
        let base = Vec3::splat(0.5);
        let modulated = night.day_night_modulate(base);
        assert!(modulated.z > modulated.x);
    }

    #[test]
    fn weights_never_empty() {
        for weather in [
            Weather::Clear,
            Weather::Cloudy,
            Weather::Rain,
            Weather::Storm,
            Weather::Snow,
            Weather::Fog,
        ] {
            assert!(!Environment::weather(weather).particle_weights().is_empty());
        }
        for biome in [
            Biome::Forest,
            Biome::Desert,
            Biome::Ocean,
            Biome::Tundra,
            Biome::Swamp,
            Biome::Meadow,
        ] {
            assert!(!Environment::biome(biome).particle_weights().is_empty());
        }
    }

    #[test]
    fn storm_eventually_strikes() {
        let env = Environment::weather(Weather::Storm);
        let mut rng = SmallRng::seed_from_u64(7);
        let hit = (0..5000).any(|_| {
            matches!(
                env.roll_event(&mut rng, 800.0, 600.0),
                Some(AtmosphericEvent {
                    kind: AtmosphericKind::Lightning,
                    ..
                })
            )
        });
        assert!(hit);
    }

    #[test]
    fn no_events_without_surface() {
        let env = Environment::weather(Weather::Storm);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..5000 {
            assert!(env.roll_event(&mut rng, 0.0, 0.0).is_none());
        }
    }

    #[test]
    fn snow_falls_slower() {
        assert!(Environment::weather(Weather::Snow).fall_speed_scale() < 1.0);
        assert!(Environment::biome(Biome::Desert).wind_bias() > 1.0);
    }

    #[test]
    fn environment_from_json() {
        let env: Environment = serde_json::from_str(
            r#"{"kind": {"weather": "storm"}, "time_of_day": 21.0}"#,
        )
        .unwrap();
        assert_eq!(env.kind, EnvironmentKind::Weather(Weather::Storm));
        assert_eq!(env.time_of_day, 21.0);
    }
}
