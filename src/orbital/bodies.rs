//! Celestial body registry and per-tick orbital motion.
//!
//! Every body is advanced once per frame in a fixed order: moon, sun proxy,
//! planets, comet. The comet's tails read the sun light position of the same
//! tick, so nothing that feeds them may run later in the frame.

use bevy::math::DVec3;
use bevy::prelude::*;
use rand::Rng;
use std::f64::consts::TAU;

use crate::config::{BodyConfig, BodyKindConfig, CelestialConfig};
use crate::orbital::comet::{CometTails, EllipticalOrbit};
use crate::orbital::sun::{SolarState, SunTracker};
use crate::orbital::time::{SECONDS_PER_DAY, SimulationClock};

/// Sun proxy distance used when the config does not give one.
pub const DEFAULT_SUN_VISUAL_DISTANCE: f64 = 12.0;
pub const DEFAULT_TAIL_LENGTH: f64 = 1.2;
const SUN_PULSE_RATE: f64 = 0.5;
const SUN_PULSE_AMPLITUDE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub radius: f64,
    pub period_days: f64,
}

impl CircularOrbit {
    pub fn period_secs(&self) -> f64 {
        self.period_days * SECONDS_PER_DAY
    }

    /// Absolute phase after `elapsed_sim_secs` starting from zero.
    pub fn phase_at(&self, elapsed_sim_secs: f64) -> f64 {
        elapsed_sim_secs / self.period_secs() * TAU
    }

    /// Phase advance (radians) for a simulated time step.
    pub fn phase_delta(&self, delta_sim_secs: f64) -> f64 {
        delta_sim_secs / self.period_secs() * TAU
    }

    pub fn position(&self, phase: f64) -> DVec3 {
        DVec3::new(phase.cos() * self.radius, 0.0, phase.sin() * self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rings {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

/// Motion law per body kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Orbits the Earth; phase is an absolute function of simulated time.
    /// Its position is relative to the Earth's frame.
    Satellite {
        orbit: CircularOrbit,
        tidal_lock: bool,
    },
    /// Visual sun proxy placed along the illumination direction.
    Star { visual_distance: f64 },
    /// Circular orbit with an incrementally accumulated phase.
    Planet {
        orbit: CircularOrbit,
        rings: Option<Rings>,
    },
    /// Center-anchored elliptical orbit with sun-dependent tails.
    Comet {
        orbit: EllipticalOrbit,
        tail_length: f64,
        tails: CometTails,
    },
}

impl BodyKind {
    /// Position in the per-tick update order.
    fn update_rank(&self) -> u8 {
        match self {
            BodyKind::Satellite { .. } => 0,
            BodyKind::Star { .. } => 1,
            BodyKind::Planet { .. } => 2,
            BodyKind::Comet { .. } => 3,
        }
    }
}

/// Transform-like output consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: DVec3,
    /// Spin about the body's own Y axis (tidal lock).
    pub rotation_y: Option<f64>,
    /// Uniform scale factor (sun pulsation).
    pub scale: f64,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation_y: None,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    pub key: String,
    pub radius: f64,
    pub color: [f32; 3],
    pub kind: BodyKind,
    /// Radians; accumulates without wrapping.
    pub phase_angle: f64,
    pub pose: BodyPose,
}

impl OrbitalBody {
    /// Build a body from validated configuration.
    fn from_config(key: &str, config: &BodyConfig, initial_phase: f64) -> Self {
        let circular = || CircularOrbit {
            radius: config.orbit_radius.unwrap_or_default(),
            period_days: config.orbit_period_days.unwrap_or_default(),
        };
        let kind = match config.kind {
            BodyKindConfig::Satellite => BodyKind::Satellite {
                orbit: circular(),
                tidal_lock: true,
            },
            BodyKindConfig::Star => BodyKind::Star {
                visual_distance: config
                    .visual_distance
                    .unwrap_or(DEFAULT_SUN_VISUAL_DISTANCE),
            },
            BodyKindConfig::Planet => BodyKind::Planet {
                orbit: circular(),
                rings: match (
                    config.has_rings,
                    config.ring_inner_radius,
                    config.ring_outer_radius,
                ) {
                    (true, Some(inner_radius), Some(outer_radius)) => Some(Rings {
                        inner_radius,
                        outer_radius,
                    }),
                    _ => None,
                },
            },
            BodyKindConfig::Comet => BodyKind::Comet {
                orbit: EllipticalOrbit {
                    semi_major: config.orbit_radius.unwrap_or_default(),
                    eccentricity: config.orbit_eccentricity.unwrap_or(0.0),
                    period_days: config.orbit_period_days.unwrap_or_default(),
                },
                tail_length: config.tail_length.unwrap_or(DEFAULT_TAIL_LENGTH),
                tails: CometTails::default(),
            },
        };

        let mut body = Self {
            key: key.to_string(),
            radius: config.radius,
            color: config.color,
            kind,
            phase_angle: initial_phase,
            pose: BodyPose::default(),
        };
        body.pose.position = body.orbit_position().unwrap_or(DVec3::ZERO);
        body
    }

    /// Position on the orbit for the current phase; `None` for the sun proxy.
    fn orbit_position(&self) -> Option<DVec3> {
        match &self.kind {
            BodyKind::Satellite { orbit, .. } | BodyKind::Planet { orbit, .. } => {
                Some(orbit.position(self.phase_angle))
            }
            BodyKind::Comet { orbit, .. } => Some(orbit.position(self.phase_angle)),
            BodyKind::Star { .. } => None,
        }
    }

    /// Apply this body's motion law for one tick.
    fn advance(&mut self, delta_sim_secs: f64, elapsed_sim_secs: f64, solar: &SolarState) {
        match &mut self.kind {
            BodyKind::Satellite { orbit, tidal_lock } => {
                self.phase_angle = orbit.phase_at(elapsed_sim_secs);
                self.pose.position = orbit.position(self.phase_angle);
                self.pose.rotation_y = tidal_lock.then_some(-self.phase_angle);
            }
            BodyKind::Star { visual_distance } => {
                self.pose.position = solar.direction * *visual_distance;
                self.pose.scale =
                    1.0 + (elapsed_sim_secs * SUN_PULSE_RATE).sin() * SUN_PULSE_AMPLITUDE;
            }
            BodyKind::Planet { orbit, .. } => {
                self.phase_angle += orbit.phase_delta(delta_sim_secs);
                self.pose.position = orbit.position(self.phase_angle);
            }
            BodyKind::Comet { orbit, tails, .. } => {
                self.phase_angle += orbit.phase_delta(delta_sim_secs);
                self.pose.position = orbit.position(self.phase_angle);
                *tails = CometTails::compute(
                    self.pose.position,
                    self.phase_angle,
                    solar.light_position,
                );
            }
        }
    }

    /// Sample the orbit path for the orbit-line overlay. Empty for the sun.
    pub fn orbit_path(&self, segments: usize) -> Vec<DVec3> {
        let segments = segments.max(3);
        (0..=segments)
            .filter_map(|i| {
                let phase = i as f64 / segments as f64 * TAU;
                match &self.kind {
                    BodyKind::Satellite { orbit, .. } | BodyKind::Planet { orbit, .. } => {
                        Some(orbit.position(phase))
                    }
                    BodyKind::Comet { orbit, .. } => Some(orbit.position(phase)),
                    BodyKind::Star { .. } => None,
                }
            })
            .collect()
    }
}

/// Owns every enabled body. The renderer only reads from it.
#[derive(Resource, Debug, Default, Clone)]
pub struct BodyRegistry {
    bodies: Vec<OrbitalBody>,
}

impl BodyRegistry {
    /// Build the registry from configuration. Disabled bodies are skipped and
    /// invalid ones are disabled with a warning. Planet phases are drawn from
    /// `rng` so a seeded generator reproduces the same sky.
    pub fn from_config(config: &CelestialConfig, rng: &mut impl Rng) -> Self {
        if !config.enabled {
            info!("Celestial system disabled");
            return Self::default();
        }

        let mut bodies = Vec::new();
        for (key, body) in &config.bodies {
            if !body.enabled {
                debug!("Skipping disabled body {}", key);
                continue;
            }
            if let Err(err) = body.validate(key) {
                warn!("Disabling body {}: {}", key, err);
                continue;
            }
            let initial_phase = match body.kind {
                BodyKindConfig::Planet => rng.gen_range(0.0..TAU),
                _ => 0.0,
            };
            bodies.push(OrbitalBody::from_config(key, body, initial_phase));
            info!("Created body {}", key);
        }

        Self::from_bodies(bodies)
    }

    /// Build from already constructed bodies, enforcing the update order.
    pub fn from_bodies(mut bodies: Vec<OrbitalBody>) -> Self {
        bodies.sort_by(|a, b| {
            let radius = |body: &OrbitalBody| match &body.kind {
                BodyKind::Planet { orbit, .. } => orbit.radius,
                _ => 0.0,
            };
            a.kind
                .update_rank()
                .cmp(&b.kind.update_rank())
                .then(radius(a).total_cmp(&radius(b)))
        });
        Self { bodies }
    }

    /// Advance the clock by a real-time delta and update every body.
    /// A zero delta leaves every phase and position unchanged.
    pub fn tick(&mut self, delta_real_secs: f64, clock: &mut SimulationClock, solar: &SolarState) {
        let delta_sim = clock.advance(delta_real_secs);
        let elapsed = clock.elapsed_sim_secs();
        for body in &mut self.bodies {
            body.advance(delta_sim, elapsed, solar);
        }
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&OrbitalBody> {
        self.bodies.iter().find(|b| b.key == key)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Once-per-frame orbital tick driven by Bevy's real frame delta.
pub fn tick_orbital_bodies(
    time: Res<Time>,
    tracker: Res<SunTracker>,
    mut clock: ResMut<SimulationClock>,
    mut registry: ResMut<BodyRegistry>,
) {
    registry.tick(time.delta_secs_f64(), &mut clock, &tracker.state());
}
