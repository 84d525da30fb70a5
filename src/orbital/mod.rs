//! Orbital mechanics module
//!
//! This module handles the sun position calculation, the simulation clock and
//! the per-frame motion of the moon, sun proxy, planets and comet.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub mod bodies;
pub mod comet;
pub mod sun;
pub mod time;

pub use bodies::{BodyKind, BodyRegistry, OrbitalBody, tick_orbital_bodies};
pub use sun::{SunDirection, SunTracker, update_sun_tracker};
pub use time::{SimulationClock, TimeScalePreset};

use crate::config::CelestialConfig;

/// Ordering for orbital systems within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrbitalSystems {
    Sun,
    Motion,
}

/// Plugin for orbital mechanics and time management
pub struct OrbitalPlugin;

impl Plugin for OrbitalPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<CelestialConfig>()
            .cloned()
            .unwrap_or_default();

        let seed = config.seed.unwrap_or_else(rand::random);
        info!("Orbital phase seed: {}", seed);
        let registry = BodyRegistry::from_config(&config, &mut StdRng::seed_from_u64(seed));
        let tracker = SunTracker::from_config(&config);
        let sun_direction = SunDirection(tracker.state().direction.as_vec3());

        app.insert_resource(SimulationClock::new(config.time_scale))
            .insert_resource(registry)
            .insert_resource(tracker)
            .insert_resource(sun_direction)
            .configure_sets(Update, (OrbitalSystems::Sun, OrbitalSystems::Motion).chain())
            .add_systems(Update, update_sun_tracker.in_set(OrbitalSystems::Sun))
            .add_systems(Update, tick_orbital_bodies.in_set(OrbitalSystems::Motion));
    }
}
