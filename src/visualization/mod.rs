//! Visualization module
//!
//! Renders the Earth, the sun light, celestial bodies and overlays. Every
//! system here reads orbital state and never writes it.

use bevy::prelude::*;

pub mod celestial;
pub mod earth;
pub mod lighting;
pub mod marker;
pub mod meridians;
pub mod orbit_lines;

pub use celestial::CelestialPlugin;
pub use earth::EarthPlugin;
pub use lighting::{spawn_sun_light, update_sun_light_direction};
pub use marker::LocationMarkerPlugin;
pub use meridians::{Meridians, MeridiansPlugin};
pub use orbit_lines::{OrbitLines, OrbitLinesPlugin};

use crate::orbital::OrbitalSystems;

/// Plugin for visualization systems
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            EarthPlugin,
            CelestialPlugin,
            OrbitLinesPlugin,
            MeridiansPlugin,
            LocationMarkerPlugin,
        ))
        .add_systems(Startup, spawn_sun_light)
        .add_systems(
            Update,
            update_sun_light_direction.after(OrbitalSystems::Sun),
        );
    }
}
