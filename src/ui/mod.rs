//! User interface module
//!
//! Keyboard shortcuts exposing the runtime controls: time scale, orbit lines,
//! meridians, camera auto-rotation and a forced sun update.

use bevy::prelude::*;

pub mod controls;

pub use controls::keyboard_controls;

use crate::orbital::OrbitalSystems;

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_controls.before(OrbitalSystems::Sun));
    }
}
