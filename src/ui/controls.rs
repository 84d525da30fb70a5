//! Keyboard control surface
//!
//! - `1`..`4`: time scale presets (realtime, 100x, 1000x, 10000x)
//! - `O`: toggle orbit lines
//! - `M`: toggle meridian grid
//! - `R`: toggle camera auto-rotation
//! - `S`: recompute and log the sun position now

use bevy::prelude::*;

use crate::core::orbit_camera::CameraSettings;
use crate::orbital::{SimulationClock, SunTracker, TimeScalePreset};
use crate::visualization::{Meridians, OrbitLines};

pub fn preset_for_key(key: KeyCode) -> Option<TimeScalePreset> {
    match key {
        KeyCode::Digit1 => Some(TimeScalePreset::Realtime),
        KeyCode::Digit2 => Some(TimeScalePreset::Fast),
        KeyCode::Digit3 => Some(TimeScalePreset::VeryFast),
        KeyCode::Digit4 => Some(TimeScalePreset::UltraFast),
        _ => None,
    }
}

pub fn keyboard_controls(
    input: Res<ButtonInput<KeyCode>>,
    mut clock: ResMut<SimulationClock>,
    mut orbit_lines: ResMut<OrbitLines>,
    mut meridians: ResMut<Meridians>,
    mut camera: ResMut<CameraSettings>,
    mut tracker: ResMut<SunTracker>,
) {
    for key in input.get_just_pressed() {
        if let Some(preset) = preset_for_key(*key) {
            clock.set_time_scale(preset.scale());
        }
    }

    if input.just_pressed(KeyCode::KeyO) {
        let visible = !orbit_lines.visible;
        orbit_lines.toggle_orbit_lines(visible);
    }
    if input.just_pressed(KeyCode::KeyM) {
        meridians.visible = !meridians.visible;
        info!("Meridian grid: {}", meridians.visible);
    }
    if input.just_pressed(KeyCode::KeyR) {
        camera.0.auto_rotate = !camera.0.auto_rotate;
        info!("Camera auto-rotate: {}", camera.0.auto_rotate);
    }
    if input.just_pressed(KeyCode::KeyS) {
        tracker.update(true);
    }
}
