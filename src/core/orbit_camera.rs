//! Glue between `bevy_panorbit_camera` and the configured camera behavior.
//!
//! Rotation and zoom can be locked for wallpaper use by zeroing the matching
//! sensitivity; auto-rotation nudges the target yaw every frame.

use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraSystemSet};

use crate::config::CameraConfig;

/// Runtime copy of the camera settings
#[derive(Resource, Debug, Clone)]
pub struct CameraSettings(pub CameraConfig);

pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_camera_settings, auto_rotate_camera).before(PanOrbitCameraSystemSet),
        );
    }
}

/// Build the PanOrbit controller for the configured distance
pub fn pan_orbit_for(config: &CameraConfig) -> PanOrbitCamera {
    PanOrbitCamera {
        focus: Vec3::ZERO,
        radius: Some(config.distance),
        yaw: Some(0.0),
        pitch: Some(0.0),
        force_update: true,
        ..default()
    }
}

fn apply_camera_settings(
    settings: Res<CameraSettings>,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    if !settings.is_changed() {
        return;
    }
    let defaults = PanOrbitCamera::default();
    for mut cam in &mut cameras {
        cam.orbit_sensitivity = if settings.0.enable_rotate {
            defaults.orbit_sensitivity
        } else {
            0.0
        };
        cam.zoom_sensitivity = if settings.0.enable_zoom {
            defaults.zoom_sensitivity
        } else {
            0.0
        };
    }
}

fn auto_rotate_camera(
    time: Res<Time>,
    settings: Res<CameraSettings>,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    if !settings.0.auto_rotate {
        return;
    }
    let step = settings.0.auto_rotate_speed * time.delta_secs();
    for mut cam in &mut cameras {
        cam.target_yaw += step;
    }
}
