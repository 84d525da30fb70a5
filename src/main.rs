use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::GlobalAmbientLight;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::PanOrbitCameraPlugin;

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod config;
mod core;
mod orbital;
mod ui;
mod visualization;

use crate::config::CelestialConfig;
use crate::core::orbit_camera::{CameraSettings, OrbitCameraPlugin, pan_orbit_for};
use crate::orbital::OrbitalPlugin;
use crate::ui::UiPlugin;
use crate::visualization::VisualizationPlugin;

/// Marker for the main scene camera
#[derive(Component)]
pub struct MainCamera;

// Setup scene camera and ambient light
pub fn setup(mut commands: Commands, camera_settings: Res<CameraSettings>) {
    // Keep the night side faintly visible
    commands.insert_resource(GlobalAmbientLight {
        brightness: 80.0,
        ..default()
    });

    let distance = camera_settings.0.distance;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            // Scene units are Earth radii; the outermost planet orbits at ~17.5
            near: 0.01,
            far: 1_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        pan_orbit_for(&camera_settings.0),
        MainCamera,
        Tonemapping::TonyMcMapface,
        Transform::from_xyz(0.0, 0.0, distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Earth Desk".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    let config = match CelestialConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!("Falling back to default configuration: {:#}", err);
            CelestialConfig::default()
        }
    };

    app.insert_resource(CameraSettings(config.camera.clone()))
        .insert_resource(config)
        .add_plugins((
            MeshPickingPlugin,
            PanOrbitCameraPlugin,
            OrbitCameraPlugin,
            OrbitalPlugin,
            VisualizationPlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}
