//! Blinking location marker on the Earth's surface.

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::config::CelestialConfig;
use crate::core::coordinates::GeoCoordinates;
use crate::visualization::earth::{Earth, spawn_earth};

const MARKER_RADIUS: f32 = 0.015;
const GLOW_RADIUS: f32 = 0.025;
/// Slightly above the surface to avoid z-fighting
const MARKER_ALTITUDE: f64 = 1.002;

#[derive(Component)]
pub struct LocationMarker {
    pub glow: bool,
}

/// Marker opacity at `t` seconds: 0.5 + 0.5·sin(πt), a 2 s blink.
pub fn blink_opacity(t: f32) -> f32 {
    0.5 + 0.5 * (t * PI).sin()
}

pub struct LocationMarkerPlugin;

impl Plugin for LocationMarkerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_location_marker.after(spawn_earth))
            .add_systems(Update, blink_location_marker);
    }
}

fn spawn_location_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<CelestialConfig>,
    earth: Query<Entity, With<Earth>>,
) {
    let Some(location) = config.location else {
        return;
    };
    let coords = match GeoCoordinates::from_degrees(location.latitude, location.longitude) {
        Ok(coords) => coords,
        Err(err) => {
            warn!("Location marker disabled: {}", err);
            return;
        }
    };
    let Ok(earth) = earth.single() else {
        warn!("Location marker: Earth entity not found");
        return;
    };

    // Real geographic position, no texture offset
    let position = coords.to_scene(MARKER_ALTITUDE, 0.0).as_vec3();
    let up = position.normalize_or_zero();
    let transform =
        Transform::from_translation(position).with_rotation(Quat::from_rotation_arc(Vec3::Y, up));

    let marker_material = StandardMaterial {
        base_color: Color::srgba_u8(0xff, 0x33, 0x33, 230),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    };
    let glow_material = StandardMaterial {
        base_color: Color::srgba_u8(0xff, 0x66, 0x66, 102),
        ..marker_material.clone()
    };

    commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(MARKER_RADIUS).mesh().uv(16, 16))),
            MeshMaterial3d(materials.add(marker_material)),
            transform,
            LocationMarker { glow: false },
            ChildOf(earth),
            Name::new("Location Marker"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Sphere::new(GLOW_RADIUS).mesh().uv(16, 16))),
                MeshMaterial3d(materials.add(glow_material)),
                LocationMarker { glow: true },
            ));
        });

    info!(
        "Location marker added: lat {:.3}°, lon {:.3}°",
        location.latitude, location.longitude
    );
}

fn blink_location_marker(
    time: Res<Time>,
    markers: Query<(&LocationMarker, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let opacity = blink_opacity(time.elapsed_secs());
    for (marker, material3d) in &markers {
        if let Some(material) = materials.get_mut(&material3d.0) {
            let alpha = if marker.glow { opacity * 0.4 } else { opacity };
            material.base_color.set_alpha(alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_opacity_range() {
        for i in 0..200 {
            let o = blink_opacity(i as f32 * 0.05);
            assert!((0.0..=1.0).contains(&o));
        }
        assert!((blink_opacity(0.0) - 0.5).abs() < 1e-6);
        assert!((blink_opacity(0.5) - 1.0).abs() < 1e-6);
        assert!(blink_opacity(1.5).abs() < 1e-6);
    }
}
