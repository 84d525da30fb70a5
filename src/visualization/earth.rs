//! Earth globe and surface picking.

use bevy::prelude::*;

use crate::core::coordinates::{EARTH_RADIUS, GeoCoordinates};

/// Marker component for the Earth entity. The moon's orbit is parented to it.
#[derive(Component)]
pub struct Earth;

/// Plugin for Earth rendering
pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_earth);
    }
}

/// Spawn the unit Earth sphere at the origin
pub fn spawn_earth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(EARTH_RADIUS as f32).mesh().uv(128, 64));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.18, 0.38, 0.72),
        perceptual_roughness: 0.8,
        metallic: 0.0,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, 0.0, 0.0),
            Visibility::Visible,
            Earth,
            Name::new("Earth"),
        ))
        .observe(|mut event: On<Pointer<Click>>, earth: Query<Entity, With<Earth>>| {
            let Ok(earth) = earth.single() else {
                return;
            };
            let picked = surface_click(event.original_event_target(), earth, event.hit.position);
            if let Some(coords) = picked {
                let (lat, lon) = coords.as_degrees();
                info!("Latlon of selected point: Lat: {:.3}, Lon: {:.3}", lat, lon);
            }
            event.propagate(false);
        });
}

/// Geographic coordinates of a click, if it landed on the Earth itself.
/// Clicks on children (moon, location marker) bubble up here and are ignored.
pub fn surface_click(
    target: Entity,
    earth: Entity,
    position: Option<Vec3>,
) -> Option<GeoCoordinates> {
    if target != earth {
        return None;
    }
    position.map(GeoCoordinates::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_on_earth_yields_coordinates() {
        let mut world = World::new();
        let earth = world.spawn(Earth).id();
        let coords = surface_click(earth, earth, Some(Vec3::Z)).unwrap();
        let (lat, lon) = coords.as_degrees();
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!(surface_click(earth, earth, None).is_none());
    }

    #[test]
    fn test_click_on_child_is_ignored() {
        let mut world = World::new();
        let earth = world.spawn(Earth).id();
        let moon = world.spawn(ChildOf(earth)).id();
        assert!(surface_click(moon, earth, Some(Vec3::new(0.15, 0.0, 0.0))).is_none());
    }
}
