//! Sun light placement
//!
//! A single directional light sits at `light_position` (the sun direction
//! scaled by the configured distance) and aims at the Earth's center.

use bevy::prelude::*;

use crate::config::CelestialConfig;
use crate::orbital::SunDirection;

#[derive(Component)]
pub struct SunLight;

/// Transform for a light `distance` units out along `direction`, aimed at the
/// origin. `None` for a degenerate direction.
pub fn sun_light_transform(direction: Vec3, distance: f32) -> Option<Transform> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    // Avoid a degenerate up vector with the sun straight over a pole
    let up = if dir.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    Some(Transform::from_translation(dir * distance).looking_at(Vec3::ZERO, up))
}

pub fn spawn_sun_light(
    mut commands: Commands,
    sun_direction: Res<SunDirection>,
    config: Res<CelestialConfig>,
) {
    let transform = sun_light_transform(sun_direction.0, config.sun_light_distance as f32)
        .unwrap_or_else(|| Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            color: Color::srgb_u8(0xff, 0xf5, 0xe6),
            shadows_enabled: false,
            ..default()
        },
        SunLight,
        transform,
        Name::new("Sun Light"),
    ));
}

/// Follow the throttled sun direction
pub fn update_sun_light_direction(
    sun_direction: Res<SunDirection>,
    config: Res<CelestialConfig>,
    mut lights: Query<&mut Transform, With<SunLight>>,
) {
    if !sun_direction.is_changed() {
        return;
    }
    let Some(target) = sun_light_transform(sun_direction.0, config.sun_light_distance as f32)
    else {
        return;
    };
    for mut transform in &mut lights {
        *transform = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_sits_on_sun_direction() {
        let t = sun_light_transform(Vec3::new(0.0, 0.0, 2.0), 5.0).unwrap();
        assert!((t.translation - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        // Light shines toward the origin
        assert!((t.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_polar_sun_is_not_degenerate() {
        let t = sun_light_transform(Vec3::Y, 5.0).unwrap();
        assert!(t.rotation.is_finite());
        assert!((t.forward().as_vec3() - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(sun_light_transform(Vec3::ZERO, 5.0).is_none());
    }
}
