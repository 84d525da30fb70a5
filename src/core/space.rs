//! Scene-space position types shared between the orbital core and rendering.

use bevy::math::{DQuat, DVec3, Quat, Vec3};
use bevy::prelude::*;

/// Canonical scene position in Earth radii (f64). The render translation is
/// derived from it, never written directly.
#[derive(Component, Copy, Clone, Debug, Default, PartialEq, Deref, DerefMut)]
pub struct ScenePosition(pub DVec3);

/// Narrow changed scene positions into render translations.
pub fn apply_scene_positions(
    mut query: Query<(&ScenePosition, &mut Transform), Changed<ScenePosition>>,
) {
    for (position, mut transform) in &mut query {
        transform.translation = to_render(position.0);
    }
}

/// Narrow a core (f64) position to a Bevy render translation (f32).
pub fn to_render(v: DVec3) -> Vec3 {
    v.as_vec3()
}

/// Narrow a core (f64) rotation to a Bevy render rotation (f32).
pub fn to_render_quat(q: DQuat) -> Quat {
    q.as_quat()
}
