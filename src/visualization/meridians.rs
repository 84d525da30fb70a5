//! Meridian grid overlay

use bevy::prelude::*;

use crate::config::CelestialConfig;
use crate::core::coordinates::GeoCoordinates;

const MERIDIAN_RADIUS: f64 = 1.015;
const MERIDIAN_STEP_DEG: i32 = 30;
const LATITUDE_STEP_DEG: i32 = 5;

#[derive(Resource, Debug, Default)]
pub struct Meridians {
    pub visible: bool,
    lines: Vec<Vec<Vec3>>,
}

impl Meridians {
    /// Lines every 30° of longitude, shifted by the texture alignment offset.
    pub fn build(longitude_offset_deg: f64) -> Vec<Vec<Vec3>> {
        (-180..180)
            .step_by(MERIDIAN_STEP_DEG as usize)
            .map(|lon| {
                (-90..=90)
                    .step_by(LATITUDE_STEP_DEG as usize)
                    .filter_map(|lat| GeoCoordinates::from_degrees(lat as f64, lon as f64).ok())
                    .map(|coord| coord.to_scene(MERIDIAN_RADIUS, longitude_offset_deg).as_vec3())
                    .collect()
            })
            .collect()
    }
}

pub struct MeridiansPlugin;

impl Plugin for MeridiansPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Meridians>()
            .add_systems(Startup, init_meridians)
            .add_systems(Update, draw_meridians);
    }
}

fn init_meridians(config: Res<CelestialConfig>, mut meridians: ResMut<Meridians>) {
    meridians.visible = config.show_meridians;
    meridians.lines = Meridians::build(config.longitude_offset_deg);
}

fn draw_meridians(mut gizmos: Gizmos, meridians: Res<Meridians>) {
    if !meridians.visible {
        return;
    }
    let color = Color::srgba(1.0, 0.84, 0.0, 0.6);
    for line in &meridians.lines {
        gizmos.linestrip(line.iter().copied(), color);
    }
}
