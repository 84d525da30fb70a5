//! Orbit path overlay drawn with gizmos.

use bevy::prelude::*;

use crate::config::CelestialConfig;
use crate::core::space::to_render;
use crate::orbital::BodyRegistry;

/// Orbit-line overlay state. Affects drawing only, never body motion.
#[derive(Resource, Debug)]
pub struct OrbitLines {
    pub visible: bool,
    pub segments: usize,
    pub color: Color,
    paths: Vec<Vec<Vec3>>,
}

impl Default for OrbitLines {
    fn default() -> Self {
        Self {
            visible: false,
            segments: 128,
            color: Color::srgba(0.27, 0.27, 0.27, 0.3),
            paths: Vec::new(),
        }
    }
}

impl OrbitLines {
    pub fn toggle_orbit_lines(&mut self, visible: bool) {
        self.visible = visible;
        info!("Orbit lines {}", if visible { "shown" } else { "hidden" });
    }

    /// Resample every body's path from the registry.
    pub fn rebuild(&mut self, registry: &BodyRegistry) {
        self.paths = registry
            .bodies()
            .iter()
            .map(|body| {
                body.orbit_path(self.segments)
                    .into_iter()
                    .map(to_render)
                    .collect::<Vec<_>>()
            })
            .filter(|path| !path.is_empty())
            .collect();
    }
}

pub struct OrbitLinesPlugin;

impl Plugin for OrbitLinesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitLines>()
            .add_systems(Startup, init_orbit_lines)
            .add_systems(Update, draw_orbit_lines);
    }
}

fn init_orbit_lines(
    config: Res<CelestialConfig>,
    registry: Res<BodyRegistry>,
    mut lines: ResMut<OrbitLines>,
) {
    lines.visible = config.show_orbits;
    lines.rebuild(&registry);
}

pub fn draw_orbit_lines(mut gizmos: Gizmos, lines: Res<OrbitLines>) {
    if !lines.visible {
        return;
    }
    for path in &lines.paths {
        gizmos.linestrip(path.iter().copied(), lines.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rebuild_skips_sun() {
        let registry =
            BodyRegistry::from_config(&CelestialConfig::default(), &mut StdRng::seed_from_u64(1));
        let mut lines = OrbitLines::default();
        lines.rebuild(&registry);
        // Every body except the sun proxy has an orbit
        assert_eq!(lines.paths.len(), registry.len() - 1);
    }

    #[test]
    fn test_toggle() {
        let mut lines = OrbitLines::default();
        assert!(!lines.visible);
        lines.toggle_orbit_lines(true);
        assert!(lines.visible);
        lines.toggle_orbit_lines(false);
        assert!(!lines.visible);
    }
}
