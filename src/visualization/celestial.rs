//! Meshes for the moon, sun proxy, planets and comet.
//!
//! Transforms are copied from `BodyRegistry` every frame; nothing here writes
//! back into the orbital state.

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::core::space::{ScenePosition, apply_scene_positions, to_render, to_render_quat};
use crate::orbital::{BodyKind, BodyRegistry, OrbitalBody, OrbitalSystems};
use crate::visualization::earth::{Earth, spawn_earth};

/// Links a rendered entity to its body in the registry.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyVisual {
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CometPartKind {
    Coma,
    IonTail,
    DustTail,
}

/// Sun core mesh; pulsates without scaling the glow shells around it.
#[derive(Component, Debug, Clone, Copy)]
pub struct SunCore {
    pub body_index: usize,
}

/// Child entity of the comet whose orientation/opacity follow the tails.
#[derive(Component, Debug, Clone, Copy)]
pub struct CometPart {
    pub body_index: usize,
    pub kind: CometPartKind,
}

pub struct CelestialPlugin;

impl Plugin for CelestialPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_celestial_bodies.after(spawn_earth))
            .add_systems(
                Update,
                (
                    (sync_body_transforms, apply_scene_positions).chain(),
                    sync_sun_core,
                    sync_comet_parts,
                )
                    .after(OrbitalSystems::Motion),
            );
    }
}

fn body_color(body: &OrbitalBody) -> Color {
    let [r, g, b] = body.color;
    Color::srgb(r, g, b)
}

/// Tail mesh with its tip at the origin, extending along -X.
fn tail_mesh(length: f32, radius: f32) -> Mesh {
    Mesh::from(Cone {
        radius,
        height: length,
    })
    .rotated_by(Quat::from_rotation_z(-FRAC_PI_2))
    .translated_by(Vec3::new(-length / 2.0, 0.0, 0.0))
}

fn glow_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        ..default()
    }
}

pub fn spawn_celestial_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    registry: Res<BodyRegistry>,
    earth: Query<Entity, With<Earth>>,
) {
    if registry.is_empty() {
        return;
    }

    for (index, body) in registry.bodies().iter().enumerate() {
        let radius = body.radius as f32;
        let color = body_color(body);
        let transform = Transform::from_translation(to_render(body.pose.position));
        let common = (
            Name::new(body.key.clone()),
            BodyVisual { index },
            ScenePosition(body.pose.position),
            transform,
            Visibility::Visible,
        );

        match &body.kind {
            BodyKind::Satellite { .. } => {
                let mesh = meshes.add(Sphere::new(radius).mesh().uv(64, 32));
                let material = materials.add(StandardMaterial {
                    base_color: color,
                    emissive: LinearRgba::rgb(0.2, 0.2, 0.2),
                    perceptual_roughness: 1.0,
                    ..default()
                });
                let mut entity = commands.spawn((common, Mesh3d(mesh), MeshMaterial3d(material)));
                // The moon orbits the Earth's frame, not the world root
                if let Ok(earth) = earth.single() {
                    entity.insert(ChildOf(earth));
                }
            }
            BodyKind::Star { .. } => {
                let core = meshes.add(Sphere::new(radius).mesh().uv(64, 32));
                let core_material = materials.add(StandardMaterial {
                    base_color: color,
                    emissive: color.to_linear() * 4.0,
                    unlit: true,
                    ..default()
                });
                let glows = [
                    (1.2, Color::srgba(1.0, 1.0, 0.0, 0.5)),
                    (1.5, Color::srgba(1.0, 0.87, 0.53, 0.3)),
                    (2.0, Color::srgba(1.0, 0.67, 0.27, 0.15)),
                ]
                .map(|(factor, glow)| {
                    (
                        meshes.add(Sphere::new(radius * factor).mesh().uv(64, 32)),
                        materials.add(glow_material(glow)),
                    )
                });
                commands.spawn(common).with_children(|parent| {
                    parent.spawn((
                        Mesh3d(core),
                        MeshMaterial3d(core_material),
                        Transform::default(),
                        SunCore { body_index: index },
                    ));
                    for (mesh, material) in glows {
                        parent.spawn((Mesh3d(mesh), MeshMaterial3d(material)));
                    }
                });
            }
            BodyKind::Planet { rings, .. } => {

                let mesh = meshes.add(Sphere::new(radius).mesh().uv(64, 32));
                let material = materials.add(StandardMaterial {
                    base_color: color,
                    perceptual_roughness: 0.7,
                    ..default()
                });
                let ring = rings.map(|rings| {
                    (
                        meshes.add(Annulus::new(
                            rings.inner_radius as f32,
                            rings.outer_radius as f32,
                        )),
                        materials.add(StandardMaterial {
                            base_color: Color::srgba_u8(0xcc, 0xaa, 0x88, 178),
                            alpha_mode: AlphaMode::Blend,
                            double_sided: true,
                            cull_mode: None,
                            unlit: true,
                            ..default()
                        }),
                    )
                });
                commands
                    .spawn((common, Mesh3d(mesh), MeshMaterial3d(material)))
                    .with_children(|parent| {
                        if let Some((mesh, material)) = ring {
                            parent.spawn((
                                Mesh3d(mesh),
                                MeshMaterial3d(material),
                                Transform::from_rotation(Quat::from_rotation_x(PI / 2.0)),
                            ));
                        }
                    });
            }
            BodyKind::Comet { tail_length, .. } => {
                let length = *tail_length as f32;
                let nucleus = meshes.add(Sphere::new(radius).mesh().uv(32, 16));
                let nucleus_material = materials.add(StandardMaterial {
                    base_color: color,
                    emissive: LinearRgba::rgb(0.07, 0.07, 0.07),
                    perceptual_roughness: 1.0,
                    ..default()
                });
                let parts = [
                    (
                        CometPartKind::Coma,
                        meshes.add(Sphere::new(radius * 3.0).mesh().uv(32, 16)),
                        Color::srgba_u8(0xaa, 0xdd, 0xff, 38),
                    ),
                    (
                        CometPartKind::IonTail,
                        meshes.add(tail_mesh(length * 1.5, radius * 1.5)),
                        Color::srgba_u8(0x88, 0xaa, 0xff, 178),
                    ),
                    (
                        CometPartKind::DustTail,
                        meshes.add(tail_mesh(length, radius * 4.0)),
                        Color::srgba_u8(0xff, 0xee, 0xaa, 128),
                    ),
                ]
                .map(|(kind, mesh, glow)| (kind, mesh, materials.add(glow_material(glow))));

                commands
                    .spawn((common, Mesh3d(nucleus), MeshMaterial3d(nucleus_material)))
                    .with_children(|parent| {
                        for (kind, mesh, material) in parts {
                            parent.spawn((
                                Mesh3d(mesh),
                                MeshMaterial3d(material),
                                Transform::default(),
                                CometPart {
                                    body_index: index,
                                    kind,
                                },
                            ));
                        }
                    });
            }
        }
    }
    info!("Spawned {} celestial bodies", registry.len());
}

/// Copy each body's pose into its scene position and spin
pub fn sync_body_transforms(
    registry: Res<BodyRegistry>,
    mut query: Query<(&BodyVisual, &mut Transform, &mut ScenePosition)>,
) {
    if !registry.is_changed() {
        return;
    }

    for (visual, mut transform, mut scene_pos) in &mut query {
        let Some(body) = registry.bodies().get(visual.index) else {
            continue;
        };
        scene_pos.set_if_neq(ScenePosition(body.pose.position));
        transform.rotation = body
            .pose
            .rotation_y
            .map(|r| Quat::from_rotation_y(r as f32))
            .unwrap_or(Quat::IDENTITY);
    }
}

/// Pulse the sun core only
pub fn sync_sun_core(registry: Res<BodyRegistry>, mut cores: Query<(&SunCore, &mut Transform)>) {
    if !registry.is_changed() {
        return;
    }

    for (core, mut transform) in &mut cores {
        if let Some(body) = registry.bodies().get(core.body_index) {
            transform.scale = Vec3::splat(body.pose.scale as f32);
        }
    }
}

/// Orient comet tails and fade coma/tails with distance to the sun
pub fn sync_comet_parts(
    registry: Res<BodyRegistry>,
    mut parts: Query<(&CometPart, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !registry.is_changed() {
        return;
    }

    for (part, mut transform, material3d) in &mut parts {
        let Some(BodyKind::Comet { tails, .. }) =
            registry.bodies().get(part.body_index).map(|b| &b.kind)
        else {
            continue;
        };

        let (rotation, scale, opacity) = match part.kind {
            CometPartKind::Coma => (Quat::IDENTITY, tails.coma_scale, tails.coma_opacity),
            CometPartKind::IonTail => (to_render_quat(tails.ion_rotation), 1.0, tails.ion_opacity),
            CometPartKind::DustTail => {
                (to_render_quat(tails.dust_rotation), 1.0, tails.dust_opacity)
            }
        };
        transform.rotation = rotation;
        transform.scale = Vec3::splat(scale as f32);

        if let Some(material) = materials.get_mut(&material3d.0) {
            material.base_color.set_alpha(opacity as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CelestialConfig, DeclinationMode};
    use crate::orbital::SimulationClock;
    use crate::orbital::sun::solar_state_for;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ticked_registry() -> BodyRegistry {
        let mut registry =
            BodyRegistry::from_config(&CelestialConfig::default(), &mut StdRng::seed_from_u64(3));
        let instant = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let solar = solar_state_for(instant, date, DeclinationMode::Auto, 5.0);
        let mut clock = SimulationClock::new(1000.0);
        registry.tick(1.0, &mut clock, &solar);
        registry
    }

    #[test]
    fn test_sun_pulse_scales_core_not_glow() {
        let registry = ticked_registry();
        let index = registry.bodies().iter().position(|b| b.key == "sun").unwrap();
        let pose = registry.bodies()[index].pose;
        assert!((pose.scale - 1.0).abs() > 1e-6);

        let mut app = App::new();
        app.insert_resource(registry).add_systems(
            Update,
            (
                (sync_body_transforms, apply_scene_positions).chain(),
                sync_sun_core,
            ),
        );
        let sun = app
            .world_mut()
            .spawn((BodyVisual { index }, ScenePosition::default(), Transform::default()))
            .id();
        let core = app
            .world_mut()
            .spawn((SunCore { body_index: index }, Transform::default(), ChildOf(sun)))
            .id();
        let glow = app.world_mut().spawn((Transform::default(), ChildOf(sun))).id();
        app.update();

        let sun_transform = app.world().get::<Transform>(sun).unwrap();
        assert_eq!(sun_transform.scale, Vec3::ONE);
        assert!((sun_transform.translation - to_render(pose.position)).length() < 1e-4);
        let core_transform = app.world().get::<Transform>(core).unwrap();
        assert!((core_transform.scale.x - pose.scale as f32).abs() < 1e-6);
        assert_eq!(app.world().get::<Transform>(glow).unwrap().scale, Vec3::ONE);
    }
}
