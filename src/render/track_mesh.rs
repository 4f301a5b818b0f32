//! Track mesh assembly from the dense centerline.
//!
//! Rebuilds the road surface and both wall ribbons whenever the centerline
//! changes. The spawned entities and their mesh assets are held in a
//! resource and reused across regenerations, so a rebuild overwrites the
//! existing assets instead of looking objects up by name or duplicating
//! them.

use bevy::prelude::*;

use super::ribbon::{road_ribbon, wall_ribbons};
use crate::procgen::track::{TrackCenterline, TrackConfig};

pub struct TrackMeshPlugin;

impl Plugin for TrackMeshPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackPieces>().add_systems(
            Update,
            rebuild_track_meshes.run_if(resource_exists_and_changed::<TrackCenterline>),
        );
    }
}

/// Marker for the road surface entity.
#[derive(Component)]
pub struct RoadSurface;

/// Marker for the wall entities.
#[derive(Component)]
pub struct TrackWall;

/// A spawned track piece and the mesh asset it renders.
pub struct TrackPiece {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
}

/// Handles to everything the generator has spawned.
#[derive(Resource, Default)]
pub struct TrackPieces {
    pub road: Option<TrackPiece>,
    pub wall_a: Option<TrackPiece>,
    pub wall_b: Option<TrackPiece>,
    road_material: Option<Handle<StandardMaterial>>,
    wall_material: Option<Handle<StandardMaterial>>,
}

fn rebuild_track_meshes(
    mut commands: Commands,
    centerline: Res<TrackCenterline>,
    config: Res<TrackConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pieces: ResMut<TrackPieces>,
) {
    // nothing to extrude until the sampler has produced a usable loop
    if centerline.0.len() < 3 {
        return;
    }

    info!(
        "Rebuilding track meshes from {} centerline points",
        centerline.0.len()
    );

    let road_material = pieces
        .road_material
        .get_or_insert_with(|| {
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.35, 0.4),
                perceptual_roughness: 0.9,
                ..default()
            })
        })
        .clone();
    let wall_material = pieces
        .wall_material
        .get_or_insert_with(|| {
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.28, 0.22),
                perceptual_roughness: 0.85,
                ..default()
            })
        })
        .clone();

    let road = road_ribbon(&centerline.0, config.road_width);
    let (wall_a, wall_b) = wall_ribbons(&centerline.0, config.road_width, config.wall_height);

    let first_build = pieces.road.is_none();
    let road_entity = upsert_piece(
        &mut commands,
        &mut meshes,
        &mut pieces.road,
        road.build(),
        road_material,
        "Track",
        RoadSurface,
    );
    let wall_a_entity = upsert_piece(
        &mut commands,
        &mut meshes,
        &mut pieces.wall_a,
        wall_a.build(),
        wall_material.clone(),
        "Road Wall Side A",
        TrackWall,
    );
    let wall_b_entity = upsert_piece(
        &mut commands,
        &mut meshes,
        &mut pieces.wall_b,
        wall_b.build(),
        wall_material,
        "Road Wall Side B",
        TrackWall,
    );

    if first_build {
        commands
            .entity(road_entity)
            .add_children(&[wall_a_entity, wall_b_entity]);
    }
}

/// Writes `mesh` into an existing piece's asset, or spawns the piece on its
/// first build. The returned entity is stable across regenerations.
fn upsert_piece<M: Component>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    slot: &mut Option<TrackPiece>,
    mesh: Mesh,
    material: Handle<StandardMaterial>,
    label: &'static str,
    marker: M,
) -> Entity {
    match slot {
        Some(piece) => {
            meshes.insert(&piece.mesh, mesh);
            piece.entity
        }
        None => {
            let handle = meshes.add(mesh);
            let entity = commands
                .spawn((
                    Mesh3d(handle.clone()),
                    MeshMaterial3d(material),
                    Transform::IDENTITY,
                    Name::new(label),
                    marker,
                ))
                .id();
            *slot = Some(TrackPiece {
                entity,
                mesh: handle,
            });
            entity
        }
    }
}
