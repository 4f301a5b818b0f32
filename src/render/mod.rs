//! Mesh construction and scene output for the generated track.

use bevy::prelude::*;

pub mod ribbon;
pub mod track_mesh;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(track_mesh::TrackMeshPlugin);
    }
}
