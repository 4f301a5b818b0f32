//! Procedural track generation.
//!
//! - Cubic curve evaluators (Bezier and Catmull-Rom bases)
//! - Spline container with looped control points
//! - Lissajous layout and dense centerline re-sampling

use bevy::prelude::*;

pub mod curve;
pub mod spline;
pub mod track;

pub struct ProcgenPlugin;

impl Plugin for ProcgenPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(track::TrackGeneratorPlugin);
    }
}
