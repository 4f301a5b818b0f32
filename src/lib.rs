//! Circuitgen - procedural closed-circuit racetrack generator.
//!
//! Samples a Lissajous-style generator curve into spline control points,
//! re-samples the spline into a dense centerline, and extrudes the centerline
//! into a road ribbon plus two bounding wall ribbons, delivered as Bevy
//! meshes.

pub mod camera;
pub mod procgen;
pub mod render;
