//! Circuitgen - procedural closed-circuit racetrack generator.
//!
//! Generates a track at startup; press R to regenerate.

use bevy::prelude::*;

use circuitgen::{camera, procgen, render};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Circuitgen".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(camera::CameraPlugin)
        .add_plugins(procgen::ProcgenPlugin)
        .add_plugins(render::RenderPlugin)
        .run();
}
