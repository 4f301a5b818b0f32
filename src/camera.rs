//! Viewer camera and scene lighting.
//!
//! Hold the right mouse button to orbit, scroll to zoom.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (camera_orbit, camera_zoom, apply_camera_orbit).chain());
    }
}

/// Orbit state for the viewer camera.
#[derive(Component)]
pub struct OrbitCamera {
    /// Heading around the Y axis, radians.
    pub yaw: f32,
    /// Elevation angle, radians; clamped to keep the camera above the track.
    pub pitch: f32,
    /// Distance from the orbit target.
    pub distance: f32,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.9,
            distance: 450.0,
            target: Vec3::ZERO,
        }
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        OrbitCamera::default(),
        Transform::default(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(200.0, 400.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn camera_orbit(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut query: Query<&mut OrbitCamera>,
) {
    if !buttons.pressed(MouseButton::Right) {
        motion.clear();
        return;
    }

    let Ok(mut orbit) = query.get_single_mut() else {
        return;
    };
    for event in motion.read() {
        orbit.yaw -= event.delta.x * 0.005;
        orbit.pitch = (orbit.pitch + event.delta.y * 0.005).clamp(0.1, 1.5);
    }
}

fn camera_zoom(mut scroll: EventReader<MouseWheel>, mut query: Query<&mut OrbitCamera>) {
    let Ok(mut orbit) = query.get_single_mut() else {
        return;
    };
    for event in scroll.read() {
        orbit.distance = (orbit.distance * (1.0 - event.y * 0.1)).clamp(50.0, 2000.0);
    }
}

fn apply_camera_orbit(mut query: Query<(&OrbitCamera, &mut Transform)>) {
    for (orbit, mut transform) in &mut query {
        let rotation = Quat::from_rotation_y(orbit.yaw) * Quat::from_rotation_x(-orbit.pitch);
        transform.translation = orbit.target + rotation * Vec3::new(0.0, 0.0, orbit.distance);
        transform.look_at(orbit.target, Vec3::Y);
    }
}
