//! Track generation: Lissajous control-point layout, spline loading, and
//! dense centerline re-sampling.
//!
//! The sparse control points define the editable curve shape; the dense
//! re-sample is what gets extruded into geometry. Keeping the two densities
//! separate lets an editor reshape the curve cheaply while the mesh rebuilds
//! from the smooth re-sample.

use std::f32::consts::TAU;

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::spline::Spline;

/// Configuration for track generation.
#[derive(Resource, Clone)]
pub struct TrackConfig {
    /// Number of raw samples taken from the generator curve.
    pub curve_points: usize,
    /// Ellipse radii of the generator curve, world units before scaling.
    pub radius: Vec2,
    /// Angular frequency per axis; unequal values give Lissajous loops.
    pub frequency: Vec2,
    /// Uniform scale applied to every raw sample.
    pub scale: f32,
    /// Full width of the road surface.
    pub road_width: f32,
    /// Vertical extent of the walls above and below the road edge.
    pub wall_height: f32,
    /// Uniform random offset applied to each raw sample on x/z, world units.
    /// 0 disables jitter.
    pub jitter: f32,
    /// Peak height of the Perlin elevation profile. 0 keeps the track flat.
    pub elevation_amplitude: f32,
    /// How many noise-space cycles the elevation profile spans per lap.
    pub elevation_frequency: f32,
    /// Seed for jitter and elevation noise.
    pub seed: u32,
    /// Dense re-sample density as a multiple of `curve_points`.
    pub resample_factor: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            curve_points: 30,
            radius: Vec2::new(10.0, 20.0),
            frequency: Vec2::ONE,
            scale: 10.0,
            road_width: 20.0,
            wall_height: 3.0,
            jitter: 0.0,
            elevation_amplitude: 0.0,
            elevation_frequency: 1.0,
            seed: 12345,
            resample_factor: 10,
        }
    }
}

/// Event to trigger track generation.
#[derive(Event)]
pub struct GenerateTrack;

/// The spline holding the track's editable control points.
#[derive(Resource, Default)]
pub struct TrackSpline(pub Spline);

/// The dense centerline polyline the meshes are extruded from. Implicitly
/// closed: the last point connects back to the first.
#[derive(Resource, Default)]
pub struct TrackCenterline(pub Vec<Vec3>);

pub struct TrackGeneratorPlugin;

impl Plugin for TrackGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackConfig>()
            .init_resource::<TrackSpline>()
            .init_resource::<TrackCenterline>()
            .add_event::<GenerateTrack>()
            .add_systems(Startup, trigger_initial_generation)
            .add_systems(
                Update,
                (
                    request_regeneration,
                    generate_layout_on_event,
                    resample_on_spline_change.run_if(resource_changed::<TrackSpline>),
                )
                    .chain(),
            );
    }
}

fn trigger_initial_generation(mut events: EventWriter<GenerateTrack>) {
    events.send(GenerateTrack);
}

fn request_regeneration(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut events: EventWriter<GenerateTrack>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        events.send(GenerateTrack);
    }
}

fn generate_layout_on_event(
    mut events: EventReader<GenerateTrack>,
    config: Res<TrackConfig>,
    mut spline: ResMut<TrackSpline>,
) {
    for _ in events.read() {
        info!("Generating track layout...");

        let samples = control_layout(&config);
        load_layout(&mut spline.0, &samples);

        info!(
            "Track layout: {} control points, {} segments",
            spline.0.point_count(),
            spline.0.curve_count()
        );
    }
}

fn resample_on_spline_change(
    config: Res<TrackConfig>,
    spline: Res<TrackSpline>,
    mut centerline: ResMut<TrackCenterline>,
) {
    let count = config.curve_points * config.resample_factor;
    centerline.0 = resample_centerline(&spline.0, count);
}

/// Samples the parametric generator curve into raw control-point positions.
pub fn control_layout(config: &TrackConfig) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(config.seed as u64);
    let elevation = Perlin::new(config.seed);

    let mut samples = Vec::with_capacity(config.curve_points);
    for i in 0..config.curve_points {
        let angle = (i as f32 / config.curve_points as f32) * TAU;

        let mut point = Vec3::new(
            config.radius.x * (config.frequency.x * angle).cos(),
            0.0,
            config.radius.y * (config.frequency.y * angle).sin(),
        ) * config.scale;

        if config.jitter > 0.0 {
            point.x += rng.gen_range(-config.jitter..config.jitter);
            point.z += rng.gen_range(-config.jitter..config.jitter);
        }

        if config.elevation_amplitude > 0.0 {
            // sample on a circle in noise space so the profile meets itself
            // at the loop seam
            let nx = (angle.cos() * config.elevation_frequency) as f64;
            let nz = (angle.sin() * config.elevation_frequency) as f64;
            point.y = elevation.get([nx, nz]) as f32 * config.elevation_amplitude;
        }

        samples.push(point);
    }

    samples
}

/// Loads raw samples into the spline as its control points: reset to the
/// minimal default, close the loop, then grow by one segment whenever the
/// next sample index would overrun the current points. The loop alias makes
/// the final control point track the first sample.
pub fn load_layout(spline: &mut Spline, samples: &[Vec3]) {
    spline.reset();
    spline.set_looped(true);

    for (i, &sample) in samples.iter().enumerate() {
        if i >= spline.point_count() {
            spline.add_curve();
        }
        spline.set_control_point(i, sample);
    }
}

/// Re-samples the spline at `count` evenly spaced parameter values. On a
/// looped spline t = 1 coincides with the seam, so it is not emitted twice;
/// ribbon triangulation closes the gap.
pub fn resample_centerline(spline: &Spline, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| spline.point_at(i as f32 / count as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn unit_circle_config(curve_points: usize) -> TrackConfig {
        TrackConfig {
            curve_points,
            radius: Vec2::ONE,
            frequency: Vec2::ONE,
            scale: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn four_point_layout_hits_the_unit_circle_axes() {
        let samples = control_layout(&unit_circle_config(4));
        let expected = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        assert_eq!(samples.len(), 4);
        for (sample, expected) in samples.iter().zip(expected) {
            assert!(sample.distance(expected) < EPS);
        }
    }

    #[test]
    fn layout_is_deterministic_per_seed() {
        let config = TrackConfig {
            jitter: 2.0,
            elevation_amplitude: 5.0,
            ..Default::default()
        };
        assert_eq!(control_layout(&config), control_layout(&config));
    }

    #[test]
    fn jitter_stays_within_its_bound() {
        let flat = control_layout(&unit_circle_config(16));
        let jittered = control_layout(&TrackConfig {
            jitter: 0.25,
            ..unit_circle_config(16)
        });
        for (a, b) in flat.iter().zip(&jittered) {
            assert!((a.x - b.x).abs() < 0.25);
            assert!((a.z - b.z).abs() < 0.25);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn loading_grows_the_spline_to_cover_every_sample() {
        let samples = control_layout(&unit_circle_config(30));
        let mut spline = Spline::default();
        load_layout(&mut spline, &samples);

        assert_eq!(spline.point_count(), 31);
        assert_eq!(spline.curve_count(), 10);
        assert!(spline.is_looped());
        // loop alias closes the final point onto the first sample
        assert_eq!(spline.control_point(30), spline.control_point(0));
        for (i, &sample) in samples.iter().enumerate().skip(1) {
            assert_eq!(spline.control_point(i), sample);
        }
    }

    #[test]
    fn resample_emits_the_requested_density() {
        let samples = control_layout(&unit_circle_config(30));
        let mut spline = Spline::default();
        load_layout(&mut spline, &samples);

        let centerline = resample_centerline(&spline, 300);
        assert_eq!(centerline.len(), 300);
    }

    #[test]
    fn dense_resample_stays_near_the_generator_circle() {
        let samples = control_layout(&unit_circle_config(4));
        let mut spline = Spline::default();
        load_layout(&mut spline, &samples);

        // Catmull-Rom can overshoot slightly between control points, so the
        // bound is the circle radius plus a small margin.
        for point in resample_centerline(&spline, 40) {
            assert!(point.length() <= 1.25, "point {point} escaped the circle");
        }
    }
}
