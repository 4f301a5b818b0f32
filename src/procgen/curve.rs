//! Cubic curve evaluators.
//!
//! Two interchangeable bases over the same four-point segment window: the
//! Bernstein (Bezier) basis and the uniform Catmull-Rom basis. All functions
//! silently clamp `t` to [0, 1].

use bevy::prelude::*;

/// Which cubic basis a spline evaluates its segments with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveBasis {
    /// Cubic Bezier: interpolates p0 and p3, p1/p2 act as handles.
    Bezier,
    /// Uniform Catmull-Rom: interpolates p1 and p2, p0/p3 shape the tangents.
    #[default]
    CatmullRom,
}

impl CurveBasis {
    pub fn point(self, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        match self {
            CurveBasis::Bezier => bezier::point(p0, p1, p2, p3, t),
            CurveBasis::CatmullRom => catmull_rom::point(p0, p1, p2, p3, t),
        }
    }

    pub fn derivative(self, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        match self {
            CurveBasis::Bezier => bezier::derivative(p0, p1, p2, p3, t),
            CurveBasis::CatmullRom => catmull_rom::derivative(p0, p1, p2, p3, t),
        }
    }
}

pub mod bezier {
    use bevy::prelude::*;

    /// Position on the cubic Bezier curve at `t`.
    pub fn point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;

        u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
    }

    /// First derivative of the cubic Bezier curve at `t`.
    pub fn derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;

        3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
    }
}

pub mod catmull_rom {
    use bevy::prelude::*;

    /// Position on the uniform Catmull-Rom segment through p1..p2 at `t`.
    pub fn point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        let a = 0.5 * (2.0 * p1);
        let b = 0.5 * (p2 - p0);
        let c = 0.5 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3);
        let d = 0.5 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);

        a + b * t + c * t * t + d * t * t * t
    }

    /// First derivative of the uniform Catmull-Rom segment at `t`.
    pub fn derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        let b = 0.5 * (p2 - p0);
        let c = 0.5 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3);
        let d = 0.5 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);

        b + 2.0 * c * t + 3.0 * d * t * t
    }
}
