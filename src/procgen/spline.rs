//! Spline container: an ordered, optionally looped sequence of control
//! points evaluated piecewise over four-point segment windows.
//!
//! Control points are laid out with a 3-point stride between segment starts,
//! so a spline with `3k + 1` points has `k` segments. While looped, the first
//! and last control points (and joint modes) alias each other: every write to
//! either end keeps both identical.

use bevy::prelude::*;

use super::curve::CurveBasis;

/// Tangent-handling classification for the joint between two adjoining
/// segments. Carried as data for editing tools; sampling does not constrain
/// neighboring control points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlPointMode {
    #[default]
    Free,
    Aligned,
    Mirrored,
}

/// Piecewise cubic spline over shared control points.
///
/// Out-of-range indices are caller errors and panic; callers validate against
/// [`Spline::point_count`] first. Sampling a spline with fewer than 4 control
/// points is likewise a caller error.
pub struct Spline {
    points: Vec<Vec3>,
    modes: Vec<ControlPointMode>,
    looped: bool,
    basis: CurveBasis,
    observers: Vec<Box<dyn Fn() + Send + Sync>>,
}

impl Default for Spline {
    fn default() -> Self {
        let mut spline = Self {
            points: Vec::new(),
            modes: Vec::new(),
            looped: false,
            basis: CurveBasis::default(),
            observers: Vec::new(),
        };
        spline.reset();
        spline
    }
}

impl Spline {
    pub fn new(basis: CurveBasis) -> Self {
        Self {
            basis,
            ..Default::default()
        }
    }

    /// Restores the minimal editable spline: one straight segment along +X,
    /// two Free joints, not looped.
    pub fn reset(&mut self) {
        self.points.clear();
        self.points.extend([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]);
        self.modes.clear();
        self.modes.extend([ControlPointMode::Free; 2]);
        self.looped = false;
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of cubic segments; 0 until the spline holds at least 4 points.
    pub fn curve_count(&self) -> usize {
        if self.points.len() < 4 {
            0
        } else {
            (self.points.len() - 1) / 3
        }
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Toggles loop mode. Closing the loop aliases the last joint mode to the
    /// first and re-syncs the endpoints, which notifies observers.
    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;

        if looped {
            let last_mode = self.modes.len() - 1;
            self.modes[last_mode] = self.modes[0];
            let first = self.points[0];
            self.set_control_point(0, first);
        }
    }

    pub fn basis(&self) -> CurveBasis {
        self.basis
    }

    pub fn control_point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Writes a control point and notifies observers. While looped, a write
    /// to either endpoint writes both in one step, keeping the loop invariant
    /// independent of which end the caller touched.
    pub fn set_control_point(&mut self, index: usize, point: Vec3) {
        let last = self.points.len() - 1;
        if self.looped && (index == 0 || index == last) {
            self.points[0] = point;
            self.points[last] = point;
        } else {
            self.points[index] = point;
        }
        self.notify();
    }

    /// Mode of the joint that owns control point `index`.
    pub fn control_point_mode(&self, index: usize) -> ControlPointMode {
        self.modes[(index + 1) / 3]
    }

    pub fn set_control_point_mode(&mut self, index: usize, mode: ControlPointMode) {
        let joint = (index + 1) / 3;
        let last = self.modes.len() - 1;
        if self.looped && (joint == 0 || joint == last) {
            self.modes[0] = mode;
            self.modes[last] = mode;
        } else {
            self.modes[joint] = mode;
        }
    }

    /// Appends one segment: three points extending +X in unit steps from the
    /// current endpoint, plus one joint mode copied from the previous joint.
    /// Re-closes the loop alias when looped.
    pub fn add_curve(&mut self) {
        let mut point = self.points[self.points.len() - 1];
        for _ in 0..3 {
            point.x += 1.0;
            self.points.push(point);
        }

        let trailing = self.modes[self.modes.len() - 1];
        self.modes.push(trailing);

        if self.looped {
            let last = self.points.len() - 1;
            self.points[last] = self.points[0];
            let last_mode = self.modes.len() - 1;
            self.modes[last_mode] = self.modes[0];
        }
    }

    /// Position on the spline at global parameter `t` in [0, 1]. Values at or
    /// above 1 map to the final segment's end; negatives clamp to the start.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let (i, local_t) = self.locate_segment(t);
        self.basis.point(
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[i + 3],
            local_t,
        )
    }

    /// First derivative with respect to the global parameter's segment-local
    /// component.
    pub fn velocity_at(&self, t: f32) -> Vec3 {
        let (i, local_t) = self.locate_segment(t);
        self.basis.derivative(
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[i + 3],
            local_t,
        )
    }

    /// Normalized travel direction at `t`.
    pub fn direction_at(&self, t: f32) -> Vec3 {
        self.velocity_at(t).normalize_or_zero()
    }

    /// Registers a change observer. Every successful control-point write
    /// notifies all observers synchronously, one call per write.
    pub fn subscribe(&mut self, observer: impl Fn() + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer();
        }
    }

    /// Maps global `t` to (first control point index of the segment, local t).
    fn locate_segment(&self, t: f32) -> (usize, f32) {
        let curve_count = self.curve_count();
        assert!(
            curve_count > 0,
            "sampling a spline with fewer than 4 control points"
        );

        if t >= 1.0 {
            (self.points.len() - 4, 1.0)
        } else {
            let scaled = t.clamp(0.0, 1.0) * curve_count as f32;
            let segment = scaled as usize;
            (segment * 3, scaled - segment as f32)
        }
    }
}
