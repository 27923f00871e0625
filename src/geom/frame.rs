//! Tangent/binormal/normal frames along curves.
//!
//! This module provides:
//! - [`Frame`]: a right-handed orthonormal `(tangent, binormal, normal)` triple
//! - [`FrameKernel`]: the sampling primitives a strip needs from its host
//! - [`GeomKernel`]: the built-in kernel (arc-length spacing + parallel transport)

use serde::Serialize;

use super::core::{Point3, Tolerance, Vec3};
use super::curve::{Curve3, spaced_parameters};

/// Orthonormal frame attached to a curve sample.
///
/// Invariant: `tangent × binormal = normal`. The binormal is the axis the strip
/// spreads along; the normal is the shading direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub tangent: Vec3,
    pub binormal: Vec3,
    pub normal: Vec3,
}

impl Frame {
    /// Frame aligned with the world axes (tangent X, binormal Y, normal Z).
    pub const WORLD: Self = Self {
        tangent: Vec3::X,
        binormal: Vec3::Y,
        normal: Vec3::Z,
    };

    #[must_use]
    pub const fn new(tangent: Vec3, binormal: Vec3, normal: Vec3) -> Self {
        Self {
            tangent,
            binormal,
            normal,
        }
    }

    /// Slots in `[T, B, N]` order.
    #[must_use]
    pub const fn to_array(self) -> [Vec3; 3] {
        [self.tangent, self.binormal, self.normal]
    }

    /// Rolls binormal and normal about the tangent by `angle` radians.
    ///
    /// An angle of exactly zero (or `NaN`) returns the frame untouched.
    #[must_use]
    pub fn tilted(self, angle: f64) -> Self {
        if angle == 0.0 || angle.is_nan() {
            return self;
        }
        Self {
            tangent: self.tangent,
            binormal: self.binormal.rotate_about(self.tangent, angle),
            normal: self.normal.rotate_about(self.tangent, angle),
        }
    }

    /// Check if this frame is approximately equal to another within tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: Tolerance) -> bool {
        tol.approx_eq_vec3(self.tangent, other.tangent)
            && tol.approx_eq_vec3(self.binormal, other.binormal)
            && tol.approx_eq_vec3(self.normal, other.normal)
    }
}

/// Curve sampling primitives supplied by the host environment.
///
/// Both methods receive the same `segments` count and must return
/// `segments + 1` entries that are index-aligned with each other.
pub trait FrameKernel: Send + Sync {
    /// Points spaced evenly along the curve, endpoints included.
    fn spaced_points(&self, curve: &dyn Curve3, segments: usize) -> Vec<Point3>;

    /// Frames at the same samples as [`spaced_points`](Self::spaced_points).
    fn compute_frames(&self, curve: &dyn Curve3, segments: usize) -> Vec<Frame>;
}

/// Options for [`GeomKernel`].
#[derive(Debug, Clone, Copy)]
pub struct KernelOptions {
    /// Arc-length table samples per requested segment.
    pub table_density: usize,
    pub tolerance: Tolerance,
}

impl Default for KernelOptions {
    fn default() -> Self {
        Self {
            table_density: 16,
            tolerance: Tolerance::default_geom(),
        }
    }
}

/// Built-in kernel: arc-length spaced samples with parallel-transport frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeomKernel {
    pub options: KernelOptions,
}

impl GeomKernel {
    #[must_use]
    pub const fn new(options: KernelOptions) -> Self {
        Self { options }
    }

    fn tangents(&self, curve: &dyn Curve3, segments: usize) -> Vec<Vec3> {
        let params = spaced_parameters(curve, segments, self.options.table_density);
        let mut tangents: Vec<Vec3> = Vec::with_capacity(params.len());
        for t in params {
            let tangent = match curve.tangent_at(t) {
                Some(tangent) => tangent,
                None => {
                    log::trace!("degenerate tangent at t={t}; reusing previous");
                    tangents.last().copied().unwrap_or(Vec3::X)
                }
            };
            tangents.push(tangent);
        }
        tangents
    }
}

impl FrameKernel for GeomKernel {
    fn spaced_points(&self, curve: &dyn Curve3, segments: usize) -> Vec<Point3> {
        spaced_parameters(curve, segments, self.options.table_density)
            .into_iter()
            .map(|t| curve.point_at(t))
            .collect()
    }

    fn compute_frames(&self, curve: &dyn Curve3, segments: usize) -> Vec<Frame> {
        let tangents = self.tangents(curve, segments);
        let Some(&first_tangent) = tangents.first() else {
            return Vec::new();
        };

        let mut frames = Vec::with_capacity(tangents.len());
        frames.push(initial_frame(first_tangent));

        for window in tangents.windows(2) {
            let prev = frames[frames.len() - 1];
            frames.push(parallel_transport_frame(&prev, window[1], self.options.tolerance));
        }

        frames
    }
}

/// Seeds the first frame from the world axis least aligned with the tangent.
fn initial_frame(tangent: Vec3) -> Frame {
    let (tx, ty, tz) = (tangent.x.abs(), tangent.y.abs(), tangent.z.abs());
    let mut min = f64::MAX;
    let mut axis = Vec3::X;
    if tx <= min {
        min = tx;
        axis = Vec3::X;
    }
    if ty <= min {
        min = ty;
        axis = Vec3::Y;
    }
    if tz <= min {
        axis = Vec3::Z;
    }

    let side = tangent.cross(axis).normalized().unwrap_or(Vec3::Y);
    let binormal = tangent.cross(side);
    let normal = tangent.cross(binormal);
    Frame::new(tangent, binormal, normal)
}

fn parallel_transport_frame(prev_frame: &Frame, new_tangent: Vec3, tol: Tolerance) -> Frame {
    let old_tangent = prev_frame.tangent;
    let cross = old_tangent.cross(new_tangent);

    let binormal = if cross.length_squared() < tol.eps_squared() {
        prev_frame.binormal
    } else {
        let rotation_axis = cross.normalized().unwrap_or(Vec3::Z);
        let angle = old_tangent.dot(new_tangent).clamp(-1.0, 1.0).acos();
        prev_frame
            .binormal
            .rotate_about(rotation_axis, angle)
            .normalized()
            .unwrap_or(prev_frame.binormal)
    };

    let normal = new_tangent.cross(binormal);
    Frame::new(new_tangent, binormal, normal)
}
