//! Pure strip construction.
//!
//! [`build_strip`] turns a curve plus resolved radius/tilt/uv rules into an
//! indexed ribbon mesh and its tilted frames. The stateful [`Strip`](super::Strip)
//! and every morph target go through the same function.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::{Curve3, Frame, FrameKernel, GeomMesh, Point3, StripMetrics, TimingBucket};

use super::{RADIUS, ScalarFn, ScalarSpec, SharedCurve, TILT, UvFn};

/// Alternate curve/radius/tilt sharing the base strip's topology.
#[derive(Clone)]
pub struct Morph {
    pub curve: SharedCurve,
    /// Defaults to a constant `0.5` when `None`.
    pub radius: Option<ScalarSpec>,
    /// Defaults to a constant `0` when `None`.
    pub tilt: Option<ScalarSpec>,
}

impl Morph {
    #[must_use]
    pub fn new(curve: SharedCurve) -> Self {
        Self {
            curve,
            radius: None,
            tilt: None,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: impl Into<ScalarSpec>) -> Self {
        self.radius = Some(radius.into());
        self
    }

    #[must_use]
    pub fn with_tilt(mut self, tilt: impl Into<ScalarSpec>) -> Self {
        self.tilt = Some(tilt.into());
        self
    }
}

impl fmt::Debug for Morph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Morph")
            .field("curve", &Arc::as_ptr(&self.curve).cast::<()>())
            .field("radius", &self.radius)
            .field("tilt", &self.tilt)
            .finish()
    }
}

/// Output of one strip build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripBuild {
    pub mesh: GeomMesh,
    /// Tilted frames, one per sample (`segments + 1`).
    pub frames: Vec<Frame>,
}

/// Build a strip mesh along `curve` with `segments` segments.
///
/// Produces `2 * (segments + 1)` vertices and `6 * segments` indices. A
/// `segments` of zero is treated as one.
#[must_use]
pub fn build_strip(
    kernel: &dyn FrameKernel,
    curve: &dyn Curve3,
    segments: usize,
    radius: &ScalarFn,
    tilt: &ScalarFn,
    uv: Option<&UvFn>,
) -> StripBuild {
    build_strip_timed(kernel, curve, segments, radius, tilt, uv, &mut StripMetrics::default())
}

pub(crate) fn build_strip_timed(
    kernel: &dyn FrameKernel,
    curve: &dyn Curve3,
    segments: usize,
    radius: &ScalarFn,
    tilt: &ScalarFn,
    uv: Option<&UvFn>,
    metrics: &mut StripMetrics,
) -> StripBuild {
    let segments = segments.max(1);
    let samples = segments + 1;

    let points = metrics.time(TimingBucket::Sampling, || kernel.spaced_points(curve, segments));
    let points = fit_samples(points, samples, Point3::ORIGIN, "points");
    let raw_frames = metrics.time(TimingBucket::Frames, || kernel.compute_frames(curve, segments));
    let raw_frames = fit_samples(raw_frames, samples, Frame::WORLD, "frames");

    let mut mesh = GeomMesh::allocate(2 * samples, uv.is_some());

    let frames = metrics.time(TimingBucket::Emission, || {
        let mut frames = Vec::with_capacity(samples);
        for (i, (point, frame)) in points.iter().zip(&raw_frames).enumerate() {
            let r = radius(i, segments);
            let frame = frame.tilted(tilt(i, segments));
            mesh.positions[2 * i] = point.add_vec(frame.binormal.mul_scalar(r)).to_array();
            mesh.positions[2 * i + 1] = point.add_vec(frame.binormal.mul_scalar(-r)).to_array();
            frames.push(frame);
        }
        mesh.indices = strip_indices(segments);
        frames
    });

    metrics.time(TimingBucket::Normals, || smooth_normals(&frames, &mut mesh.normals));

    if let (Some(uv), Some(uvs)) = (uv, mesh.uvs.as_mut()) {
        metrics.time(TimingBucket::Uv, || {
            for i in 0..samples {
                let [u0, v0, u1, v1] = uv(i, segments);
                uvs[2 * i] = [u0, v0];
                uvs[2 * i + 1] = [u1, v1];
            }
        });
    }

    StripBuild { mesh, frames }
}

/// Two triangles per segment: `(2i, 2i+1, 2i+2)` and `(2i+2, 2i+1, 2i+3)`.
///
/// ```text
///  2---3    ^
///  |\  |    | flow
///  | \ |    |
///  0---1
/// ```
#[must_use]
pub fn strip_indices(segments: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(segments * 6);
    for i in 0..segments {
        let a = (2 * i) as u32;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }
    indices
}

/// Writes one normal per rim vertex pair.
///
/// A single segment gets the mean of both frame normals on all four vertices;
/// otherwise interior samples average their neighbours and the ends keep their own.
fn smooth_normals(frames: &[Frame], normals: &mut [[f64; 3]]) {
    let last = frames.len().saturating_sub(1);
    if last == 1 {
        let mean = ((frames[0].normal + frames[1].normal) / 2.0).to_array();
        normals.fill(mean);
        return;
    }

    for (i, frame) in frames.iter().enumerate() {
        let normal = if i == 0 || i == last {
            frame.normal
        } else {
            (frames[i - 1].normal + frame.normal + frames[i + 1].normal) / 3.0
        };
        let normal = normal.to_array();
        normals[2 * i] = normal;
        normals[2 * i + 1] = normal;
    }
}

fn fit_samples<T: Copy>(mut items: Vec<T>, count: usize, fallback: T, what: &str) -> Vec<T> {
    if items.len() != count {
        log::warn!(
            "frame kernel returned {} {what} for {count} samples; resizing",
            items.len()
        );
        let fill = items.last().copied().unwrap_or(fallback);
        items.resize(count, fill);
    }
    items
}

fn resolve_or(spec: Option<&ScalarSpec>, default: f64, what: &str) -> ScalarFn {
    if let Some(spec) = spec {
        if let Some(f) = spec.resolve() {
            return f;
        }
        log::warn!("morph {what} is inactive; using default {default}");
    }
    Arc::new(move |_: usize, _: usize| default)
}

fn build_morph(kernel: &dyn FrameKernel, morph: &Morph, segments: usize) -> StripBuild {
    let radius = resolve_or(morph.radius.as_ref(), RADIUS, "radius");
    let tilt = resolve_or(morph.tilt.as_ref(), TILT, "tilt");
    build_strip(kernel, &*morph.curve, segments, &radius, &tilt, None)
}

/// Build every morph target, in list order.
#[cfg(feature = "parallel")]
pub(crate) fn build_morph_targets(
    kernel: &dyn FrameKernel,
    morphs: &[Morph],
    segments: usize,
) -> Vec<StripBuild> {
    morphs
        .par_iter()
        .map(|morph| build_morph(kernel, morph, segments))
        .collect()
}

/// Build every morph target, in list order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn build_morph_targets(
    kernel: &dyn FrameKernel,
    morphs: &[Morph],
    segments: usize,
) -> Vec<StripBuild> {
    morphs
        .iter()
        .map(|morph| build_morph(kernel, morph, segments))
        .collect()
}
