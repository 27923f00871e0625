mod test_strip_props;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::geom::{Curve3, Frame, FrameKernel, GeomKernel, Line3, Point3};

use super::{SharedCurve, StripEnv};

/// Wraps [`GeomKernel`] and counts how often frames are requested.
#[derive(Default)]
pub(super) struct CountingKernel {
    inner: GeomKernel,
    frame_calls: AtomicUsize,
    point_calls: AtomicUsize,
}

impl CountingKernel {
    pub(super) fn frame_calls(&self) -> usize {
        self.frame_calls.load(Ordering::SeqCst)
    }

    pub(super) fn point_calls(&self) -> usize {
        self.point_calls.load(Ordering::SeqCst)
    }
}

impl FrameKernel for CountingKernel {
    fn spaced_points(&self, curve: &dyn Curve3, segments: usize) -> Vec<Point3> {
        self.point_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.spaced_points(curve, segments)
    }

    fn compute_frames(&self, curve: &dyn Curve3, segments: usize) -> Vec<Frame> {
        self.frame_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compute_frames(curve, segments)
    }
}

pub(super) fn counting_env() -> (StripEnv, Arc<CountingKernel>) {
    let kernel = Arc::new(CountingKernel::default());
    (StripEnv::with_kernel(kernel.clone()), kernel)
}

/// Straight line from the origin along +X.
pub(super) fn x_line(length: f64) -> SharedCurve {
    Arc::new(Line3::new(Point3::ORIGIN, Point3::new(length, 0.0, 0.0)))
}

pub(super) fn assert_close(a: [f64; 3], b: [f64; 3], eps: f64) {
    let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
    assert!(d <= eps, "{a:?} != {b:?} (distance {d})");
}
