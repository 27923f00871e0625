mod core;
mod curve;
mod frame;
mod mesh;
mod metrics;

pub use core::{Point3, Tolerance, Vec3};
pub use curve::{
    Arc3, Circle3, CubicBezier3, Curve3, CurveError, Helix3, Line3, Polyline3, QuadraticBezier3,
    curve_arc_length, spaced_parameters,
};
pub use frame::{Frame, FrameKernel, GeomKernel, KernelOptions};
pub use mesh::GeomMesh;
pub use metrics::{StripMetrics, StripTimingReport, TimingBucket};

#[cfg(test)]
mod tests;
