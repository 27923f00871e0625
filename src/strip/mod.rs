//! Ribbon meshes swept along curves.
//!
//! A [`Strip`] samples a curve into `segment + 1` frames, spreads two rim
//! vertices along each frame's binormal and stitches them into triangles.
//! Radius, tilt and uv are per-sample rules; morph targets reuse the topology
//! with different curves.

mod build;
mod builder;
mod env;
mod error;
mod helper;
mod scalar;
mod uv;

use std::sync::Arc;

use crate::geom::Curve3;

pub use build::{Morph, StripBuild, build_strip, strip_indices};
pub use builder::{Strip, StripProps};
pub use env::StripEnv;
pub use error::StripError;
pub use helper::{FrameHelper, HelperGeometry, HelperOptions};
pub use scalar::{ScalarFn, ScalarSpec};
pub use uv::{UvFn, UvPreset};

/// Curve handle shared between strips, morphs and callers.
pub type SharedCurve = Arc<dyn Curve3 + Send + Sync>;

/// Default half-width of a strip.
pub const RADIUS: f64 = 0.5;
/// Default roll about the tangent, in radians.
pub const TILT: f64 = 0.0;

#[cfg(test)]
mod tests;
