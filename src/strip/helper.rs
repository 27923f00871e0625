use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::geom::{Frame, FrameKernel, Point3};

use super::{Strip, StripEnv, StripError};

/// Display settings for [`FrameHelper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelperOptions {
    /// Length of each axis segment.
    pub length: f64,
    /// RGB colors for the binormal, normal and tangent segments.
    pub colors: [[f64; 3]; 3],
}

impl Default for HelperOptions {
    fn default() -> Self {
        Self {
            length: 1.0,
            colors: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

/// Line-segment buffers: consecutive position pairs form one segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HelperGeometry {
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<[f64; 3]>,
}

impl HelperGeometry {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// Visualizes a strip's frames as three colored axis segments per sample.
///
/// For frame `i` with sample point `P`, the segments run from `P` to
/// `P + length * B`, `P + length * N` and `P + length * T`, colored with
/// `colors[0]`, `colors[1]` and `colors[2]`.
pub struct FrameHelper {
    kernel: Arc<dyn FrameKernel>,
    length: f64,
    colors: [[f64; 3]; 3],
    anchors: Vec<(Point3, Frame)>,
    geometry: Option<HelperGeometry>,
    disposed: bool,
}

impl FrameHelper {
    pub fn new(env: &StripEnv, strip: &Strip, options: HelperOptions) -> Result<Self, StripError> {
        let kernel = env.kernel().cloned().ok_or(StripError::MissingDependency)?;
        if strip.geometry().is_none() || strip.frames().is_none() {
            return Err(StripError::UseAfterDispose);
        }
        let mut helper = Self {
            kernel,
            length: options.length,
            colors: options.colors,
            anchors: Vec::new(),
            geometry: None,
            disposed: false,
        };
        helper.update(strip);
        Ok(helper)
    }

    /// Resample the strip's frames. Does nothing if the strip has no geometry.
    pub fn update(&mut self, strip: &Strip) {
        if self.disposed {
            return;
        }
        let (Some(_), Some(frames), Some(curve)) = (strip.geometry(), strip.frames(), strip.curve())
        else {
            log::debug!("strip has no geometry; frame helper cleared");
            self.anchors.clear();
            self.geometry = None;
            return;
        };

        let points = self.kernel.spaced_points(&**curve, strip.segment());
        self.anchors = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let point = points
                    .get(i)
                    .or_else(|| points.last())
                    .copied()
                    .unwrap_or(Point3::ORIGIN);
                (point, *frame)
            })
            .collect();

        let frame_count = self.anchors.len();
        let recolor = self
            .geometry
            .as_ref()
            .is_none_or(|g| g.colors.len() != frame_count * 6);
        let geometry = self.geometry.get_or_insert_with(HelperGeometry::default);
        geometry.positions = axis_positions(&self.anchors, self.length);
        if recolor {
            geometry.colors = axis_colors(frame_count, &self.colors);
        }
    }

    /// Recolors the existing segments; unchanged colors are ignored.
    pub fn set_colors(&mut self, colors: [[f64; 3]; 3]) {
        if self.disposed || colors == self.colors {
            return;
        }
        self.colors = colors;
        if let Some(geometry) = self.geometry.as_mut() {
            geometry.colors = axis_colors(self.anchors.len(), &self.colors);
        }
    }

    pub fn set_length(&mut self, length: f64) {
        if self.disposed {
            return;
        }
        self.length = length;
        if let Some(geometry) = self.geometry.as_mut() {
            geometry.positions = axis_positions(&self.anchors, self.length);
        }
    }

    #[must_use]
    pub fn colors(&self) -> [[f64; 3]; 3] {
        self.colors
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&HelperGeometry> {
        self.geometry.as_ref()
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.anchors.clear();
        self.geometry = None;
        self.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl fmt::Debug for FrameHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHelper")
            .field("length", &self.length)
            .field("colors", &self.colors)
            .field("frames", &self.anchors.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

fn axis_positions(anchors: &[(Point3, Frame)], length: f64) -> Vec<[f64; 3]> {
    let mut positions = Vec::with_capacity(anchors.len() * 6);
    for (point, frame) in anchors {
        for axis in [frame.binormal, frame.normal, frame.tangent] {
            positions.push(point.to_array());
            positions.push(point.add_vec(axis.mul_scalar(length)).to_array());
        }
    }
    positions
}

fn axis_colors(frame_count: usize, colors: &[[f64; 3]; 3]) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(frame_count * 6);
    for _ in 0..frame_count {
        for color in colors {
            out.push(*color);
            out.push(*color);
        }
    }
    out
}
