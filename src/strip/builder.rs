use std::fmt;
use std::sync::Arc;

use crate::geom::{Frame, FrameKernel, GeomMesh, StripMetrics, StripTimingReport, TimingBucket};

use super::build::{StripBuild, build_morph_targets, build_strip_timed};
use super::{
    Morph, RADIUS, ScalarFn, ScalarSpec, SharedCurve, StripEnv, StripError, TILT, UvFn,
};

/// Bulk property update for [`Strip::set_props`].
///
/// `None` keeps the strip's current value. The nested options on `curve` and
/// `uv` allow clearing: `Some(None)` removes the curve or uv rule.
#[derive(Clone, Default)]
pub struct StripProps {
    pub curve: Option<Option<SharedCurve>>,
    pub segment: Option<usize>,
    pub radius: Option<ScalarSpec>,
    pub tilt: Option<ScalarSpec>,
    pub uv: Option<Option<UvFn>>,
}

/// Stateful ribbon mesh that rebuilds itself whenever a property changes.
///
/// Every mutation completes its rebuild before returning. After
/// [`dispose`](Self::dispose) all mutators are ignored and the accessors for
/// geometry and frames return `None`.
pub struct Strip {
    kernel: Arc<dyn FrameKernel>,
    curve: Option<SharedCurve>,
    segment: usize,
    radius: ScalarSpec,
    tilt: ScalarSpec,
    uv: Option<UvFn>,
    morphs: Option<Vec<Morph>>,
    radius_fn: Option<ScalarFn>,
    tilt_fn: Option<ScalarFn>,
    geometry: Option<GeomMesh>,
    frames: Option<Vec<Frame>>,
    disposed: bool,
    metrics: StripMetrics,
    last_timing: Option<StripTimingReport>,
}

impl Strip {
    /// Build a strip along `curve`, sampled with `segment` segments (at least 1).
    ///
    /// Fails with [`StripError::MissingDependency`] when `env` has no kernel.
    pub fn new(
        env: &StripEnv,
        curve: SharedCurve,
        segment: usize,
        radius: impl Into<ScalarSpec>,
        tilt: impl Into<ScalarSpec>,
        uv: Option<UvFn>,
    ) -> Result<Self, StripError> {
        let kernel = env.kernel().cloned().ok_or(StripError::MissingDependency)?;
        let radius = radius.into();
        let tilt = tilt.into();
        let mut strip = Self {
            kernel,
            curve: Some(curve),
            segment: segment.max(1),
            radius_fn: radius.resolve(),
            tilt_fn: tilt.resolve(),
            radius,
            tilt,
            uv,
            morphs: None,
            geometry: None,
            frames: None,
            disposed: false,
            metrics: StripMetrics::default(),
            last_timing: None,
        };
        strip.rebuild();
        Ok(strip)
    }

    /// Strip with radius `0.5`, no tilt and no uv.
    pub fn with_defaults(
        env: &StripEnv,
        curve: SharedCurve,
        segment: usize,
    ) -> Result<Self, StripError> {
        Self::new(env, curve, segment, RADIUS, TILT, None)
    }

    #[must_use]
    pub fn curve(&self) -> Option<&SharedCurve> {
        self.curve.as_ref()
    }

    #[must_use]
    pub fn segment(&self) -> usize {
        self.segment
    }

    #[must_use]
    pub fn radius(&self) -> &ScalarSpec {
        &self.radius
    }

    #[must_use]
    pub fn tilt(&self) -> &ScalarSpec {
        &self.tilt
    }

    #[must_use]
    pub fn uv(&self) -> Option<&UvFn> {
        self.uv.as_ref()
    }

    #[must_use]
    pub fn morphs(&self) -> Option<&[Morph]> {
        self.morphs.as_deref()
    }

    /// The current mesh; `None` once disposed, while the strip has no curve, or
    /// while its radius or tilt is inactive.
    #[must_use]
    pub fn geometry(&self) -> Option<&GeomMesh> {
        self.geometry.as_ref()
    }

    /// Tilted `(T, B, N)` frames, one per sample.
    #[must_use]
    pub fn frames(&self) -> Option<&[Frame]> {
        self.frames.as_deref()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Timings of the last rebuild; only populated with the `strip_metrics` feature.
    #[must_use]
    pub fn last_timing(&self) -> Option<&StripTimingReport> {
        self.last_timing.as_ref()
    }

    pub fn set_curve(&mut self, curve: Option<SharedCurve>) {
        if self.disposed {
            return;
        }
        self.curve = curve;
        self.rebuild();
    }

    /// Values below 1 are clamped to 1.
    pub fn set_segment(&mut self, segment: usize) {
        if self.disposed {
            return;
        }
        self.segment = segment.max(1);
        self.rebuild();
    }

    /// Rebuilds only if `radius` differs from the current value.
    pub fn set_radius(&mut self, radius: impl Into<ScalarSpec>) {
        if self.disposed {
            return;
        }
        let radius = radius.into();
        if radius != self.radius {
            self.assign_radius(radius);
            self.rebuild();
        }
    }

    /// Rebuilds only if `tilt` differs from the current value.
    pub fn set_tilt(&mut self, tilt: impl Into<ScalarSpec>) {
        if self.disposed {
            return;
        }
        let tilt = tilt.into();
        if tilt != self.tilt {
            self.assign_tilt(tilt);
            self.rebuild();
        }
    }

    /// A new uv rule triggers a rebuild; `None` only drops the uv attribute.
    pub fn set_uv(&mut self, uv: Option<UvFn>) {
        if self.disposed || same_uv(self.uv.as_ref(), uv.as_ref()) {
            return;
        }
        self.uv = uv;
        if self.uv.is_some() {
            self.rebuild();
        } else if let Some(mesh) = self.geometry.as_mut() {
            mesh.remove_uvs();
        }
    }

    /// Replaces the morph list and rebuilds, even when the list is unchanged.
    pub fn set_morphs(&mut self, morphs: Option<Vec<Morph>>) {
        if self.disposed {
            return;
        }
        self.morphs = morphs;
        self.rebuild();
    }

    /// Apply several property changes with at most one rebuild.
    pub fn set_props(&mut self, props: StripProps) {
        if self.disposed {
            return;
        }
        let StripProps {
            curve,
            segment,
            radius,
            tilt,
            uv,
        } = props;

        let mut changed = false;
        if let Some(curve) = curve {
            if !same_curve(self.curve.as_ref(), curve.as_ref()) {
                self.curve = curve;
                changed = true;
            }
        }
        if let Some(segment) = segment.map(|s| s.max(1)) {
            if segment != self.segment {
                self.segment = segment;
                changed = true;
            }
        }
        if let Some(radius) = radius {
            if radius != self.radius {
                self.assign_radius(radius);
                changed = true;
            }
        }
        if let Some(tilt) = tilt {
            if tilt != self.tilt {
                self.assign_tilt(tilt);
                changed = true;
            }
        }
        if let Some(uv) = uv {
            if uv.is_some() && !same_uv(self.uv.as_ref(), uv.as_ref()) {
                changed = true;
            }
            self.uv = uv;
        }
        if self.uv.is_none() {
            if let Some(mesh) = self.geometry.as_mut() {
                mesh.remove_uvs();
            }
        }

        if changed {
            self.rebuild();
        }
    }

    /// Release geometry and frames. Calling it again has no effect.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.curve = None;
        self.segment = 1;
        self.assign_radius(ScalarSpec::INACTIVE);
        self.assign_tilt(ScalarSpec::INACTIVE);
        self.uv = None;
        self.morphs = None;
        self.geometry = None;
        self.frames = None;
        self.last_timing = None;
        self.disposed = true;
        log::debug!("strip disposed");
    }

    fn assign_radius(&mut self, radius: ScalarSpec) {
        self.radius_fn = radius.resolve();
        self.radius = radius;
    }

    fn assign_tilt(&mut self, tilt: ScalarSpec) {
        self.tilt_fn = tilt.resolve();
        self.tilt = tilt;
    }

    fn rebuild(&mut self) {
        if self.disposed {
            return;
        }
        self.geometry = None;
        self.frames = None;
        self.last_timing = None;

        let Some(curve) = self.curve.clone() else {
            log::debug!("strip has no curve; geometry cleared");
            return;
        };
        let (Some(radius), Some(tilt)) = (self.radius_fn.clone(), self.tilt_fn.clone()) else {
            log::warn!(
                "strip left without geometry: radius {:?} or tilt {:?} is inactive",
                self.radius,
                self.tilt
            );
            return;
        };

        let segments = self.segment;
        self.metrics.begin();
        let StripBuild { mut mesh, frames } = build_strip_timed(
            &*self.kernel,
            &*curve,
            segments,
            &radius,
            &tilt,
            self.uv.as_ref(),
            &mut self.metrics,
        );

        if let Some(morphs) = self.morphs.as_deref().filter(|m| !m.is_empty()) {
            let kernel = &*self.kernel;
            let targets = self
                .metrics
                .time(TimingBucket::Morph, || build_morph_targets(kernel, morphs, segments));
            for target in targets {
                mesh.morph_positions.push(target.mesh.positions);
                mesh.morph_normals.push(target.mesh.normals);
            }
        }

        self.last_timing = self.metrics.end();
        log::debug!(
            "strip rebuilt: segments={segments} vertices={} triangles={} morphs={} uv={}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.morph_target_count(),
            mesh.uvs.is_some()
        );
        crate::debug_log!("strip rebuilt with {} vertices", mesh.vertex_count());

        self.geometry = Some(mesh);
        self.frames = Some(frames);
    }
}

impl fmt::Debug for Strip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strip")
            .field("has_curve", &self.curve.is_some())
            .field("segment", &self.segment)
            .field("radius", &self.radius)
            .field("tilt", &self.tilt)
            .field("has_uv", &self.uv.is_some())
            .field("morphs", &self.morphs.as_ref().map(Vec::len))
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

fn same_curve(a: Option<&SharedCurve>, b: Option<&SharedCurve>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn same_uv(a: Option<&UvFn>, b: Option<&UvFn>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
