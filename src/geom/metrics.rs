//! Opt-in timing hooks for strip rebuilds.
//!
//! Timing is only collected when the `strip_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! ```ignore
//! use strip_engine::geom::{StripMetrics, TimingBucket};
//!
//! let mut metrics = StripMetrics::default();
//! metrics.begin();
//! let frames = metrics.time(TimingBucket::Frames, || kernel.compute_frames(curve, 32));
//! if let Some(report) = metrics.end() {
//!     println!("frames: {} ns", report.frames_ns);
//! }
//! ```

/// Phases of a strip rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Spaced point sampling along the curve.
    Sampling,
    /// Frame computation and tilt.
    Frames,
    /// Vertex position and index emission.
    Emission,
    /// Normal averaging.
    Normals,
    /// Texture coordinate evaluation.
    Uv,
    /// Morph target builds.
    Morph,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StripTimingReport {
    pub sampling_ns: u64,
    pub frames_ns: u64,
    pub emission_ns: u64,
    pub normals_ns: u64,
    pub uv_ns: u64,
    pub morph_ns: u64,
}

impl StripTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.sampling_ns
            .saturating_add(self.frames_ns)
            .saturating_add(self.emission_ns)
            .saturating_add(self.normals_ns)
            .saturating_add(self.uv_ns)
            .saturating_add(self.morph_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    fn bucket_mut(&mut self, bucket: TimingBucket) -> &mut u64 {
        match bucket {
            TimingBucket::Sampling => &mut self.sampling_ns,
            TimingBucket::Frames => &mut self.frames_ns,
            TimingBucket::Emission => &mut self.emission_ns,
            TimingBucket::Normals => &mut self.normals_ns,
            TimingBucket::Uv => &mut self.uv_ns,
            TimingBucket::Morph => &mut self.morph_ns,
        }
    }

    /// Adds `nanos` to `bucket`, saturating at `u64::MAX`.
    pub fn add(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = self.bucket_mut(bucket);
        *slot = slot.saturating_add(nanos);
    }
}

/// Accumulator for rebuild timings.
///
/// Call [`begin`](Self::begin) to reset, wrap phases with [`time`](Self::time),
/// and read the result with [`end`](Self::end). With metrics disabled `end`
/// always returns `None`.
#[derive(Debug, Default, Clone)]
pub struct StripMetrics {
    #[cfg(all(feature = "strip_metrics", not(target_arch = "wasm32")))]
    report: StripTimingReport,
}

impl StripMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "strip_metrics", not(target_arch = "wasm32")))]
        {
            self.report = StripTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<StripTimingReport> {
        #[cfg(all(feature = "strip_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "strip_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f`, adding its elapsed time to `bucket` when metrics are enabled.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "strip_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.report.add(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "strip_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}
