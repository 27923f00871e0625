use std::fmt;
use std::sync::Arc;

use crate::geom::{FrameKernel, GeomKernel, KernelOptions};

/// Environment carrying the host sampling primitives.
///
/// Strips and helpers clone the kernel handle out of the environment when they
/// are created, so clearing the environment afterwards does not affect them.
#[derive(Clone, Default)]
pub struct StripEnv {
    kernel: Option<Arc<dyn FrameKernel>>,
}

impl StripEnv {
    /// An environment with no kernel; constructing a strip from it fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kernel(kernel: Arc<dyn FrameKernel>) -> Self {
        Self {
            kernel: Some(kernel),
        }
    }

    /// Environment backed by the built-in [`GeomKernel`].
    #[must_use]
    pub fn geom() -> Self {
        Self::with_kernel(Arc::new(GeomKernel::new(KernelOptions::default())))
    }

    pub fn configure(&mut self, kernel: Arc<dyn FrameKernel>) {
        self.kernel = Some(kernel);
    }

    pub fn clear(&mut self) {
        self.kernel = None;
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.kernel.is_some()
    }

    #[must_use]
    pub fn kernel(&self) -> Option<&Arc<dyn FrameKernel>> {
        self.kernel.as_ref()
    }
}

impl fmt::Debug for StripEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripEnv")
            .field("configured", &self.is_configured())
            .finish()
    }
}
