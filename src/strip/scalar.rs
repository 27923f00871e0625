use std::fmt;
use std::sync::Arc;

/// Per-sample scalar rule, called with `(i, segments)` for `i` in `0..=segments`.
pub type ScalarFn = Arc<dyn Fn(usize, usize) -> f64 + Send + Sync>;

/// Radius or tilt input: a constant or a per-sample function.
///
/// `Constant(NaN)` resolves to no function at all and marks the value as
/// inactive; a strip holding an inactive radius or tilt has no geometry.
#[derive(Clone)]
pub enum ScalarSpec {
    Constant(f64),
    Sampled(ScalarFn),
}

impl ScalarSpec {
    /// The inactive sentinel a disposed strip holds.
    pub const INACTIVE: Self = Self::Constant(f64::NAN);

    pub fn sampled(f: impl Fn(usize, usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::Sampled(Arc::new(f))
    }

    /// Resolve into a uniform per-sample function, `None` if inactive.
    #[must_use]
    pub fn resolve(&self) -> Option<ScalarFn> {
        match self {
            Self::Constant(value) if value.is_nan() => None,
            Self::Constant(value) => {
                let value = *value;
                Some(Arc::new(move |_: usize, _: usize| value))
            }
            Self::Sampled(f) => Some(Arc::clone(f)),
        }
    }

    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Constant(value) if value.is_nan())
    }
}

/// Constants compare by value (so `NaN` never equals itself), functions by identity.
impl PartialEq for ScalarSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Sampled(a), Self::Sampled(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for ScalarSpec {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<ScalarFn> for ScalarSpec {
    fn from(f: ScalarFn) -> Self {
        Self::Sampled(f)
    }
}

impl fmt::Debug for ScalarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Sampled(func) => write!(f, "Sampled({:p})", Arc::as_ptr(func).cast::<()>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_constant_resolves_to_nothing() {
        assert!(ScalarSpec::INACTIVE.resolve().is_none());
        assert!(ScalarSpec::INACTIVE.is_inactive());
        assert_ne!(ScalarSpec::INACTIVE, ScalarSpec::INACTIVE);
    }

    #[test]
    fn constant_resolves_to_uniform_fn() {
        let f = ScalarSpec::Constant(0.25).resolve().unwrap();
        assert_eq!(f(0, 4), 0.25);
        assert_eq!(f(4, 4), 0.25);
        assert_eq!(ScalarSpec::from(0.25), ScalarSpec::Constant(0.25));
    }

    #[test]
    fn sampled_equality_is_identity() {
        let f: ScalarFn = Arc::new(|i: usize, n: usize| i as f64 / n as f64);
        let a = ScalarSpec::Sampled(Arc::clone(&f));
        let b = ScalarSpec::Sampled(f);
        let c = ScalarSpec::sampled(|i: usize, n: usize| i as f64 / n as f64);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, ScalarSpec::Constant(0.0));
        assert_eq!(a.resolve().unwrap()(1, 4), 0.25);
    }
}
