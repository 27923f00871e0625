use std::sync::{Arc, LazyLock};

/// Texture coordinate rule: `(i, segments) -> [u0, v0, u1, v1]` for the
/// +binormal and -binormal rim vertex of sample `i`.
pub type UvFn = Arc<dyn Fn(usize, usize) -> [f64; 4] + Send + Sync>;

/// Ready-made uv layouts, each a quarter turn of the previous.
///
/// `Rotate0` maps u across the strip (from the +binormal rim to the -binormal
/// rim) and v along the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UvPreset {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

static PRESET_FNS: LazyLock<[UvFn; 4]> = LazyLock::new(|| UvPreset::ALL.map(preset_fn));

fn preset_fn(preset: UvPreset) -> UvFn {
    Arc::new(move |i: usize, n: usize| preset.eval(i, n))
}

impl UvPreset {
    pub const ALL: [Self; 4] = [Self::Rotate0, Self::Rotate90, Self::Rotate180, Self::Rotate270];

    #[must_use]
    pub fn eval(self, i: usize, segments: usize) -> [f64; 4] {
        let s = i as f64 / segments.max(1) as f64;
        match self {
            Self::Rotate0 => [0.0, s, 1.0, s],
            Self::Rotate90 => [s, 1.0, s, 0.0],
            Self::Rotate180 => [1.0, 1.0 - s, 0.0, 1.0 - s],
            Self::Rotate270 => [1.0 - s, 0.0, 1.0 - s, 1.0],
        }
    }

    /// Shared function handle for this preset.
    ///
    /// Repeated calls return the same `Arc`, so assigning a preset a strip
    /// already uses does not trigger a rebuild.
    #[must_use]
    pub fn uv_fn(self) -> UvFn {
        let idx = match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
        };
        Arc::clone(&PRESET_FNS[idx])
    }

    /// Preset for a clockwise quarter-turn count (`0..4`, wrapped).
    #[must_use]
    pub fn from_quarter_turns(turns: u32) -> Self {
        Self::ALL[(turns % 4) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_layouts() {
        assert_eq!(UvPreset::Rotate0.eval(1, 4), [0.0, 0.25, 1.0, 0.25]);
        assert_eq!(UvPreset::Rotate90.eval(1, 4), [0.25, 1.0, 0.25, 0.0]);
        assert_eq!(UvPreset::Rotate180.eval(1, 4), [1.0, 0.75, 0.0, 0.75]);
        assert_eq!(UvPreset::Rotate270.eval(1, 4), [0.75, 0.0, 0.75, 1.0]);
    }

    #[test]
    fn uv_fn_handles_are_stable() {
        let a = UvPreset::Rotate90.uv_fn();
        let b = UvPreset::Rotate90.uv_fn();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &UvPreset::Rotate0.uv_fn()));
        assert_eq!(a(2, 2), [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(UvPreset::from_quarter_turns(6), UvPreset::Rotate180);
    }
}
