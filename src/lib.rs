#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod strip;

use std::fmt;
use std::sync::Arc;

use geom::{GeomMesh, Polyline3};
use strip::{Strip, StripEnv, UvPreset};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// JavaScript entry point: a single strip along a polyline.
#[wasm_bindgen]
pub struct StripEngine {
    env: StripEnv,
    strip: Option<Strip>,
}

#[wasm_bindgen]
impl StripEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> StripEngine {
        StripEngine {
            env: StripEnv::geom(),
            strip: None,
        }
    }

    /// Build a strip along a flat `[x0, y0, z0, x1, ...]` polyline.
    ///
    /// Replaces (and disposes) any strip loaded before. `segment` is truncated;
    /// negative or non-finite counts become 1.
    #[wasm_bindgen]
    pub fn load_polyline(&mut self, coords: &[f64], segment: f64) -> Result<(), JsValue> {
        let polyline = Polyline3::from_flat(coords).map_err(to_js_error)?;
        let strip = Strip::with_defaults(&self.env, Arc::new(polyline), segment_count(segment))
            .map_err(to_js_error)?;
        if let Some(previous) = self.strip.as_mut() {
            previous.dispose();
        }
        debug_log!("loaded polyline with {} points", coords.len() / 3);
        self.strip = Some(strip);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_segment(&mut self, segment: f64) -> Result<(), JsValue> {
        self.strip_mut()?.set_segment(segment_count(segment));
        Ok(())
    }

    /// Segment count of the loaded strip.
    #[wasm_bindgen]
    pub fn segment(&self) -> Option<u32> {
        self.strip
            .as_ref()
            .map(|strip| u32::try_from(strip.segment()).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen]
    pub fn set_radius(&mut self, radius: f64) -> Result<(), JsValue> {
        self.strip_mut()?.set_radius(radius);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_tilt(&mut self, tilt: f64) -> Result<(), JsValue> {
        self.strip_mut()?.set_tilt(tilt);
        Ok(())
    }

    /// Select a uv preset by quarter turns (`0..4`), or remove uvs with `undefined`.
    #[wasm_bindgen]
    pub fn set_uv_preset(&mut self, quarter_turns: Option<u32>) -> Result<(), JsValue> {
        let uv = quarter_turns.map(|turns| UvPreset::from_quarter_turns(turns).uv_fn());
        self.strip_mut()?.set_uv(uv);
        Ok(())
    }

    /// Mesh buffers of the current strip, or `null` when there is none.
    #[wasm_bindgen]
    pub fn geometry(&self) -> Result<JsValue, JsValue> {
        let mesh = self.strip.as_ref().and_then(Strip::geometry);
        serde_wasm_bindgen::to_value(&mesh).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// `[T, B, N]` frames of the current strip, or `null` when there are none.
    #[wasm_bindgen]
    pub fn frames(&self) -> Result<JsValue, JsValue> {
        let frames = self.strip.as_ref().and_then(Strip::frames);
        serde_wasm_bindgen::to_value(&frames).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Flat `xyz` positions, ready for a `Float64Array`; empty without geometry.
    #[wasm_bindgen]
    pub fn positions(&self) -> Vec<f64> {
        self.mesh()
            .map(|mesh| mesh.positions_flat().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn normals(&self) -> Vec<f64> {
        self.mesh()
            .map(|mesh| mesh.normals_flat().to_vec())
            .unwrap_or_default()
    }

    /// Flat `uv` pairs, `undefined` when the strip carries no uvs.
    #[wasm_bindgen]
    pub fn uvs(&self) -> Option<Vec<f64>> {
        self.mesh().and_then(GeomMesh::uvs_flat).map(<[f64]>::to_vec)
    }

    #[wasm_bindgen]
    pub fn indices(&self) -> Vec<u32> {
        self.mesh().map(|mesh| mesh.indices.clone()).unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        if let Some(strip) = self.strip.as_mut() {
            strip.dispose();
        }
    }

    #[wasm_bindgen]
    pub fn is_disposed(&self) -> bool {
        self.strip.as_ref().is_none_or(Strip::is_disposed)
    }
}

impl Default for StripEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StripEngine {
    fn strip_mut(&mut self) -> Result<&mut Strip, JsValue> {
        self.strip.as_mut().ok_or_else(|| js_error("no strip loaded"))
    }

    fn mesh(&self) -> Option<&GeomMesh> {
        self.strip.as_ref().and_then(Strip::geometry)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn segment_count(value: f64) -> usize {
    if !value.is_finite() || value < 1.0 {
        1
    } else {
        value as usize
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{StripEngine, segment_count};

    const BENT: [f64; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];

    #[test]
    fn engine_builds_and_updates_strip() {
        let mut engine = StripEngine::new();
        assert!(engine.is_disposed());

        assert!(engine.load_polyline(&BENT, 4.0).is_ok());
        assert!(!engine.is_disposed());
        assert!(engine.set_segment(8.0).is_ok());
        assert!(engine.set_radius(0.25).is_ok());
        assert!(engine.set_uv_preset(Some(1)).is_ok());

        let mesh = engine.strip.as_ref().and_then(|s| s.geometry()).unwrap();
        assert_eq!(mesh.vertex_count(), 18);
        assert!(mesh.uvs.is_some());

        assert!(engine.set_uv_preset(None).is_ok());
        let mesh = engine.strip.as_ref().and_then(|s| s.geometry()).unwrap();
        assert!(mesh.uvs.is_none());

        engine.dispose();
        assert!(engine.is_disposed());
    }

    #[test]
    fn negative_and_nan_segments_clamp_to_one() {
        let mut engine = StripEngine::new();
        assert_eq!(engine.segment(), None);

        assert!(engine.load_polyline(&BENT, -1.0).is_ok());
        assert_eq!(engine.segment(), Some(1));
        assert_eq!(engine.positions().len(), 12);

        assert!(engine.set_segment(2.7).is_ok());
        assert_eq!(engine.segment(), Some(2));
        assert!(engine.set_segment(-5.0).is_ok());
        assert_eq!(engine.segment(), Some(1));
        assert!(engine.set_segment(f64::NAN).is_ok());
        assert_eq!(engine.segment(), Some(1));
        assert!(engine.set_segment(f64::NEG_INFINITY).is_ok());
        assert_eq!(engine.segment(), Some(1));
        assert!(engine.set_segment(f64::INFINITY).is_ok());
        assert_eq!(engine.segment(), Some(1));

        assert_eq!(segment_count(0.0), 1);
        assert_eq!(segment_count(0.999), 1);
        assert_eq!(segment_count(12.0), 12);
    }

    #[test]
    fn flat_buffers_follow_the_strip() {
        let mut engine = StripEngine::new();
        assert!(engine.positions().is_empty());
        assert!(engine.normals().is_empty());
        assert!(engine.uvs().is_none());
        assert!(engine.indices().is_empty());

        assert!(engine.load_polyline(&BENT, 3.0).is_ok());
        let mesh = engine.strip.as_ref().and_then(|s| s.geometry()).cloned().unwrap();
        let positions = engine.positions();
        assert_eq!(positions.len(), 3 * mesh.vertex_count());
        assert_eq!(&positions[3..6], &mesh.positions[1]);
        let normals = engine.normals();
        assert_eq!(normals.len(), positions.len());
        assert_eq!(&normals[..3], &mesh.normals[0]);
        assert_eq!(engine.indices(), mesh.indices);
        assert!(engine.uvs().is_none());

        assert!(engine.set_uv_preset(Some(0)).is_ok());
        assert_eq!(engine.uvs().map(|uvs| uvs.len()), Some(2 * mesh.vertex_count()));

        engine.dispose();
        assert!(engine.positions().is_empty());
        assert!(engine.indices().is_empty());
    }
}
