use std::sync::Arc;

use super::{counting_env, x_line};
use crate::geom::{Circle3, Point3, Vec3};
use crate::strip::{ScalarFn, ScalarSpec, SharedCurve, Strip, StripProps, UvFn, UvPreset};

#[test]
fn unchanged_radius_and_tilt_do_not_rebuild() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 4).unwrap();
    assert_eq!(kernel.frame_calls(), 1);
    assert_eq!(kernel.point_calls(), 1);

    strip.set_radius(0.5);
    strip.set_tilt(0.0);
    assert_eq!(kernel.frame_calls(), 1);

    strip.set_radius(0.75);
    assert_eq!(kernel.frame_calls(), 2);
    strip.set_tilt(0.1);
    assert_eq!(kernel.frame_calls(), 3);
    assert_eq!(strip.radius(), &ScalarSpec::Constant(0.75));
    assert_eq!(strip.tilt(), &ScalarSpec::Constant(0.1));
}

#[test]
fn sampled_specs_compare_by_identity() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 4).unwrap();
    let wave: ScalarFn = Arc::new(|i: usize, _: usize| 0.25 + 0.05 * i as f64);

    strip.set_radius(ScalarSpec::Sampled(wave.clone()));
    assert_eq!(kernel.frame_calls(), 2);
    strip.set_radius(ScalarSpec::Sampled(wave.clone()));
    assert_eq!(kernel.frame_calls(), 2);

    // Same behavior, different function: rebuilds.
    strip.set_radius(ScalarSpec::sampled(|i, _| 0.25 + 0.05 * i as f64));
    assert_eq!(kernel.frame_calls(), 3);
}

#[test]
fn curve_segment_and_morph_setters_always_rebuild() {
    let (env, kernel) = counting_env();
    let curve = x_line(1.0);
    let mut strip = Strip::with_defaults(&env, curve.clone(), 4).unwrap();

    strip.set_curve(Some(curve));
    assert_eq!(kernel.frame_calls(), 2);
    strip.set_segment(4);
    assert_eq!(kernel.frame_calls(), 3);
    strip.set_morphs(None);
    assert_eq!(kernel.frame_calls(), 4);
}

#[test]
fn uv_toggle_adds_and_removes_attribute() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 3).unwrap();
    assert!(strip.geometry().unwrap().uvs.is_none());

    let uv = UvPreset::Rotate180.uv_fn();
    strip.set_uv(Some(uv.clone()));
    assert_eq!(kernel.frame_calls(), 2);
    let uvs = strip.geometry().and_then(|m| m.uvs.clone()).unwrap();
    assert_eq!(uvs.len(), 8);
    assert_eq!(uvs[0], [1.0, 1.0]);
    assert_eq!(uvs[1], [0.0, 1.0]);
    assert_eq!(uvs[6], [1.0, 0.0]);

    strip.set_uv(Some(uv));
    assert_eq!(kernel.frame_calls(), 2);

    strip.set_uv(None);
    assert_eq!(kernel.frame_calls(), 2);
    assert!(strip.uv().is_none());
    assert!(strip.geometry().unwrap().uvs.is_none());
    assert_eq!(strip.geometry().unwrap().vertex_count(), 8);
}

#[test]
fn custom_uv_rule_is_sampled_per_vertex_pair() {
    let (env, _) = counting_env();
    let uv: UvFn = Arc::new(|i: usize, n: usize| [i as f64, n as f64, -(i as f64), 0.5]);
    let strip = Strip::new(&env, x_line(1.0), 2, 0.5, 0.0, Some(uv)).unwrap();
    let uvs = strip.geometry().and_then(|m| m.uvs.as_ref()).unwrap();
    assert_eq!(uvs, &vec![[0.0, 2.0], [0.0, 0.5], [1.0, 2.0], [-1.0, 0.5], [2.0, 2.0], [-2.0, 0.5]]);
}

#[test]
fn set_props_rebuilds_at_most_once() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 4).unwrap();
    let circle: SharedCurve = Arc::new(Circle3::new(Point3::ORIGIN, Vec3::Z, 1.0));

    strip.set_props(StripProps {
        curve: Some(Some(circle.clone())),
        segment: Some(16),
        radius: Some(ScalarSpec::Constant(0.2)),
        tilt: Some(ScalarSpec::Constant(0.3)),
        uv: Some(Some(UvPreset::Rotate0.uv_fn())),
    });
    assert_eq!(kernel.frame_calls(), 2);
    assert_eq!(strip.segment(), 16);
    assert!(Arc::ptr_eq(strip.curve().unwrap(), &circle));
    assert!(strip.geometry().unwrap().uvs.is_some());

    // Nothing differs: no rebuild.
    strip.set_props(StripProps {
        curve: Some(Some(circle)),
        segment: Some(16),
        radius: Some(ScalarSpec::Constant(0.2)),
        ..StripProps::default()
    });
    assert_eq!(kernel.frame_calls(), 2);

    // Empty update keeps everything.
    strip.set_props(StripProps::default());
    assert_eq!(kernel.frame_calls(), 2);
    assert!(strip.geometry().unwrap().uvs.is_some());
}

#[test]
fn set_props_clearing_uv_only_strips_the_attribute() {
    let (env, kernel) = counting_env();
    let mut strip =
        Strip::new(&env, x_line(1.0), 4, 0.5, 0.0, Some(UvPreset::Rotate0.uv_fn())).unwrap();
    strip.set_props(StripProps {
        uv: Some(None),
        ..StripProps::default()
    });
    assert_eq!(kernel.frame_calls(), 1);
    assert!(strip.uv().is_none());
    assert!(strip.geometry().unwrap().uvs.is_none());
}

#[test]
fn set_props_clamps_segment() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 1).unwrap();
    strip.set_props(StripProps {
        segment: Some(0),
        ..StripProps::default()
    });
    assert_eq!(strip.segment(), 1);
    assert_eq!(kernel.frame_calls(), 1);
}

#[test]
fn segment_setter_clamps_to_one() {
    let (env, _) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 5).unwrap();
    strip.set_segment(0);
    assert_eq!(strip.segment(), 1);
    assert_eq!(strip.geometry().unwrap().indices.len(), 6);
}

#[test]
fn inactive_radius_drops_geometry_until_a_valid_one_arrives() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 2).unwrap();

    strip.set_radius(f64::NAN);
    assert!(strip.radius().is_inactive());
    assert!(strip.geometry().is_none());
    assert!(strip.frames().is_none());
    assert!(!strip.is_disposed());
    assert_eq!(kernel.frame_calls(), 1);

    // No stale buffers for the new segment count either.
    strip.set_segment(8);
    assert_eq!(strip.segment(), 8);
    assert!(strip.geometry().is_none());

    strip.set_curve(None);
    assert!(strip.geometry().is_none());
    assert!(strip.frames().is_none());

    strip.set_curve(Some(x_line(1.0)));
    strip.set_radius(0.3);
    assert_eq!(kernel.frame_calls(), 2);
    assert_eq!(strip.geometry().unwrap().vertex_count(), 18);
    assert_eq!(strip.frames().map(<[_]>::len), Some(9));
}

#[test]
fn inactive_tilt_at_construction_builds_nothing() {
    let (env, kernel) = counting_env();
    let strip = Strip::new(&env, x_line(1.0), 4, 0.5, f64::NAN, None).unwrap();
    assert!(strip.geometry().is_none());
    assert!(strip.frames().is_none());
    assert_eq!(kernel.frame_calls(), 0);
}

#[test]
fn removing_the_curve_clears_geometry_until_a_new_one_arrives() {
    let (env, kernel) = counting_env();
    let mut strip = Strip::with_defaults(&env, x_line(1.0), 2).unwrap();

    strip.set_curve(None);
    assert!(strip.geometry().is_none());
    assert!(strip.frames().is_none());
    assert!(!strip.is_disposed());
    assert_eq!(kernel.frame_calls(), 1);

    strip.set_curve(Some(x_line(3.0)));
    assert_eq!(kernel.frame_calls(), 2);
    assert_eq!(strip.geometry().unwrap().vertex_count(), 6);
}
