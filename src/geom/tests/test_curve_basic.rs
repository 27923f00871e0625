use crate::geom::{
    Arc3, Circle3, CubicBezier3, Curve3, CurveError, Helix3, Line3, Point3, Polyline3,
    QuadraticBezier3, Tolerance, Vec3, curve_arc_length, spaced_parameters,
};

#[test]
fn line_tangent_is_constant_and_unit() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    assert_eq!(line.point_at(0.5), Point3::new(5.0, 0.0, 0.0));
    assert_eq!(line.tangent_at(0.0), Some(Vec3::X));
    assert_eq!(line.tangent_at(1.0), Some(Vec3::X));
}

#[test]
fn degenerate_line_has_no_tangent() {
    let p = Point3::new(1.0, 2.0, 3.0);
    let line = Line3::new(p, p);
    assert!(line.tangent_at(0.5).is_none());
}

#[test]
fn polyline_interpolates_by_arc_length() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ],
        false,
    )
    .unwrap();
    let tol = Tolerance::new(1e-12);
    assert!((polyline.total_length() - 2.0).abs() < 1e-12);
    assert!(tol.approx_eq_point3(polyline.point_at(0.5), Point3::new(1.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(polyline.point_at(0.75), Point3::new(1.0, 0.5, 0.0)));
    assert_eq!(polyline.point_at(1.0), Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn polyline_rejects_bad_input() {
    assert_eq!(
        Polyline3::new(vec![Point3::ORIGIN], false).unwrap_err(),
        CurveError::TooFewPoints
    );
    assert_eq!(
        Polyline3::new(vec![Point3::ORIGIN, Point3::new(f64::NAN, 0.0, 0.0)], false).unwrap_err(),
        CurveError::NonFiniteInput
    );
    assert_eq!(
        Polyline3::from_flat(&[0.0, 0.0, 0.0, 1.0]).unwrap_err(),
        CurveError::RaggedCoordinates(4)
    );
}

#[test]
fn polyline_from_flat_matches_points() {
    let polyline = Polyline3::from_flat(&[0.0, 0.0, 0.0, 0.0, 2.0, 0.0]).unwrap();
    assert_eq!(polyline.points().len(), 2);
    assert_eq!(polyline.points()[1], Point3::new(0.0, 2.0, 0.0));
    assert!(!polyline.is_closed());
}

#[test]
fn closed_polyline_drops_repeated_endpoint() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ],
        true,
    )
    .unwrap();
    assert_eq!(polyline.points().len(), 3);
    assert!(polyline.is_closed());
    assert!((polyline.total_length() - (2.0 + 2.0_f64.sqrt())).abs() < 1e-12);
}

#[test]
fn circle_is_closed_and_keeps_radius() {
    let circle = Circle3::new(Point3::new(1.0, 1.0, 0.0), Vec3::Z, 2.0);
    assert!(circle.is_closed());
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(circle.point_at(0.0), circle.point_at(1.0)));
    for i in 0..8 {
        let t = i as f64 / 8.0;
        let d = circle.point_at(t).distance_to(circle.center);
        assert!((d - 2.0).abs() < 1e-12, "t={t} distance={d}");
    }

    let length = curve_arc_length(&circle, 256);
    assert!((length - 4.0 * std::f64::consts::PI).abs() < 1e-3, "length={length}");
}

#[test]
fn arc_sweep_matches_angle() {
    let arc = Arc3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.0, std::f64::consts::FRAC_PI_2);
    let start = arc.point_at(0.0).to_vec3();
    let end = arc.point_at(1.0).to_vec3();
    assert!((start.length() - 1.0).abs() < 1e-12);
    assert!((end.length() - 1.0).abs() < 1e-12);
    assert!(start.dot(end).abs() < 1e-12);
    assert!(!arc.is_closed());

    let full = Arc3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.0, std::f64::consts::TAU);
    assert!(full.is_closed());
}

#[test]
fn helix_rises_by_pitch_per_turn() {
    let helix = Helix3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.5, 3.0);
    let start = helix.point_at(0.0);
    let end = helix.point_at(1.0);
    assert!(start.z.abs() < 1e-12);
    assert!((end.z - 1.5).abs() < 1e-12);
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_f64(start.x, end.x));
    assert!(tol.approx_eq_f64(start.y, end.y));

    // Analytic derivative should agree with the finite-difference default.
    let t = 0.3;
    let h = 1e-6;
    let numeric = helix.point_at(t + h).sub_point(helix.point_at(t - h)) / (2.0 * h);
    let analytic = helix.derivative_at(t);
    assert!((numeric - analytic).length() < 1e-4 * analytic.length());
}

#[test]
fn bezier_derivatives_are_analytic() {
    let quad = QuadraticBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    );
    assert_eq!(quad.derivative_at(0.5), Vec3::new(2.0, 0.0, 0.0));

    let cubic = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    );
    assert_eq!(cubic.point_at(0.5), Point3::new(1.5, 0.0, 0.0));
    assert_eq!(cubic.derivative_at(0.25), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn spaced_parameters_include_both_ends() {
    let line = Line3::new(Point3::ORIGIN, Point3::new(4.0, 0.0, 0.0));
    let params = spaced_parameters(&line, 4, 16);
    assert_eq!(params.len(), 5);
    assert_eq!(params[0], 0.0);
    assert_eq!(params[4], 1.0);
    for (i, t) in params.iter().enumerate() {
        assert!((t - i as f64 / 4.0).abs() < 1e-9, "i={i} t={t}");
    }
}

#[test]
fn spaced_parameters_equalize_chord_lengths() {
    // Strongly non-uniform parameterization: control points bunched at the start.
    let curve = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.1, 0.0, 0.0),
        Point3::new(0.2, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
    );
    let params = spaced_parameters(&curve, 10, 32);
    let points: Vec<Point3> = params.iter().map(|&t| curve.point_at(t)).collect();
    for window in points.windows(2) {
        let chord = window[0].distance_to(window[1]);
        assert!((chord - 1.0).abs() < 1e-2, "chord={chord}");
    }
}

#[test]
fn spaced_parameters_on_degenerate_curve_stay_finite() {
    let p = Point3::new(1.0, 1.0, 1.0);
    let line = Line3::new(p, p);
    let params = spaced_parameters(&line, 3, 16);
    assert_eq!(params.len(), 4);
    assert!(params.iter().all(|t| t.is_finite()));
    assert_eq!(params[3], 1.0);
}
