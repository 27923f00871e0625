use super::core::{Point3, Tolerance, Vec3};

/// Errors raised while constructing curves.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CurveError {
    #[error("polyline requires at least 2 points")]
    TooFewPoints,
    #[error("curve inputs must be finite")]
    NonFiniteInput,
    #[error("flat coordinate list length {0} is not a multiple of 3")]
    RaggedCoordinates(usize),
}

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        let dir = self.direction();
        self.start.add_vec(dir.mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec3 {
        self.direction()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3 {
    points: Vec<Point3>,
    cumulative_lengths: Vec<f64>,
    total_length: f64,
    closed: bool,
}

impl Polyline3 {
    pub fn new(mut points: Vec<Point3>, closed: bool) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints);
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CurveError::NonFiniteInput);
        }
        if closed && points.len() > 2 && points.first() == points.last() {
            points.pop();
        }

        let mut cumulative_lengths = Vec::with_capacity(points.len());
        cumulative_lengths.push(0.0);
        let mut total = 0.0;
        for window in points.windows(2) {
            total += window[1].sub_point(window[0]).length();
            cumulative_lengths.push(total);
        }

        if closed {
            total += points
                .first()
                .copied()
                .zip(points.last().copied())
                .map_or(0.0, |(first, last)| first.sub_point(last).length());
        }

        Ok(Self {
            points,
            cumulative_lengths,
            total_length: total,
            closed,
        })
    }

    /// Builds an open polyline from a flat `[x0, y0, z0, x1, y1, z1, ...]` list.
    pub fn from_flat(coords: &[f64]) -> Result<Self, CurveError> {
        if coords.len() % 3 != 0 {
            return Err(CurveError::RaggedCoordinates(coords.len()));
        }
        let points = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(points, false)
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }
}

impl Curve3 for Polyline3 {
    fn point_at(&self, t: f64) -> Point3 {
        if self.total_length <= 0.0 || !self.total_length.is_finite() {
            return self.points[0];
        }

        let mut target = t.clamp(0.0, 1.0) * self.total_length;

        let last_index = self.points.len() - 1;
        if target >= self.cumulative_lengths[last_index] {
            if !self.closed {
                return self.points[last_index];
            }

            let last = self.points[last_index];
            let first = self.points[0];
            let segment_length = first.sub_point(last).length();
            if segment_length == 0.0 {
                return last;
            }
            let ratio =
                ((target - self.cumulative_lengths[last_index]) / segment_length).clamp(0.0, 1.0);
            return last.lerp(first, ratio);
        }

        let idx = match self
            .cumulative_lengths
            .binary_search_by(|value| value.total_cmp(&target))
        {
            Ok(i) => i.min(last_index - 1),
            Err(i) => i.max(1) - 1,
        };

        let seg_start = self.points[idx];
        let seg_end = self.points[idx + 1];
        let seg_len = seg_end.sub_point(seg_start).length();
        if seg_len == 0.0 {
            return seg_start;
        }
        target -= self.cumulative_lengths[idx];
        seg_start.lerp(seg_end, (target / seg_len).clamp(0.0, 1.0))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
}

impl Circle3 {
    #[must_use]
    pub fn new(center: Point3, normal: Vec3, radius: f64) -> Self {
        let (x_axis, y_axis) = frame_axes_from_normal(normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
        }
    }
}

impl Curve3 for Circle3 {
    fn point_at(&self, t: f64) -> Point3 {
        let angle = std::f64::consts::TAU * t.clamp(0.0, 1.0);
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let angle = std::f64::consts::TAU * t.clamp(0.0, 1.0);
        let dx = self.x_axis.mul_scalar(-self.radius * angle.sin());
        let dy = self.y_axis.mul_scalar(self.radius * angle.cos());
        dx.add(dy).mul_scalar(std::f64::consts::TAU)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl Arc3 {
    #[must_use]
    pub fn new(center: Point3, normal: Vec3, radius: f64, start_angle: f64, sweep_angle: f64) -> Self {
        let (x_axis, y_axis) = frame_axes_from_normal(normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
            start_angle,
            sweep_angle,
        }
    }
}

impl Curve3 for Arc3 {
    fn point_at(&self, t: f64) -> Point3 {
        let angle = self.start_angle + self.sweep_angle * t.clamp(0.0, 1.0);
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let angle = self.start_angle + self.sweep_angle * t.clamp(0.0, 1.0);
        let dx = self.x_axis.mul_scalar(-self.radius * angle.sin());
        let dy = self.y_axis.mul_scalar(self.radius * angle.cos());
        dx.add(dy).mul_scalar(self.sweep_angle)
    }


    fn is_closed(&self) -> bool {
        const FULL_CIRCLE_TOLERANCE: f64 = 1e-9;
        (self.sweep_angle.abs() - std::f64::consts::TAU).abs() < FULL_CIRCLE_TOLERANCE
    }
}

/// Circular helix around `axis`, rising `pitch` per full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub axis: Vec3,
    pub radius: f64,
    pub pitch: f64,
    pub turns: f64,
}

impl Helix3 {
    #[must_use]
    pub fn new(center: Point3, axis: Vec3, radius: f64, pitch: f64, turns: f64) -> Self {
        let axis = axis.normalized().unwrap_or(Vec3::Z);
        let (x_axis, y_axis) = frame_axes_from_normal(axis);
        Self {
            center,
            x_axis,
            y_axis,
            axis,
            radius,
            pitch,
            turns,
        }
    }
}

impl Curve3 for Helix3 {
    fn point_at(&self, t: f64) -> Point3 {
        let u = t.clamp(0.0, 1.0);
        let angle = std::f64::consts::TAU * self.turns * u;
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
            .add_vec(self.axis.mul_scalar(self.pitch * self.turns * u))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let u = t.clamp(0.0, 1.0);
        let omega = std::f64::consts::TAU * self.turns;
        let angle = omega * u;
        self.x_axis
            .mul_scalar(-self.radius * omega * angle.sin())
            .add(self.y_axis.mul_scalar(self.radius * omega * angle.cos()))
            .add(self.axis.mul_scalar(self.pitch * self.turns))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
}

impl QuadraticBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self { p0, p1, p2 }
    }
}

impl Curve3 for QuadraticBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        point_weighted_sum(&[(self.p0, u * u), (self.p1, 2.0 * u * t), (self.p2, t * t)])
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        a.mul_scalar(2.0 * u).add(b.mul_scalar(2.0 * t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        point_weighted_sum(&[
            (self.p0, u2 * u),
            (self.p1, 3.0 * u2 * t),
            (self.p2, 3.0 * u * t2),
            (self.p3, t2 * t),
        ])
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        let c = self.p3.sub_point(self.p2);
        a.mul_scalar(3.0 * u * u)
            .add(b.mul_scalar(6.0 * u * t))
            .add(c.mul_scalar(3.0 * t * t))
    }
}

// ============================================================================
// Arc-Length Sampling
// ============================================================================

/// An entry in the arc-length lookup table.
struct ArcLengthEntry {
    parameter: f64,
    arc_length: f64,
}

/// Approximate arc length of a curve using `samples` chords.
#[must_use]
pub fn curve_arc_length<C: Curve3 + ?Sized>(curve: &C, samples: usize) -> f64 {
    build_arc_length_table(curve, samples.max(1) + 1)
        .last()
        .map_or(0.0, |e| e.arc_length)
}

/// Parameters of `count + 1` points spaced evenly by arc length, endpoints included.
///
/// `table_density` is the number of chord samples per requested segment used to
/// build the arc-length lookup table.
#[must_use]
pub fn spaced_parameters<C: Curve3 + ?Sized>(
    curve: &C,
    count: usize,
    table_density: usize,
) -> Vec<f64> {
    let count = count.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return vec![t0; count + 1];
    }

    let denom = count as f64;
    let sample_count = count.saturating_mul(table_density.max(1)).clamp(32, 65_536);
    let table = build_arc_length_table(curve, sample_count);
    let total = table.last().map_or(0.0, |e| e.arc_length);
    if !total.is_finite() || total <= 0.0 {
        return (0..=count).map(|i| t0 + span * (i as f64 / denom)).collect();
    }

    (0..=count)
        .map(|i| {
            if i == count {
                t1
            } else {
                parameter_at_arc_length(&table, t0, t1, total * (i as f64 / denom))
            }
        })
        .collect()
}

fn build_arc_length_table<C: Curve3 + ?Sized>(curve: &C, samples: usize) -> Vec<ArcLengthEntry> {
    let samples = samples.max(2);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;

    let mut table = Vec::with_capacity(samples);
    let mut prev = curve.point_at(t0);
    let mut cumulative = 0.0;

    table.push(ArcLengthEntry {
        parameter: t0,
        arc_length: 0.0,
    });

    for i in 1..samples {
        let t = t0 + span * (i as f64 / (samples - 1) as f64);
        let curr = curve.point_at(t);
        cumulative += curr.sub_point(prev).length();
        table.push(ArcLengthEntry {
            parameter: t,
            arc_length: cumulative,
        });
        prev = curr;
    }

    table
}

fn parameter_at_arc_length(table: &[ArcLengthEntry], t0: f64, t1: f64, target_length: f64) -> f64 {
    if table.len() < 2 {
        return table.first().map_or(t0, |e| e.parameter);
    }

    let total = table.last().map_or(0.0, |e| e.arc_length);
    if target_length <= 0.0 {
        return t0;
    }
    if target_length >= total {
        return t1;
    }

    let idx = table
        .binary_search_by(|entry| entry.arc_length.total_cmp(&target_length))
        .unwrap_or_else(|i| i.saturating_sub(1));

    let idx = idx.min(table.len() - 2);
    let e0 = &table[idx];
    let e1 = &table[idx + 1];

    let segment_length = e1.arc_length - e0.arc_length;
    if segment_length.abs() < 1e-14 {
        return e0.parameter;
    }

    let ratio = (target_length - e0.arc_length) / segment_length;
    e0.parameter + (e1.parameter - e0.parameter) * ratio.clamp(0.0, 1.0)
}

fn point_weighted_sum(terms: &[(Point3, f64)]) -> Point3 {
    terms.iter().fold(Point3::ORIGIN, |acc, (p, w)| {
        Point3::new(acc.x + p.x * w, acc.y + p.y * w, acc.z + p.z * w)
    })
}

fn frame_axes_from_normal(normal: Vec3) -> (Vec3, Vec3) {
    let z = normal.normalized().unwrap_or(Vec3::Z);
    let x = orthogonal_unit_vector(z);
    let y = z.cross(x).normalized().unwrap_or(Vec3::Y);
    (x, y)
}

fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}
