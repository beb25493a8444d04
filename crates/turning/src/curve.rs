//! 2D parametric curves with arc-length sampling.
//!
//! Page profiles are Bézier curves in the page's bending plane. Sampling by
//! raw parameter compresses the page where curvature is high, so every
//! consumer samples through [`PageCurve::point_at`] / [`PageCurve::tangent_at`],
//! which remap the parameter by normalized cumulative length.

use glam::Vec2;

/// Derivatives shorter than this are treated as degenerate.
const MIN_TANGENT_LENGTH: f32 = 1e-6;

/// Step of the finite-difference tangent fallback.
const FALLBACK_STEP: f32 = 1e-3;

/// A parametric 2D curve over `t ∈ [0, 1]`.
pub trait Curve2 {
    fn point(&self, t: f32) -> Vec2;

    /// First derivative with respect to `t`.
    fn derivative(&self, t: f32) -> Vec2;

    /// Unit tangent at `t`.
    ///
    /// Degenerate control points can zero the derivative. Falls back to a
    /// central difference, then to the chord, then to `+X`, so the result is
    /// always a unit vector.
    fn tangent(&self, t: f32) -> Vec2 {
        let derivative = self.derivative(t);
        if derivative.length() > MIN_TANGENT_LENGTH {
            return derivative.normalize();
        }

        let t0 = (t - FALLBACK_STEP).max(0.0);
        let t1 = (t + FALLBACK_STEP).min(1.0);
        let difference = self.point(t1) - self.point(t0);
        if difference.length() > MIN_TANGENT_LENGTH {
            return difference.normalize();
        }

        let chord = self.point(1.0) - self.point(0.0);
        if chord.length() > MIN_TANGENT_LENGTH {
            return chord.normalize();
        }

        Vec2::X
    }
}

/// Quadratic Bézier through three control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Curve2 for QuadraticBezier {
    fn point(&self, t: f32) -> Vec2 {
        let k = 1.0 - t;
        self.p0 * (k * k) + self.p1 * (2.0 * k * t) + self.p2 * (t * t)
    }

    fn derivative(&self, t: f32) -> Vec2 {
        (self.p1 - self.p0) * (2.0 * (1.0 - t)) + (self.p2 - self.p1) * (2.0 * t)
    }
}

/// Cubic Bézier through four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl Curve2 for CubicBezier {
    fn point(&self, t: f32) -> Vec2 {
        let k = 1.0 - t;
        self.p0 * (k * k * k)
            + self.p1 * (3.0 * k * k * t)
            + self.p2 * (3.0 * k * t * t)
            + self.p3 * (t * t * t)
    }

    fn derivative(&self, t: f32) -> Vec2 {
        let k = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * k * k)
            + (self.p2 - self.p1) * (6.0 * k * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }
}

/// The two page profile shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    Quadratic(QuadraticBezier),
    Cubic(CubicBezier),
}

impl CurveShape {
    pub fn control_points(&self) -> Vec<Vec2> {
        match self {
            CurveShape::Quadratic(c) => vec![c.p0, c.p1, c.p2],
            CurveShape::Cubic(c) => vec![c.p0, c.p1, c.p2, c.p3],
        }
    }
}

impl Curve2 for CurveShape {
    fn point(&self, t: f32) -> Vec2 {
        match self {
            CurveShape::Quadratic(c) => c.point(t),
            CurveShape::Cubic(c) => c.point(t),
        }
    }

    fn derivative(&self, t: f32) -> Vec2 {
        match self {
            CurveShape::Quadratic(c) => c.derivative(t),
            CurveShape::Cubic(c) => c.derivative(t),
        }
    }
}

/// Cumulative chord lengths of a curve sampled at evenly spaced `t`.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    /// `lengths[i]` is the length from `t = 0` to `t = i / divisions`
    lengths: Vec<f32>,
}

impl ArcLengthTable {
    pub fn new(curve: &impl Curve2, divisions: usize) -> Self {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut previous = curve.point(0.0);
        let mut total = 0.0;
        lengths.push(0.0);
        for i in 1..=divisions {
            let current = curve.point(i as f32 / divisions as f32);
            total += current.distance(previous);
            lengths.push(total);
            previous = current;
        }
        Self { lengths }
    }

    pub fn total(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Map a normalized arc length `u ∈ [0, 1]` to the curve parameter `t`.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let total = self.total();
        let divisions = self.lengths.len() - 1;
        if total <= 0.0 {
            return u;
        }

        let target = u * total;
        // First index whose cumulative length reaches the target
        let upper = self
            .lengths
            .partition_point(|&length| length < target)
            .clamp(1, divisions);
        let lower = upper - 1;

        let before = self.lengths[lower];
        let segment = self.lengths[upper] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };

        (lower as f32 + fraction) / divisions as f32
    }
}

/// A page profile curve with its arc-length table.
#[derive(Debug, Clone)]
pub struct PageCurve {
    shape: CurveShape,
    arc: ArcLengthTable,
}

impl PageCurve {
    pub fn new(shape: CurveShape, divisions: usize) -> Self {
        let arc = ArcLengthTable::new(&shape, divisions);
        Self { shape, arc }
    }

    pub fn shape(&self) -> &CurveShape {
        &self.shape
    }

    pub fn control_points(&self) -> Vec<Vec2> {
        self.shape.control_points()
    }

    /// Point at raw parameter `t`.
    pub fn point(&self, t: f32) -> Vec2 {
        self.shape.point(t)
    }

    /// Unit tangent at raw parameter `t`.
    pub fn tangent(&self, t: f32) -> Vec2 {
        self.shape.tangent(t)
    }

    pub fn length(&self) -> f32 {
        self.arc.total()
    }

    /// Point at normalized arc length `u`.
    pub fn point_at(&self, u: f32) -> Vec2 {
        self.shape.point(self.arc.u_to_t(u))
    }

    /// Unit tangent at normalized arc length `u`.
    pub fn tangent_at(&self, u: f32) -> Vec2 {
        self.shape.tangent(self.arc.u_to_t(u))
    }

    /// `count + 1` points evenly spaced by arc length.
    pub fn spaced_points(&self, count: usize) -> Vec<Vec2> {
        let count = count.max(1);
        (0..=count)
            .map(|i| self.point_at(i as f32 / count as f32))
            .collect()
    }
}
