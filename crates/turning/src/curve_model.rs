//! Page profile construction.
//!
//! Builds the spine-to-edge curve of a page from its turn state. The curve
//! lives in the page's bending plane: `x` runs toward the right stack and `y`
//! points away from the book (toward the viewer). A turn progress of `1`
//! lies flat to the right, `-1` flat to the left and `0` stands upright.
//!
//! Covers are rigid: a quadratic whose three points sit on one line through
//! the hinge. Inner pages are cubic: the spine anchor, a handle lifted by the
//! stack elevation, a mid point following the live turn progress and a tip
//! following the trailing lag, so the free edge droops behind the turn.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::curve::{CubicBezier, CurveShape, PageCurve, QuadraticBezier};
use crate::math::lerp;
use crate::types::{CurveTuning, PageKind};

/// Everything the curve depends on, snapshotted from a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveState {
    pub kind: PageKind,
    pub turn_progress: f32,
    pub turn_progress_lag: f32,
    pub elevation_left: f32,
    pub elevation_right: f32,
    pub width: f32,
    pub root_thickness: f32,
}

impl CurveState {
    /// Elevation picked between the two stacks by where the page leans.
    ///
    /// Leaning left (`turn_progress < 0`) rests the page on the left stack.
    pub fn elevation(&self, tuning: &CurveTuning) -> f32 {
        let turn_progress = self.turn_progress.clamp(-1.0, 1.0);
        let selector = (turn_progress + 1.0) / 2.0;
        let scale = if turn_progress < 0.0 {
            tuning.left_elevation_scale
        } else {
            tuning.right_elevation_scale
        };
        lerp(self.elevation_left, self.elevation_right, selector) * scale
    }
}

/// Point at `distance` from the spine in the direction of `turn_progress`,
/// never below the stack elevation.
pub fn polar(turn_progress: f32, distance: f32, elevation: f32) -> Vec2 {
    let angle = turn_progress * FRAC_PI_2;
    Vec2::new(
        angle.sin() * distance,
        (angle.cos() * distance).max(elevation),
    )
}

/// Control points of a cover's quadratic profile.
pub fn cover_control_points(state: &CurveState, front: bool) -> QuadraticBezier {
    let turn_progress = state.turn_progress.clamp(-1.0, 1.0);
    let angle = (1.0 - turn_progress) * FRAC_PI_2;
    let direction = Vec2::new(angle.cos(), angle.sin());
    let perpendicular = direction.perp();

    let cover_thickness = state.root_thickness / 2.0;
    let side = if front { 1.0 } else { -1.0 };
    let lateral = perpendicular * (side * state.root_thickness / 2.0);

    let start = direction * -cover_thickness + lateral;
    let end = direction * (state.width - cover_thickness) + lateral;

    QuadraticBezier {
        p0: start,
        p1: start.lerp(end, 0.5),
        p2: end,
    }
}

/// Control points of an inner page's cubic profile.
pub fn inner_control_points(state: &CurveState, tuning: &CurveTuning) -> CubicBezier {
    let turn_progress = state.turn_progress.clamp(-1.0, 1.0);
    let lag = state.turn_progress_lag.clamp(-1.0, 1.0);
    let elevation = state.elevation(tuning);

    CubicBezier {
        p0: Vec2::ZERO,
        p1: Vec2::new(0.0, elevation * tuning.handle_elevation_factor),
        p2: polar(turn_progress, state.width / 2.0, elevation),
        p3: polar(lag, state.width, elevation),
    }
}

/// Build the profile curve for the current page state.
pub fn build_curve(state: &CurveState, tuning: &CurveTuning) -> PageCurve {
    let shape = match state.kind {
        PageKind::Cover { front } => CurveShape::Quadratic(cover_control_points(state, front)),
        PageKind::Inner => CurveShape::Cubic(inner_control_points(state, tuning)),
    };
    PageCurve::new(shape, tuning.arc_divisions)
}
