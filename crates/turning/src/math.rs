//! Scalar helpers shared by the curve model, the pages and the damped scalars.

/// Snap distance used by [`approach`].
pub const APPROACH_SNAP: f32 = 0.0001;

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Position of `value` between `a` and `b`, unclamped.
///
/// Returns `None` when the range is empty or not finite, so callers can skip
/// work instead of propagating NaN.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> Option<f32> {
    let span = b - a;
    if span == 0.0 || !span.is_finite() {
        return None;
    }
    let t = (value - a) / span;
    t.is_finite().then_some(t)
}

/// Cosine-eased interpolation between `a` and `b`.
pub fn cosine_interpolate(a: f32, b: f32, t: f32) -> f32 {
    let eased = (1.0 - (std::f32::consts::PI * t).cos()) / 2.0;
    a + (b - a) * eased
}

/// Exponential approach of `value` toward `target`.
///
/// Frame-rate independent: the remaining gap shrinks by `exp(-speed * dt)`
/// every call, and snaps to `target` once it is below [`APPROACH_SNAP`].
pub fn approach(value: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let difference = target - value;
    if difference.abs() < APPROACH_SNAP {
        return target;
    }
    value + difference * (1.0 - (-speed * dt).exp())
}

/// Sign that treats zero as zero (unlike `f32::signum`).
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
