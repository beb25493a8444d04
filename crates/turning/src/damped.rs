//! Bounded, inertial, lockable scalar.
//!
//! A [`DampedScalar`] carries a value and a signed rate (inertia). While a
//! gesture holds it (`lock`) only explicit nudges move it; once released the
//! inertia integrates it forward, optionally pulled toward its nearer bound
//! by gravity, until it comes to rest.
//!
//! The scalar never drives itself: the owner calls [`DampedScalar::update`]
//! once per frame with the shared frame `dt`, then drains the queued
//! [`ScalarEvent`]s.

use tracing::trace;

use crate::math::{inverse_lerp, sign};
use crate::types::{DampedTuning, ScalarEvent};

#[derive(Debug, Clone)]
pub struct DampedScalar {
    value: f32,
    inertia: f32,
    min_value: f32,
    max_value: f32,
    locked: bool,
    dampen_distance: f32,
    gravity: f32,
    /// Applied (post-clamp) nudge delta accumulated since the last update
    nudge_delta: f32,
    /// Cleared once `Settled` was emitted, set again when the scalar moves
    settle_armed: bool,
    tuning: DampedTuning,
    events: Vec<ScalarEvent>,
}

impl Default for DampedScalar {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl DampedScalar {
    /// Create an unbounded scalar at rest.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            inertia: 0.0,
            min_value: f32::NEG_INFINITY,
            max_value: f32::INFINITY,
            locked: false,
            dampen_distance: 0.0,
            gravity: 0.0,
            nudge_delta: 0.0,
            settle_armed: true,
            tuning: DampedTuning::default(),
            events: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, min_value: f32, max_value: f32) -> Self {
        self.set_bounds(min_value, max_value);
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity.max(0.0);
        self
    }

    pub fn with_dampen_distance(mut self, dampen_distance: f32) -> Self {
        self.dampen_distance = dampen_distance.max(0.0);
        self
    }

    pub fn with_tuning(mut self, tuning: DampedTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Clamp `value` into the bounds, store it and emit `ValueChanged`.
    ///
    /// Emits even when the stored value does not change.
    pub fn set_value(&mut self, value: f32) {
        self.value = self.bounded(value);
        self.settle_armed = true;
        self.events.push(ScalarEvent::ValueChanged(self.value));
    }

    /// Move by `amount`, remembering only the part that survived clamping.
    ///
    /// The applied delta feeds the inertia estimate on the next update, so a
    /// nudge stopped by a bound does not build up speed.
    pub fn nudge(&mut self, amount: f32) {
        let previous = self.value;
        self.set_value(self.value + amount);
        self.nudge_delta += self.value - previous;
    }

    /// Move the lower bound. A bound above `max` drags `max` along with it.
    pub fn set_min(&mut self, min_value: f32) {
        self.min_value = min_value;
        if self.max_value < min_value {
            self.max_value = min_value;
        }
        self.rebound();
    }

    /// Move the upper bound. A bound below `min` drags `min` along with it.
    pub fn set_max(&mut self, max_value: f32) {
        self.max_value = max_value;
        if self.min_value > max_value {
            self.min_value = max_value;
        }
        self.rebound();
    }

    /// Redefine both bounds and clamp the current value into them.
    ///
    /// Inverted bounds collapse onto `min_value`.
    pub fn set_bounds(&mut self, min_value: f32, max_value: f32) {
        self.min_value = min_value;
        self.max_value = if max_value < min_value {
            min_value
        } else {
            max_value
        };
        self.rebound();
    }

    /// Widen the bounds to ±∞ so a future gesture can re-bound freely.
    pub fn unbound(&mut self) {
        self.min_value = f32::NEG_INFINITY;
        self.max_value = f32::INFINITY;
        self.settle_armed = true;
    }

    /// Clamp into the bounds without panicking on NaN bounds.
    fn bounded(&self, value: f32) -> f32 {
        value.max(self.min_value).min(self.max_value)
    }

    /// Pull the value back inside freshly changed bounds.
    fn rebound(&mut self) {
        let bounded = self.bounded(self.value);
        if bounded != self.value {
            self.value = bounded;
            self.inertia = 0.0;
            self.events.push(ScalarEvent::ValueChanged(bounded));
        }
        self.settle_armed = true;
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity.max(0.0);
        self.settle_armed = true;
    }

    /// Suspend integration. Nudges keep working.
    pub fn lock(&mut self) {
        self.locked = true;
        self.settle_armed = true;
    }

    /// Resume integration and report `Settled` right away if already at rest.
    pub fn release(&mut self) {
        self.locked = false;
        self.emit_settled_if_resting();
    }

    fn has_limits(&self) -> bool {
        self.min_value.is_finite() && self.max_value.is_finite()
    }

    pub fn is_settled(&self) -> bool {
        if self.locked || self.inertia != 0.0 {
            return false;
        }
        if self.gravity > 0.0 && self.has_limits() {
            self.value == self.min_value || self.value == self.max_value
        } else {
            true
        }
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<ScalarEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame.
    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        let tuning = self.tuning;

        if self.nudge_delta != 0.0 {
            self.inertia = self.inertia * tuning.inertia_keep
                + (self.nudge_delta / dt) * (1.0 - tuning.inertia_keep);
            self.nudge_delta = 0.0;
        } else if self.locked {
            self.inertia *= tuning.locked_decay * dt;
        }

        if !self.locked && self.gravity > 0.0 && self.has_limits() {
            if let Some(position) = inverse_lerp(self.min_value, self.max_value, self.value) {
                let mut force = (position * 2.0 - 1.0) * self.gravity * dt;
                if force.abs() < tuning.min_gravity_force {
                    // Exactly centered values fall toward the upper bound
                    let direction = if force < 0.0 { -1.0 } else { 1.0 };
                    force = tuning.min_gravity_force * direction;
                }
                self.inertia += force;
            }
        }

        if !self.locked && self.inertia != 0.0 {
            let delta = self.cushion(self.inertia * dt);
            let previous = self.value;
            self.value += delta;

            if self.value < self.min_value {
                self.value = self.min_value;
                self.inertia = 0.0;
            } else if self.value > self.max_value {
                self.value = self.max_value;
                self.inertia = 0.0;
            }

            if previous != self.value {
                self.settle_armed = true;
                self.events.push(ScalarEvent::ValueChanged(self.value));
            }

            if self.inertia.abs() < tuning.inertia_epsilon {
                self.inertia = 0.0;
            }

            trace!(
                value = self.value,
                inertia = self.inertia,
                "damped scalar integrated"
            );
        }

        self.emit_settled_if_resting();
    }

    /// Scale a step heading into a bound that is closer than the dampen
    /// distance, never below the minimum ratio.
    fn cushion(&self, delta: f32) -> f32 {
        if self.dampen_distance <= 0.0 {
            return delta;
        }
        let distance = match sign(delta) {
            s if s < 0.0 => self.value - self.min_value,
            s if s > 0.0 => self.max_value - self.value,
            _ => return delta,
        };
        if distance > 0.0 && distance < self.dampen_distance {
            delta * (distance / self.dampen_distance).max(self.tuning.min_dampen_ratio)
        } else {
            delta
        }
    }

    fn emit_settled_if_resting(&mut self) {
        if self.settle_armed && self.is_settled() {
            self.settle_armed = false;
            self.events.push(ScalarEvent::Settled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn count_settled(events: &[ScalarEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ScalarEvent::Settled))
            .count()
    }

    #[test]
    fn test_set_value_clamps_to_nearest_bound() {
        let mut scalar = DampedScalar::new(0.5).with_bounds(0.0, 1.0);
        scalar.set_value(3.0);
        assert_eq!(scalar.value(), 1.0);
        scalar.set_value(-2.0);
        assert_eq!(scalar.value(), 0.0);
        scalar.set_value(0.25);
        assert_eq!(scalar.value(), 0.25);
    }

    #[test]
    fn test_set_value_emits_even_when_unchanged() {
        let mut scalar = DampedScalar::new(0.0).with_bounds(0.0, 1.0);
        scalar.set_value(0.0);
        assert_eq!(scalar.drain_events(), vec![ScalarEvent::ValueChanged(0.0)]);
    }

    #[test]
    fn test_nudge_records_applied_delta_only() {
        let mut scalar = DampedScalar::new(0.9).with_bounds(0.0, 1.0);
        scalar.lock();
        scalar.nudge(0.5);
        assert_eq!(scalar.value(), 1.0);
        scalar.update(0.1);
        // Only 0.1 was applied: inertia = (0.1 / 0.1) / 3
        assert!((scalar.inertia() - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_free_scalar_settles_without_gravity() {
        let mut scalar = DampedScalar::new(0.0);
        scalar.lock();
        scalar.nudge(0.1);
        scalar.update(DT);
        scalar.release();
        assert!(!scalar.is_settled());

        // Without gravity or friction, inertia only bleeds off while held
        scalar.lock();
        for _ in 0..5 {
            scalar.update(DT);
        }
        scalar.release();
        scalar.update(DT);
        assert_eq!(scalar.inertia(), 0.0);
        assert!(scalar.is_settled());

        scalar.drain_events();
        let before = scalar.value();
        for _ in 0..10 {
            scalar.update(DT);
        }
        let events = scalar.drain_events();
        assert!(!events.iter().any(|e| matches!(e, ScalarEvent::ValueChanged(_))));
        assert_eq!(scalar.value(), before);
        assert!(scalar.is_settled());
    }

    #[test]
    fn test_clamp_resets_inertia() {
        let mut scalar = DampedScalar::new(0.5).with_bounds(0.0, 1.0);
        scalar.lock();
        scalar.nudge(0.4);
        scalar.update(0.001);
        scalar.release();
        assert!(scalar.inertia() > 100.0);

        scalar.update(DT);
        assert_eq!(scalar.value(), 1.0);
        assert_eq!(scalar.inertia(), 0.0);

        // Stopped dead, no bounce back
        scalar.update(DT);
        assert_eq!(scalar.value(), 1.0);
    }

    #[test]
    fn test_gravity_pulls_to_nearer_bound() {
        let mut scalar = DampedScalar::new(0.3).with_bounds(0.0, 1.0).with_gravity(10.0);
        let mut settled = 0;
        for _ in 0..600 {
            scalar.update(DT);
            settled += count_settled(&scalar.drain_events());
        }
        assert_eq!(scalar.value(), 0.0);
        assert!(scalar.is_settled());
        assert_eq!(settled, 1);
    }

    #[test]
    fn test_gravity_at_midpoint_does_not_stall() {
        let mut scalar = DampedScalar::new(0.5).with_bounds(0.0, 1.0).with_gravity(10.0);
        for _ in 0..600 {
            scalar.update(DT);
        }
        assert!(scalar.value() == 0.0 || scalar.value() == 1.0);
    }

    #[test]
    fn test_gravity_only_settles_on_bound() {
        let scalar = DampedScalar::new(0.3).with_bounds(0.0, 1.0).with_gravity(10.0);
        assert!(!scalar.is_settled());

        let unbounded = DampedScalar::new(0.3).with_gravity(10.0);
        assert!(unbounded.is_settled());
    }

    #[test]
    fn test_locked_ignores_gravity() {
        let mut scalar = DampedScalar::new(0.3).with_bounds(0.0, 1.0).with_gravity(10.0);
        scalar.lock();
        for _ in 0..60 {
            scalar.update(DT);
        }
        assert_eq!(scalar.value(), 0.3);
        assert!(!scalar.is_settled());
    }

    #[test]
    fn test_release_reports_settled_when_resting() {
        let mut scalar = DampedScalar::new(1.0).with_bounds(0.0, 1.0).with_gravity(10.0);
        scalar.lock();
        scalar.drain_events();
        scalar.release();
        assert_eq!(scalar.drain_events(), vec![ScalarEvent::Settled]);
    }

    #[test]
    fn test_settled_fires_once_per_transition() {
        let mut scalar = DampedScalar::new(0.0);
        scalar.update(DT);
        scalar.update(DT);
        scalar.update(DT);
        assert_eq!(count_settled(&scalar.drain_events()), 1);

        // Moving re-arms the notification
        scalar.set_value(0.5);
        scalar.update(DT);
        scalar.update(DT);
        assert_eq!(count_settled(&scalar.drain_events()), 1);
    }

    #[test]
    fn test_dampen_distance_cushions_near_bound() {
        let mut plain = DampedScalar::new(0.95).with_bounds(0.0, 1.0);
        let mut cushioned = DampedScalar::new(0.95)
            .with_bounds(0.0, 1.0)
            .with_dampen_distance(0.5);
        for scalar in [&mut plain, &mut cushioned] {
            scalar.lock();
            scalar.nudge(0.001);
            scalar.update(DT);
            scalar.release();
        }
        let plain_start = plain.value();
        let cushioned_start = cushioned.value();
        plain.update(DT);
        cushioned.update(DT);

        let plain_step = plain.value() - plain_start;
        let cushioned_step = cushioned.value() - cushioned_start;
        assert!(cushioned_step > 0.0);
        assert!(cushioned_step < plain_step);
        // Never slower than the minimum ratio
        assert!(cushioned_step >= plain_step * 0.2 - 1e-6);
    }

    #[test]
    fn test_moving_a_bound_pulls_value_inside() {
        let mut scalar = DampedScalar::new(0.5).with_bounds(0.0, 1.0);
        scalar.lock();
        scalar.drain_events();

        scalar.set_min(0.8);
        assert_eq!(scalar.value(), 0.8);
        assert_eq!(scalar.drain_events(), vec![ScalarEvent::ValueChanged(0.8)]);

        // Still inside while held
        scalar.update(DT);
        assert_eq!(scalar.value(), 0.8);

        scalar.set_max(0.9);
        assert_eq!(scalar.value(), 0.8);
        scalar.set_max(0.6);
        assert_eq!((scalar.min_value(), scalar.max_value()), (0.6, 0.6));
        assert_eq!(scalar.value(), 0.6);
    }

    #[test]
    fn test_inverted_bounds_collapse() {
        let mut scalar = DampedScalar::new(0.5).with_bounds(0.0, 1.0);
        scalar.set_min(2.0);
        assert_eq!((scalar.min_value(), scalar.max_value()), (2.0, 2.0));
        assert_eq!(scalar.value(), 2.0);

        scalar.nudge(0.1);
        assert_eq!(scalar.value(), 2.0);

        scalar.set_bounds(3.0, 1.0);
        assert_eq!((scalar.min_value(), scalar.max_value()), (3.0, 3.0));
        assert_eq!(scalar.value(), 3.0);

        let built = DampedScalar::new(0.0).with_bounds(1.0, -1.0);
        assert_eq!(built.value(), 1.0);
    }

    #[test]
    fn test_unbound_rearms_settle() {
        let mut scalar = DampedScalar::new(0.0).with_bounds(0.0, 1.0).with_gravity(10.0);
        scalar.update(DT);
        assert_eq!(count_settled(&scalar.drain_events()), 1);

        scalar.unbound();
        scalar.update(DT);
        scalar.update(DT);
        assert_eq!(count_settled(&scalar.drain_events()), 1);
        assert_eq!(scalar.value(), 0.0);
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let mut scalar = DampedScalar::new(0.3).with_bounds(0.0, 1.0).with_gravity(10.0);
        scalar.update(0.0);
        scalar.update(f32::NAN);
        assert_eq!(scalar.value(), 0.3);
        assert_eq!(scalar.inertia(), 0.0);
    }
}
