//! Core turning types and feel tuning.
//!
//! The tuning structs hold the empirical "feel" constants of the flipbook.
//! Values are configurable and should not be treated as magic numbers.

use serde::{Deserialize, Serialize};

/// Whether a page is a rigid cover or a bendable inner page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    /// Hard cover hinged at the spine. `front` selects the side its
    /// thickness is offset to.
    Cover { front: bool },
    /// Flexible inner page bending along a cubic curve
    Inner,
}

impl PageKind {
    pub fn is_cover(&self) -> bool {
        matches!(self, PageKind::Cover { .. })
    }
}

/// How the viewer frames the book, which decides whether a drag may shift
/// the view instead of turning a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Both pages of a spread visible; every drag turns
    #[default]
    Horizontal,
    /// One page visible at a time; drags shift between left and right page
    Vertical,
}

/// Tuning for [`crate::damped::DampedScalar`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampedTuning {
    /// Weight kept from the previous inertia when blending in a nudge (default: 2/3)
    pub inertia_keep: f32,
    /// Inertia multiplier per second while locked without input (default: 0.25)
    pub locked_decay: f32,
    /// Smallest gravity force applied per tick, keeps the value off the midpoint (default: 0.001)
    pub min_gravity_force: f32,
    /// Lowest speed ratio inside the cushioning radius (default: 1/5)
    pub min_dampen_ratio: f32,
    /// Inertia below this magnitude is zeroed (default: 0.001)
    pub inertia_epsilon: f32,
}

impl Default for DampedTuning {
    fn default() -> Self {
        Self {
            inertia_keep: 2.0 / 3.0,
            locked_decay: 0.25,
            min_gravity_force: 0.001,
            min_dampen_ratio: 1.0 / 5.0,
            inertia_epsilon: 0.001,
        }
    }
}

/// Tuning for the gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Pixels of horizontal drag per unit of progress (default: 500)
    pub drag_scale: f32,
    /// Multiplier for side-shift nudges, the shift range is half a turn (default: 2)
    pub shift_scale: f32,
    /// Gravity of the book progress scalar, snaps turns to whole pages (default: 10)
    pub turn_gravity: f32,
    /// Gravity of the side-shift scalar (default: 10)
    pub shift_gravity: f32,
    /// Soft cushioning radius near the progress bounds (default: 0)
    pub dampen_distance: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            drag_scale: 500.0,
            shift_scale: 2.0,
            turn_gravity: 10.0,
            shift_gravity: 10.0,
            dampen_distance: 0.0,
        }
    }
}

/// Tuning for the inner page curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveTuning {
    /// Height of the spine handle relative to the elevation (default: 2)
    pub handle_elevation_factor: f32,
    /// Elevation scale while the page leans left (default: 1)
    pub left_elevation_scale: f32,
    /// Elevation scale while the page leans right (default: 1)
    pub right_elevation_scale: f32,
    /// Arc-length table resolution (default: 200)
    pub arc_divisions: usize,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            handle_elevation_factor: 2.0,
            left_elevation_scale: 1.0,
            right_elevation_scale: 1.0,
            arc_divisions: 200,
        }
    }
}

/// Tuning for the trailing turn-progress lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagTuning {
    /// Catch-up speed of the page under the pointer (default: 5)
    pub grabbed_speed: f32,
    /// Catch-up speed of every other page (default: 25)
    pub settle_speed: f32,
}

impl Default for LagTuning {
    fn default() -> Self {
        Self {
            grabbed_speed: 5.0,
            settle_speed: 25.0,
        }
    }
}

/// All feel tuning of the turning core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurningConfig {
    pub damped: DampedTuning,
    pub gesture: GestureTuning,
    pub curve: CurveTuning,
    pub lag: LagTuning,
}

/// Events emitted by a [`crate::damped::DampedScalar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarEvent {
    /// The value was written (by input or integration)
    ValueChanged(f32),
    /// The scalar came to rest
    Settled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_matches_feel_constants() {
        let config = TurningConfig::default();
        assert_eq!(config.gesture.drag_scale, 500.0);
        assert_eq!(config.gesture.shift_scale, 2.0);
        assert_eq!(config.gesture.turn_gravity, 10.0);
        assert_eq!(config.damped.min_gravity_force, 0.001);
        assert_eq!(config.damped.min_dampen_ratio, 0.2);
        assert_eq!(config.lag.grabbed_speed, 5.0);
        assert_eq!(config.lag.settle_speed, 25.0);
    }

    #[test]
    fn test_page_kind() {
        assert!(PageKind::Cover { front: true }.is_cover());
        assert!(!PageKind::Inner.is_cover());
    }
}
