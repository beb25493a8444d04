//! Page curve debug overlay
//!
//! Press F3 to draw every leaf's profile curve and its control points at
//! mid height.

use bevy::prelude::*;
use turning::BookController;

use crate::book::{BookSystems, Leaf};

/// Polyline resolution of the drawn curves
const CURVE_SEGMENTS: usize = 32;

/// Toggle and colors of the curve overlay
#[derive(Resource)]
pub struct CurveDebugState {
    pub enabled: bool,
    pub curve_color: Color,
    pub control_color: Color,
    /// Radius of the control point markers in world units
    pub control_radius: f32,
}

impl Default for CurveDebugState {
    fn default() -> Self {
        Self {
            enabled: false,
            curve_color: Color::srgb(1.0, 0.4, 0.1),
            control_color: Color::srgb(0.1, 0.6, 1.0),
            control_radius: 4.0,
        }
    }
}

/// Plugin for the curve debug overlay
pub struct CurveDebugPlugin;

impl Plugin for CurveDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurveDebugState>().add_systems(
            Update,
            (toggle_curve_debug, draw_page_curves.after(BookSystems)),
        );
    }
}

fn toggle_curve_debug(key_input: Res<ButtonInput<KeyCode>>, mut state: ResMut<CurveDebugState>) {
    if key_input.just_pressed(KeyCode::F3) {
        state.enabled = !state.enabled;
        info!("Curve debug overlay: {}", state.enabled);
    }
}

fn draw_page_curves(
    state: Res<CurveDebugState>,
    book: Option<Res<BookController>>,
    leaves: Query<(&Leaf, &GlobalTransform)>,
    mut gizmos: Gizmos,
) {
    if !state.enabled {
        return;
    }
    let Some(book) = book else {
        return;
    };

    for (leaf, transform) in leaves.iter() {
        let Some(page) = book.page(leaf.index) else {
            continue;
        };
        let (line, controls) = book.deformer().curve_polyline(page, CURVE_SEGMENTS);

        for segment in line.windows(2) {
            gizmos.line(
                transform.transform_point(segment[0]),
                transform.transform_point(segment[1]),
                state.curve_color,
            );
        }
        for control in controls {
            gizmos.sphere(
                Isometry3d::from_translation(transform.transform_point(control)),
                state.control_radius,
                state.control_color,
            );
        }
    }
}
