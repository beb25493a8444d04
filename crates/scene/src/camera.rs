//! Fixed perspective camera facing the book
//!
//! In the vertical layout only one page of a spread fits on screen; the
//! camera then follows the book's side shift between the left and the right
//! page with a cosine ease.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use flipbook_config::{CameraSettings, FlipbookConfig};
use turning::math::cosine_interpolate;
use turning::{BookController, LayoutMode};

use crate::book::{BookSystems, LastTick};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin spawning the camera and applying the side shift
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, follow_side_shift.after(BookSystems));
    }
}

/// Horizontal camera offset for a side shift in `[0, 1]`.
pub fn shift_offset(
    layout: LayoutMode,
    side_shift: f32,
    page_width: f32,
    settings: &CameraSettings,
) -> f32 {
    match layout {
        LayoutMode::Horizontal => 0.0,
        LayoutMode::Vertical => {
            let reach = page_width * settings.shift_fraction;
            cosine_interpolate(-reach, reach, side_shift.clamp(0.0, 1.0))
        }
    }
}

fn spawn_camera(mut commands: Commands, config: Res<FlipbookConfig>) {
    let settings = &config.camera;
    let x = shift_offset(config.book.layout, 0.0, config.book.page_width, settings);

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: settings.angle.to_radians(),
            near: settings.near_clip,
            far: settings.far_clip,
            ..default()
        }),
        Transform::from_xyz(x, 0.0, settings.distance).looking_to(Vec3::NEG_Z, Vec3::Y),
        Tonemapping::Reinhard,
        MainCamera,
    ));
}

fn follow_side_shift(
    config: Res<FlipbookConfig>,
    book: Option<Res<BookController>>,
    last_tick: Res<LastTick>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(book) = book else {
        return;
    };
    if last_tick.0.shift_settled {
        debug!("Side shift settled at {}", book.side_shift());
    }

    let x = shift_offset(
        config.book.layout,
        book.side_shift(),
        config.book.page_width,
        &config.camera,
    );
    for mut transform in camera_query.iter_mut() {
        transform.translation.x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_layout_never_shifts() {
        let settings = CameraSettings::default();
        for shift in [0.0, 0.3, 1.0] {
            assert_eq!(shift_offset(LayoutMode::Horizontal, shift, 445.0, &settings), 0.0);
        }
    }

    #[test]
    fn test_vertical_layout_eases_between_pages() {
        let settings = CameraSettings::default();
        let left = shift_offset(LayoutMode::Vertical, 0.0, 445.0, &settings);
        let middle = shift_offset(LayoutMode::Vertical, 0.5, 445.0, &settings);
        let right = shift_offset(LayoutMode::Vertical, 1.0, 445.0, &settings);
        assert!((left + 222.5).abs() < 1e-3);
        assert!(middle.abs() < 1e-3);
        assert!((right - 222.5).abs() < 1e-3);

        // Eased: a quarter of the way in covers less than a quarter of the distance
        let quarter = shift_offset(LayoutMode::Vertical, 0.25, 445.0, &settings);
        assert!(quarter < -222.5 + 445.0 * 0.25);
    }
}
