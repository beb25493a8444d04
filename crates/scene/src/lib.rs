//! Bevy scene for the flipbook
//!
//! This crate wires the engine-independent `turning` core into Bevy: it
//! spawns one mesh per leaf, feeds pointer input to the gesture session,
//! ticks the book every frame and uploads the deformed vertices.

use bevy::prelude::*;
use flipbook_config::FlipbookConfig;

mod book;
mod camera;
mod curve_debug;
mod lighting;
mod pointer;

pub use book::{BookPlugin, BookSystems, LastTick, Leaf, slab_to_bevy_mesh};
pub use camera::{CameraPlugin, MainCamera, shift_offset};
pub use curve_debug::{CurveDebugPlugin, CurveDebugState};
pub use lighting::{BookLight, LightingPlugin};
pub use pointer::{PointerId, PointerPlugin, PointerTracker};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlipbookConfig>();

        app.add_plugins(BookPlugin);
        app.add_plugins(PointerPlugin);
        app.add_plugins(CameraPlugin);
        app.add_plugins(LightingPlugin);
        app.add_plugins(CurveDebugPlugin);

        app.add_systems(Startup, setup_desk);
    }
}

/// Desk surface just behind the closed book
fn setup_desk(
    mut commands: Commands,
    config: Res<FlipbookConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let book = &config.book;
    let depth = book.cover_thickness.max(book.page_root_thickness) + 1.0;

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Z, Vec2::splat(1500.0)).mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.25, 0.16),
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.0, -depth),
        Name::new("Desk"),
    ));
}
