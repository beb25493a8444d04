//! Book spawning, per-frame tick and mesh upload

use bevy::asset::RenderAssetUsages;
use bevy::camera::primitives::Aabb;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use flipbook_config::FlipbookConfig;
use turning::{BookController, PageKind, SlabMesh, TickReport};

use crate::pointer::handle_pointer;

/// Render order changes smaller than this are not pushed to the material
const DEPTH_BIAS_EPSILON: f32 = 0.01;

/// One leaf of the book, indexing into the [`BookController`] pages
#[derive(Component, Debug, Clone, Copy)]
pub struct Leaf {
    pub index: usize,
}

/// Outcome of the most recent book tick
#[derive(Resource, Debug, Default)]
pub struct LastTick(pub TickReport);

/// Pointer input, book tick and leaf sync, in that order
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookSystems;

/// Plugin building the book and driving it every frame
pub struct BookPlugin;

impl Plugin for BookPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastTick>()
            .add_systems(Startup, spawn_book)
            .add_systems(
                Update,
                (handle_pointer, tick_book, sync_leaves)
                    .chain()
                    .in_set(BookSystems),
            );
    }
}

/// Convert a slab mesh into a Bevy mesh that stays writable on the CPU
pub fn slab_to_bevy_mesh(slab: &SlabMesh) -> Mesh {
    let positions: Vec<[f32; 3]> = slab.positions().iter().map(|p| p.to_array()).collect();
    let normals: Vec<[f32; 3]> = slab.normals().iter().map(|n| n.to_array()).collect();
    let uvs: Vec<[f32; 2]> = slab.uvs().iter().map(|uv| uv.to_array()).collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(slab.indices().to_vec()));
    mesh
}

fn slab_aabb(slab: &SlabMesh) -> Aabb {
    let bounds = slab.bounds();
    Aabb::from_min_max(bounds.min, bounds.max)
}

/// Build the book from the configuration and spawn one entity per leaf
fn spawn_book(
    mut commands: Commands,
    config: Res<FlipbookConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut book = match BookController::new(config.book.book_spec(), config.turning) {
        Ok(book) => book,
        Err(err) => {
            error!("Failed to build book: {}", err);
            return;
        }
    };

    // Write the resting shape before the first frame is drawn
    book.tick(f32::EPSILON);

    let spine = book.spine_positions();
    for (index, position) in spine.into_iter().enumerate() {
        let Some(kind) = book.page(index).map(|page| page.kind()) else {
            continue;
        };
        let Some(slab) = book.mesh_mut(index) else {
            continue;
        };
        let base_color = match kind {
            PageKind::Cover { .. } => Color::srgb(0.45, 0.12, 0.1),
            PageKind::Inner => Color::srgb(0.95, 0.93, 0.88),
        };
        slab.take_dirty();

        commands.spawn((
            Mesh3d(meshes.add(slab_to_bevy_mesh(slab))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color,
                perceptual_roughness: 0.9,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::from_translation(position),
            slab_aabb(slab),
            Leaf { index },
            Name::new(format!("Leaf {}", index)),
        ));
    }

    info!(
        "Book spawned: {} leaves, {:?} layout",
        book.page_count(),
        config.book.layout
    );
    commands.insert_resource(book);
}

/// Advance the book with the frame delta
fn tick_book(
    time: Res<Time>,
    book: Option<ResMut<BookController>>,
    mut last_tick: ResMut<LastTick>,
) {
    let Some(mut book) = book else {
        return;
    };
    let report = book.tick(time.delta_secs());
    if report.progress_settled {
        debug!("Book progress settled at {}", book.progress());
    }
    last_tick.0 = report;
}

/// Push deformed vertices, hinge positions and draw order to the leaves
fn sync_leaves(
    book: Option<ResMut<BookController>>,
    mut leaves: Query<(
        &Leaf,
        &Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
        &mut Transform,
        &mut Aabb,
    )>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut book) = book else {
        return;
    };
    let spine = book.spine_positions();

    for (leaf, mesh_handle, material_handle, mut transform, mut aabb) in leaves.iter_mut() {
        if let Some(position) = spine.get(leaf.index) {
            transform.translation = *position;
        }

        let depth_bias = book.render_order(leaf.index);
        // get_mut flags the asset as modified, so only touch it on a real change
        let stale = materials
            .get(&material_handle.0)
            .is_some_and(|material| (material.depth_bias - depth_bias).abs() > DEPTH_BIAS_EPSILON);
        if stale {
            if let Some(material) = materials.get_mut(&material_handle.0) {
                material.depth_bias = depth_bias;
            }
        }

        let Some(slab) = book.mesh_mut(leaf.index) else {
            continue;
        };
        if !slab.take_dirty() {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
            continue;
        };

        let positions: Vec<[f32; 3]> = slab.positions().iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = slab.normals().iter().map(|n| n.to_array()).collect();
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        *aabb = slab_aabb(slab);
    }
}
