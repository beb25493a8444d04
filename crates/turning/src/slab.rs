//! Box-topology page mesh.
//!
//! A page is a thin slab: `X` across its thickness, `Y` along its height and
//! `Z` from spine to free edge. The topology (six subdivided faces with their
//! own vertices) is fixed at construction; deformation only rewrites vertex
//! positions, after which normals and bounds are recomputed.

use glam::{Vec2, Vec3};

/// Mesh abstraction the deformer writes into.
pub trait VertexBuffer {
    fn vertex_count(&self) -> usize;

    fn position(&self, index: usize) -> Vec3;

    fn set_position(&mut self, index: usize, position: Vec3);

    /// Signal the end of a batch of position writes.
    fn mark_dirty(&mut self);
}

/// Subdivision counts along the three slab axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabSegments {
    /// Across the thickness
    pub x: u32,
    /// Along the height
    pub y: u32,
    /// From spine to free edge
    pub z: u32,
}

impl SlabSegments {
    /// Inner pages bend, so they are subdivided along their width.
    pub const INNER: Self = Self { x: 1, y: 1, z: 20 };
    /// Covers stay rigid.
    pub const COVER: Self = Self { x: 1, y: 1, z: 1 };
}

/// Axis-aligned bounds of the mesh in page-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SlabBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// CPU-side slab mesh.
#[derive(Debug, Clone)]
pub struct SlabMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    bounds: SlabBounds,
    dirty: bool,
}

/// One face of the box: outward normal and the two in-plane axes with
/// `u × v == normal`, so the generated triangles wind counter-clockwise.
struct FaceSpec {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
    u_size: f32,
    v_size: f32,
    depth: f32,
    u_segments: u32,
    v_segments: u32,
}

impl FaceSpec {
    /// `size` is `[u, v, depth]`, `segments` is `[u, v]`.
    fn new(normal: Vec3, u: Vec3, v: Vec3, size: [f32; 3], segments: [u32; 2]) -> Self {
        let [u_size, v_size, depth] = size;
        let [u_segments, v_segments] = segments;
        Self {
            normal,
            u,
            v,
            u_size,
            v_size,
            depth,
            u_segments,
            v_segments,
        }
    }
}

impl SlabMesh {
    /// Build a flat slab of the given size centered on the origin.
    pub fn new(thickness: f32, height: f32, width: f32, segments: SlabSegments) -> Self {
        let sx = segments.x.max(1);
        let sy = segments.y.max(1);
        let sz = segments.z.max(1);

        // Page faces (±X), top and bottom edges (±Y), free edge and spine (±Z)
        let faces = [
            FaceSpec::new(Vec3::X, Vec3::NEG_Z, Vec3::Y, [width, height, thickness], [sz, sy]),
            FaceSpec::new(Vec3::NEG_X, Vec3::Z, Vec3::Y, [width, height, thickness], [sz, sy]),
            FaceSpec::new(Vec3::Y, Vec3::X, Vec3::NEG_Z, [thickness, width, height], [sx, sz]),
            FaceSpec::new(Vec3::NEG_Y, Vec3::X, Vec3::Z, [thickness, width, height], [sx, sz]),
            FaceSpec::new(Vec3::Z, Vec3::X, Vec3::Y, [thickness, height, width], [sx, sy]),
            FaceSpec::new(Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y, [thickness, height, width], [sx, sy]),
        ];

        let mut mesh = Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            bounds: SlabBounds {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            },
            dirty: true,
        };
        for face in &faces {
            mesh.push_face(face);
        }
        mesh.recompute_bounds();
        mesh
    }

    fn push_face(&mut self, face: &FaceSpec) {
        let base = self.positions.len() as u32;
        let columns = face.u_segments + 1;

        for j in 0..=face.v_segments {
            let fv = j as f32 / face.v_segments as f32;
            for i in 0..=face.u_segments {
                let fu = i as f32 / face.u_segments as f32;
                let position = face.normal * (face.depth / 2.0)
                    + face.u * ((fu - 0.5) * face.u_size)
                    + face.v * ((fv - 0.5) * face.v_size);
                self.positions.push(position);
                self.normals.push(face.normal);
                self.uvs.push(Vec2::new(fu, 1.0 - fv));
            }
        }

        for j in 0..face.v_segments {
            for i in 0..face.u_segments {
                let a = base + j * columns + i;
                let b = a + 1;
                let c = a + columns + 1;
                let d = a + columns;
                self.indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> SlabBounds {
        self.bounds
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Area-weighted vertex normals from the triangle list.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face_normal = (pb - pa).cross(pc - pa);
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }
        for (normal, sum) in self.normals.iter_mut().zip(accumulated) {
            // Collapsed triangles keep their previous normal
            if let Some(unit) = sum.try_normalize() {
                *normal = unit;
            }
        }
    }

    pub fn recompute_bounds(&mut self) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for &position in &self.positions {
            min = min.min(position);
            max = max.max(position);
        }
        if self.positions.is_empty() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        self.bounds = SlabBounds { min, max };
    }
}

impl VertexBuffer for SlabMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    fn set_position(&mut self, index: usize, position: Vec3) {
        self.positions[index] = position;
    }

    fn mark_dirty(&mut self) {
        self.recompute_normals();
        self.recompute_bounds();
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_index_counts() {
        let mesh = SlabMesh::new(2.0, 720.0, 445.0, SlabSegments::INNER);
        // ±X faces: 21×2, ±Y faces: 2×21, ±Z faces: 2×2
        assert_eq!(mesh.vertex_count(), 2 * 42 + 2 * 42 + 2 * 4);
        // ±X: 20 quads, ±Y: 20 quads, ±Z: 1 quad
        assert_eq!(mesh.indices().len(), (2 * 20 + 2 * 20 + 2) * 6);

        let cover = SlabMesh::new(10.0, 736.0, 453.0, SlabSegments::COVER);
        assert_eq!(cover.vertex_count(), 24);
    }

    #[test]
    fn test_flat_bounds() {
        let mesh = SlabMesh::new(2.0, 720.0, 445.0, SlabSegments::INNER);
        let bounds = mesh.bounds();
        assert!((bounds.min - Vec3::new(-1.0, -360.0, -222.5)).length() < 1e-3);
        assert!((bounds.max - Vec3::new(1.0, 360.0, 222.5)).length() < 1e-3);
        assert!(bounds.center().length() < 1e-3);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SlabMesh::new(2.0, 4.0, 6.0, SlabSegments::INNER);
        let positions = mesh.positions();
        for triangle in mesh.indices().chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| positions[i as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_recomputed_normals_match_flat_faces() {
        let mut mesh = SlabMesh::new(2.0, 4.0, 6.0, SlabSegments::INNER);
        let original = mesh.normals().to_vec();
        mesh.recompute_normals();
        for (a, b) in original.iter().zip(mesh.normals()) {
            assert!((*a - *b).length() < 1e-5);
        }
    }

    #[test]
    fn test_mark_dirty_updates_bounds() {
        let mut mesh = SlabMesh::new(2.0, 4.0, 6.0, SlabSegments::COVER);
        assert!(mesh.take_dirty());
        assert!(!mesh.is_dirty());

        mesh.set_position(0, Vec3::new(50.0, 0.0, 0.0));
        mesh.mark_dirty();
        assert!(mesh.is_dirty());
        assert_eq!(mesh.bounds().max.x, 50.0);
    }
}
