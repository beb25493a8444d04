//! Curve-driven page deformation.
//!
//! Every vertex is placed on the page's profile curve at its normalized
//! spine distance, then pushed off the curve along the local normal by half
//! the tapered thickness, to the front or back face depending on which side
//! of the slab it came from. Height (`Y`) is never touched.

use std::f32::consts::FRAC_PI_2;

use glam::{Affine3A, Vec2, Vec3};
use tracing::warn;

use crate::curve::PageCurve;
use crate::curve_model::build_curve;
use crate::math::sign;
use crate::page::{Page, PageGeometry};
use crate::slab::VertexBuffer;
use crate::types::CurveTuning;

/// Which side of the leaf a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFace {
    /// Faces the viewer while the page rests on the right stack
    Front,
    /// Faces the viewer once the page is turned to the left
    Back,
}

impl PageFace {
    /// Relative thickness coordinate of the face.
    fn rel_x(self) -> f32 {
        match self {
            PageFace::Front => 0.0,
            PageFace::Back => 1.0,
        }
    }
}

/// Normalized sub-rectangle of a page face.
///
/// `u` runs from spine (0) to free edge (1), `v` from bottom (0) to top (1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl FaceRect {
    pub const FULL: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };
}

/// The page curve with its stretch factor, ready for sampling.
struct SampledCurve {
    curve: PageCurve,
    stretch: f32,
}

impl SampledCurve {
    fn new(page: &Page, tuning: &CurveTuning) -> Self {
        let curve = build_curve(&page.curve_state(), tuning);
        // A curve shorter than the page would squash the texture; never below 1
        let stretch = (curve.length() / page.geometry().width).max(1.0);
        Self { curve, stretch }
    }

    /// Curve-plane position of the point at relative thickness `rx` and
    /// relative spine distance `rz`.
    fn offset_point(&self, geometry: &PageGeometry, rx: f32, rz: f32) -> Vec2 {
        let u = rz / self.stretch;
        let position = self.curve.point_at(u);
        let tangent = self.curve.tangent_at(u);
        let angle = tangent.y.atan2(tangent.x) + FRAC_PI_2;

        let half_thickness = geometry.thickness_at(rz) / 2.0;
        let side = -sign(rx - 0.5);
        position + Vec2::new(angle.cos(), angle.sin()) * (half_thickness * side)
    }
}

/// Writes deformed vertex positions into a page mesh.
#[derive(Debug, Clone, Default)]
pub struct PageDeformer {
    pub tuning: CurveTuning,
}

impl PageDeformer {
    pub fn new(tuning: CurveTuning) -> Self {
        Self { tuning }
    }

    /// Rebuild the curve for the page's current state and reposition every
    /// vertex of `mesh` from the page's relative coordinates.
    ///
    /// Pure with respect to the page: calling it twice without a state change
    /// writes identical positions.
    pub fn update(&self, page: &Page, mesh: &mut impl VertexBuffer) {
        let rel_coords = page.vertex_rel_coords();
        if rel_coords.len() != mesh.vertex_count() {
            warn!(
                expected = rel_coords.len(),
                actual = mesh.vertex_count(),
                "Page mesh vertex count changed, deforming the shared prefix"
            );
        }

        let sampled = SampledCurve::new(page, &self.tuning);
        let geometry = page.geometry();

        for (i, rel) in rel_coords.iter().enumerate().take(mesh.vertex_count()) {
            let deformed = sampled.offset_point(geometry, rel.x, rel.z);
            let y = mesh.position(i).y;
            mesh.set_position(i, Vec3::new(deformed.x, y, deformed.y));
        }

        mesh.mark_dirty();
    }

    /// Page-local corners of a sub-rectangle of one face, in the same space
    /// the deformer writes vertices in.
    ///
    /// Order: (min u, min v), (max u, min v), (max u, max v), (min u, max v).
    pub fn face_corners(&self, page: &Page, face: PageFace, rect: FaceRect) -> [Vec3; 4] {
        let sampled = SampledCurve::new(page, &self.tuning);
        let geometry = page.geometry();
        let rx = face.rel_x();

        [
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.max.x, rect.min.y),
            Vec2::new(rect.max.x, rect.max.y),
            Vec2::new(rect.min.x, rect.max.y),
        ]
        .map(|uv| {
            let rz = uv.x.clamp(0.0, 1.0);
            let ry = uv.y.clamp(0.0, 1.0);
            let point = sampled.offset_point(geometry, rx, rz);
            Vec3::new(point.x, (ry - 0.5) * geometry.height, point.y)
        })
    }

    /// World-space corners of a face sub-rectangle for hit-testing and
    /// camera focus collaborators.
    pub fn world_face_corners(
        &self,
        page: &Page,
        face: PageFace,
        rect: FaceRect,
        page_to_world: &Affine3A,
    ) -> [Vec3; 4] {
        self.face_corners(page, face, rect)
            .map(|corner| page_to_world.transform_point3(corner))
    }

    /// Curve polyline in page-local space, for debug drawing.
    pub fn curve_polyline(&self, page: &Page, segments: usize) -> (Vec<Vec3>, Vec<Vec3>) {
        let curve = build_curve(&page.curve_state(), &self.tuning);
        let to_local = |p: Vec2| Vec3::new(p.x, 0.0, p.y);
        let line = curve.spaced_points(segments).into_iter().map(to_local).collect();
        let controls = curve.control_points().into_iter().map(to_local).collect();
        (line, controls)
    }
}
