//! A single leaf of the book.
//!
//! A page owns its turn state and the normalized coordinates of its mesh
//! vertices. The coordinates are captured once from the flat slab and keep
//! their index mapping for the page's lifetime; the deformer re-derives
//! every vertex position from them each frame.

use glam::Vec3;

use crate::curve_model::CurveState;
use crate::error::TurningError;
use crate::math::approach;
use crate::slab::{SlabMesh, SlabSegments, VertexBuffer};
use crate::types::{CurveTuning, PageKind};

/// Static page dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Spine to free edge
    pub width: f32,
    pub height: f32,
    /// Thickness at the free edge
    pub thickness: f32,
    /// Thickness at the spine
    pub root_thickness: f32,
}

impl PageGeometry {
    fn validate(&self) -> Result<(), TurningError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("thickness", self.thickness),
            ("root thickness", self.root_thickness),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(TurningError::InvalidDimension { name, value });
            }
        }
        Ok(())
    }

    /// Thickness at normalized distance `rz` from the spine.
    pub fn thickness_at(&self, rz: f32) -> f32 {
        crate::math::lerp(self.root_thickness, self.thickness, rz)
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    kind: PageKind,
    geometry: PageGeometry,
    elevation_left: f32,
    elevation_right: f32,
    turn_progress: f32,
    turn_progress_lag: f32,
    /// When false the lag is pinned to the live progress
    pub bending_enabled: bool,
    vertex_rel_coords: Vec<Vec3>,
}

impl Page {
    /// Capture the relative vertex coordinates of `mesh`, a flat slab sized
    /// to `geometry` (thickness on X, height on Y, width on Z).
    ///
    /// The page starts closed on the right stack.
    pub fn new(
        kind: PageKind,
        geometry: PageGeometry,
        mesh: &impl VertexBuffer,
    ) -> Result<Self, TurningError> {
        geometry.validate()?;
        if mesh.vertex_count() == 0 {
            return Err(TurningError::EmptyMesh);
        }

        let vertex_rel_coords = (0..mesh.vertex_count())
            .map(|i| {
                let p = mesh.position(i);
                Vec3::new(
                    p.x / geometry.thickness + 0.5,
                    p.y / geometry.height + 0.5,
                    p.z / geometry.width + 0.5,
                )
            })
            .collect();

        Ok(Self {
            kind,
            geometry,
            elevation_left: 0.0,
            elevation_right: 0.0,
            turn_progress: 1.0,
            turn_progress_lag: 1.0,
            bending_enabled: true,
            vertex_rel_coords,
        })
    }

    /// Build a page together with its flat slab mesh.
    pub fn with_slab(
        kind: PageKind,
        geometry: PageGeometry,
    ) -> Result<(Self, SlabMesh), TurningError> {
        let segments = if kind.is_cover() {
            SlabSegments::COVER
        } else {
            SlabSegments::INNER
        };
        geometry.validate()?;
        let mesh = SlabMesh::new(geometry.thickness, geometry.height, geometry.width, segments);
        let page = Self::new(kind, geometry, &mesh)?;
        Ok((page, mesh))
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn turn_progress(&self) -> f32 {
        self.turn_progress
    }

    pub fn turn_progress_lag(&self) -> f32 {
        self.turn_progress_lag
    }

    pub fn elevation_left(&self) -> f32 {
        self.elevation_left
    }

    pub fn elevation_right(&self) -> f32 {
        self.elevation_right
    }

    pub fn vertex_rel_coords(&self) -> &[Vec3] {
        &self.vertex_rel_coords
    }

    fn lag_is_pinned(&self) -> bool {
        self.kind.is_cover() || !self.bending_enabled
    }

    /// Set the live turn progress, clamped to `[-1, 1]`.
    pub fn set_turn_progress(&mut self, turn_progress: f32) {
        let turn_progress = if turn_progress.is_nan() {
            self.turn_progress
        } else {
            turn_progress.clamp(-1.0, 1.0)
        };
        self.turn_progress = turn_progress;
        if self.lag_is_pinned() {
            self.turn_progress_lag = turn_progress;
        }
    }

    /// Stack elevations on either side. Covers hinge at the spine and ignore them.
    pub fn set_elevation(&mut self, elevation_left: f32, elevation_right: f32) {
        if self.kind.is_cover() {
            return;
        }
        self.elevation_left = elevation_left;
        self.elevation_right = elevation_right;
    }

    /// Elevation under the page at its current lean.
    pub fn elevation(&self, tuning: &CurveTuning) -> f32 {
        self.curve_state().elevation(tuning)
    }

    /// Let the lag catch up with the live progress at `speed`.
    pub fn update(&mut self, dt: f32, speed: f32) {
        if self.lag_is_pinned() {
            self.turn_progress_lag = self.turn_progress;
            return;
        }
        if dt > 0.0 && dt.is_finite() {
            self.turn_progress_lag =
                approach(self.turn_progress_lag, self.turn_progress, speed, dt).clamp(-1.0, 1.0);
        }
    }

    /// Whether the mesh must be re-deformed this frame.
    ///
    /// Only a page resting exactly at a terminal position with its lag caught
    /// up is visually static.
    pub fn needs_update(&self) -> bool {
        let terminal = [-1.0, 0.0, 1.0].contains(&self.turn_progress);
        !(terminal && self.turn_progress_lag == self.turn_progress)
    }

    pub fn curve_state(&self) -> CurveState {
        CurveState {
            kind: self.kind,
            turn_progress: self.turn_progress,
            turn_progress_lag: self.turn_progress_lag,
            elevation_left: self.elevation_left,
            elevation_right: self.elevation_right,
            width: self.geometry.width,
            root_thickness: self.geometry.root_thickness,
        }
    }
}
