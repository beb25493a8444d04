//! Book-level controller.
//!
//! Owns the leaves and their meshes, the two book scalars and the gesture
//! session, and advances all of them from one shared tick so the scalars,
//! the lag and the deformation always see the same `dt`.

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;
use glam::Vec3;
use tracing::{debug, trace};

use crate::damped::DampedScalar;
use crate::deformer::PageDeformer;
use crate::error::TurningError;
use crate::gesture::{DragSample, GestureSession, GestureTarget};
use crate::layout::{apply_stack_elevation, render_order, spine_positions, spine_width};
use crate::page::{Page, PageGeometry};
use crate::slab::SlabMesh;
use crate::types::{LagTuning, LayoutMode, PageKind, ScalarEvent, TurningConfig};

/// Static description of a book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookSpec {
    /// Number of inner leaves between the covers
    pub inner_pages: usize,
    pub page: PageGeometry,
    /// Cover geometry, `None` for a book without covers
    pub cover: Option<PageGeometry>,
    pub layout: LayoutMode,
}

impl BookSpec {
    fn leaf_count(&self) -> usize {
        self.inner_pages + if self.cover.is_some() { 2 } else { 0 }
    }
}

/// Result of one [`BookController::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Leaves whose mesh was rewritten this tick
    pub deformed: Vec<usize>,
    /// The progress scalar came to rest
    pub progress_settled: bool,
    /// The side-shift scalar came to rest
    pub shift_settled: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct BookController {
    pages: Vec<Page>,
    meshes: Vec<SlabMesh>,
    /// Book-wide progress, one unit per turned leaf
    progress: DampedScalar,
    /// Viewpoint shift between the left (0) and right (1) page of a spread
    side_shift: DampedScalar,
    session: GestureSession,
    deformer: PageDeformer,
    lag: LagTuning,
    spine_width: f32,
    /// Every mesh has been deformed at least once
    primed: bool,
}

impl BookController {
    pub fn new(spec: BookSpec, config: TurningConfig) -> Result<Self, TurningError> {
        let count = spec.leaf_count();
        if count == 0 {
            return Err(TurningError::TooFewLeaves { min: 1, count });
        }

        let mut pages = Vec::with_capacity(count);
        let mut meshes = Vec::with_capacity(count);
        let mut push = |kind: PageKind, geometry: PageGeometry| -> Result<(), TurningError> {
            let (page, mesh) = Page::with_slab(kind, geometry)?;
            pages.push(page);
            meshes.push(mesh);
            Ok(())
        };

        if let Some(cover) = spec.cover {
            push(PageKind::Cover { front: true }, cover)?;
        }
        for _ in 0..spec.inner_pages {
            push(PageKind::Inner, spec.page)?;
        }
        if let Some(cover) = spec.cover {
            push(PageKind::Cover { front: false }, cover)?;
        }

        apply_stack_elevation(&mut pages);
        let spine_width = spine_width(&pages);

        let gesture = config.gesture;
        // Unbounded at rest; a turn bounds it to one leaf
        let progress = DampedScalar::new(0.0)
            .with_gravity(gesture.turn_gravity)
            .with_dampen_distance(gesture.dampen_distance)
            .with_tuning(config.damped);
        let side_shift = DampedScalar::new(0.0)
            .with_bounds(0.0, 1.0)
            .with_gravity(gesture.shift_gravity)
            .with_tuning(config.damped);

        debug!(leaves = count, spine_width, layout = ?spec.layout, "Book built");

        Ok(Self {
            pages,
            meshes,
            progress,
            side_shift,
            session: GestureSession::new(gesture, spec.layout, count),
            deformer: PageDeformer::new(config.curve),
            lag: config.lag,
            spine_width,
            primed: false,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn mesh(&self, index: usize) -> Option<&SlabMesh> {
        self.meshes.get(index)
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut SlabMesh> {
        self.meshes.get_mut(index)
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn side_shift(&self) -> f32 {
        self.side_shift.value()
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn deformer(&self) -> &PageDeformer {
        &self.deformer
    }

    pub fn spine_width(&self) -> f32 {
        self.spine_width
    }

    /// Jump to `progress` without animation, e.g. to open the book at a page.
    /// Ignored while a gesture is in flight.
    pub fn set_progress(&mut self, progress: f32) {
        if self.session.active().is_some() {
            return;
        }
        let leaves = self.pages.len() as f32;
        self.progress.set_value(progress.clamp(0.0, leaves));
    }

    pub fn swipe_start(&mut self, sample: DragSample) {
        self.session.start(sample);
    }

    pub fn swipe_move(&mut self, sample: DragSample) {
        self.session.drag(sample, &mut self.progress, &mut self.side_shift);
    }

    pub fn swipe_end(&mut self) {
        self.session.end(&mut self.progress, &mut self.side_shift);
    }

    /// Turn progress of leaf `index` for a book progress.
    ///
    /// Leaves not yet reached rest on the right (`1`), turned leaves on the
    /// left (`-1`).
    pub fn leaf_turn_progress(progress: f32, index: usize) -> f32 {
        1.0 - 2.0 * (progress - index as f32).clamp(0.0, 1.0)
    }

    /// Hinge positions of every leaf for the current progress.
    pub fn spine_positions(&self) -> Vec<Vec3> {
        spine_positions(&self.pages, self.spine_width, self.progress.value())
    }

    /// Draw order hint of leaf `index`.
    pub fn render_order(&self, index: usize) -> f32 {
        render_order(self.progress.value(), self.pages.len(), index)
    }

    /// Advance the whole book by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        if !(dt > 0.0) || !dt.is_finite() {
            return report;
        }

        self.progress.update(dt);
        self.side_shift.update(dt);

        for event in self.progress.drain_events() {
            if event == ScalarEvent::Settled {
                report.progress_settled = true;
                self.session.on_settled(GestureTarget::Progress, &mut self.progress);
            }
        }
        for event in self.side_shift.drain_events() {
            if event == ScalarEvent::Settled {
                report.shift_settled = true;
                self.session.on_settled(GestureTarget::SideShift, &mut self.progress);
            }
        }

        let progress = self.progress.value();
        let grabbed = self.session.grabbed_page_index();

        for (index, (page, mesh)) in self.pages.iter_mut().zip(&mut self.meshes).enumerate() {
            let before = (page.turn_progress(), page.turn_progress_lag());
            page.set_turn_progress(Self::leaf_turn_progress(progress, index));
            let speed = if grabbed == Some(index) {
                self.lag.grabbed_speed
            } else {
                self.lag.settle_speed
            };
            page.update(dt, speed);

            // A page that just came to rest still needs its final shape written
            let changed = before != (page.turn_progress(), page.turn_progress_lag());
            if changed || page.needs_update() || !self.primed {
                self.deformer.update(page, mesh);
                report.deformed.push(index);
            }
        }
        self.primed = true;

        trace!(
            progress,
            side_shift = self.side_shift.value(),
            deformed = report.deformed.len(),
            "Book ticked"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slab::VertexBuffer;

    const DT: f32 = 1.0 / 60.0;

    fn spec(inner_pages: usize) -> BookSpec {
        BookSpec {
            inner_pages,
            page: PageGeometry {
                width: 445.0,
                height: 720.0,
                thickness: 2.0,
                root_thickness: 4.0,
            },
            cover: Some(PageGeometry {
                width: 453.0,
                height: 736.0,
                thickness: 10.0,
                root_thickness: 10.0,
            }),
            layout: LayoutMode::Horizontal,
        }
    }

    fn drag(book: &mut BookController, pixels: f32) {
        book.swipe_start(DragSample::at(0.0, 0.0));
        book.swipe_move(DragSample {
            x: pixels,
            y: 0.0,
            prev_x: 0.0,
            prev_y: 0.0,
        });
        book.tick(DT);
        book.swipe_end();
    }

    #[test]
    fn test_empty_book_rejected() {
        let empty = BookSpec {
            inner_pages: 0,
            cover: None,
            ..spec(0)
        };
        assert_eq!(
            BookController::new(empty, TurningConfig::default()).unwrap_err(),
            TurningError::TooFewLeaves { min: 1, count: 0 }
        );
    }

    #[test]
    fn test_leaf_turn_progress() {
        assert_eq!(BookController::leaf_turn_progress(0.0, 0), 1.0);
        assert_eq!(BookController::leaf_turn_progress(0.5, 0), 0.0);
        assert_eq!(BookController::leaf_turn_progress(1.0, 0), -1.0);
        assert_eq!(BookController::leaf_turn_progress(1.25, 1), 0.5);
        assert_eq!(BookController::leaf_turn_progress(1.25, 3), 1.0);
    }

    #[test]
    fn test_first_tick_deforms_everything_then_rests() {
        let mut book = BookController::new(spec(8), TurningConfig::default()).unwrap();
        assert_eq!(book.page_count(), 10);

        let first = book.tick(DT);
        assert_eq!(first.deformed.len(), 10);
        let second = book.tick(DT);
        assert!(second.deformed.is_empty());
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let mut book = BookController::new(spec(2), TurningConfig::default()).unwrap();
        assert_eq!(book.tick(0.0), TickReport::default());
        assert_eq!(book.tick(f32::NAN), TickReport::default());
    }

    #[test]
    fn test_turn_runs_to_next_page() {
        let mut book = BookController::new(spec(8), TurningConfig::default()).unwrap();
        book.tick(DT);

        drag(&mut book, -300.0);
        assert_eq!(book.session().grabbed_page_index(), Some(0));

        let mut settled = false;
        for _ in 0..600 {
            let report = book.tick(DT);
            settled |= report.progress_settled;
            if settled && report.deformed.is_empty() {
                break;
            }
        }
        assert!(settled);
        assert_eq!(book.progress(), 1.0);
        assert_eq!(book.session().active(), None);
        assert_eq!(book.page(0).unwrap().turn_progress(), -1.0);
        assert_eq!(book.page(1).unwrap().turn_progress(), 1.0);

        // The turned cover now lies on the left
        let mesh = book.mesh(0).unwrap();
        let tip = (0..mesh.vertex_count())
            .map(|i| mesh.position(i).x)
            .fold(f32::INFINITY, f32::min);
        assert!(tip < -400.0);
    }

    #[test]
    fn test_short_drag_falls_back() {
        let mut book = BookController::new(spec(8), TurningConfig::default()).unwrap();
        book.set_progress(3.0);
        book.tick(DT);

        // Drag a little, then hold still so no inertia is left at release
        book.swipe_start(DragSample::at(0.0, 0.0));
        book.swipe_move(DragSample {
            x: -50.0,
            y: 0.0,
            prev_x: 0.0,
            prev_y: 0.0,
        });
        book.tick(DT);
        book.tick(DT);
        book.swipe_end();
        assert_eq!(book.session().grabbed_page_index(), Some(3));
        for _ in 0..600 {
            book.tick(DT);
        }
        assert_eq!(book.progress(), 3.0);
    }

    #[test]
    fn test_grabbed_page_lags_behind() {
        let mut book = BookController::new(spec(8), TurningConfig::default()).unwrap();
        book.set_progress(2.0);
        book.tick(DT);

        book.swipe_start(DragSample::at(0.0, 0.0));
        book.swipe_move(DragSample {
            x: -250.0,
            y: 0.0,
            prev_x: 0.0,
            prev_y: 0.0,
        });
        book.tick(DT);

        let page = book.page(2).unwrap();
        assert_eq!(page.turn_progress(), 0.0);
        assert!(page.turn_progress_lag() > 0.5);
    }

    #[test]
    fn test_closed_book_stacks_under_front_cover() {
        let mut book = BookController::new(spec(8), TurningConfig::default()).unwrap();
        book.tick(DT);
        assert_eq!(book.progress(), 0.0);

        let spine = book.spine_positions();
        // World Z range of a leaf away from the spine, where pages fan out
        let z_range = |index: usize| {
            let mesh = book.mesh(index).unwrap();
            mesh.positions()
                .iter()
                .map(|p| *p + spine[index])
                .filter(|p| p.x > 100.0)
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p.z), hi.max(p.z))
                })
        };

        let (front_cover_low, _) = z_range(0);
        let (_, back_cover_high) = z_range(9);
        let mut previous_low = f32::INFINITY;
        for index in 1..9 {
            let (low, high) = z_range(index);
            assert!(high < front_cover_low, "leaf {index} reaches {high}");
            assert!(low >= back_cover_high - 1e-3, "leaf {index} dips to {low}");
            // Earlier leaves lie higher up the stack
            assert!(low < previous_low);
            previous_low = low;
        }
    }

    #[test]
    fn test_spine_and_render_order() {
        let book = BookController::new(spec(4), TurningConfig::default()).unwrap();
        let spine = book.spine_positions();
        assert_eq!(spine.len(), 6);
        assert!((book.spine_width() - 26.0).abs() < 1e-4);
        assert!(book.render_order(0) > book.render_order(5));
    }
}
