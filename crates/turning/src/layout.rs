//! Stack layout of the leaves around the spine.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::page::Page;
use crate::types::PageKind;

/// Set each inner page's stack elevation from the thickness of the inner
/// pages on either side of it. Covers are skipped.
pub fn apply_stack_elevation(pages: &mut [Page]) {
    let thicknesses: Vec<f32> = pages
        .iter()
        .map(|page| {
            if page.kind().is_cover() {
                0.0
            } else {
                page.geometry().thickness
            }
        })
        .collect();
    let total: f32 = thicknesses.iter().sum();

    let mut before = 0.0;
    for (page, thickness) in pages.iter_mut().zip(&thicknesses) {
        let after = total - before - thickness;
        page.set_elevation(before, after.max(0.0));
        before += thickness;
    }
}

/// Width of the spine: every leaf's root thickness, minus half of the two
/// outermost leaves.
pub fn spine_width(pages: &[Page]) -> f32 {
    let mut width: f32 = pages.iter().map(|page| page.geometry().root_thickness).sum();
    if let Some(first) = pages.first() {
        width -= first.geometry().root_thickness / 2.0;
    }
    if let Some(last) = pages.last() {
        width -= last.geometry().root_thickness / 2.0;
    }
    width.max(0.0)
}

/// Hinge position of every leaf in book space (`X` right, `Y` up, `Z` toward
/// the viewer).
///
/// Covers swing around the spine as the book opens and closes, so a closed
/// cover rests on top of the stack. Inner leaves are spread along `X`
/// between the two outer hinges but stay on the back of the book: their
/// stack height comes from their elevation alone. Each inner hinge is lifted
/// by half its root thickness so the lowest leaf sits on `Z = 0`.
pub fn spine_positions(pages: &[Page], spine_width: f32, progress: f32) -> Vec<Vec3> {
    let page_count = pages.len();
    let front = progress.clamp(0.0, 1.0) * FRAC_PI_2;
    let first = Vec3::new(0.5 - front.sin(), 0.0, front.cos()) * spine_width;

    let back = (progress - page_count as f32 + 1.0).clamp(0.0, 1.0) * FRAC_PI_2;
    let last = Vec3::new(back.cos() - 0.5, 0.0, back.sin()) * spine_width;

    pages
        .iter()
        .enumerate()
        .map(|(index, page)| match page.kind() {
            PageKind::Cover { front: true } => first,
            PageKind::Cover { front: false } => last,
            PageKind::Inner => {
                let t = if page_count > 1 {
                    index as f32 / (page_count - 1) as f32
                } else {
                    0.5
                };
                let x = first.x + (last.x - first.x) * t;
                Vec3::new(x, 0.0, page.geometry().root_thickness / 2.0)
            }
        })
        .collect()
}

/// Draw order hint: leaves near the open spread draw last.
pub fn render_order(progress: f32, page_count: usize, index: usize) -> f32 {
    page_count as f32 - (progress - 0.5 - index as f32).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageGeometry;

    fn book(inner: usize) -> Vec<Page> {
        let inner_geometry = PageGeometry {
            width: 445.0,
            height: 720.0,
            thickness: 2.0,
            root_thickness: 4.0,
        };
        let cover_geometry = PageGeometry {
            width: 453.0,
            height: 736.0,
            thickness: 10.0,
            root_thickness: 10.0,
        };
        let cover = |front| Page::with_slab(PageKind::Cover { front }, cover_geometry).unwrap().0;
        let mut pages = vec![cover(true)];
        for _ in 0..inner {
            pages.push(Page::with_slab(PageKind::Inner, inner_geometry).unwrap().0);
        }
        pages.push(cover(false));
        pages
    }

    #[test]
    fn test_stack_elevation_accumulates_inner_thickness() {
        let mut pages = book(4);
        apply_stack_elevation(&mut pages);

        let elevations: Vec<(f32, f32)> = pages
            .iter()
            .map(|p| (p.elevation_left(), p.elevation_right()))
            .collect();
        assert_eq!(elevations[0], (0.0, 0.0));
        assert_eq!(elevations[1], (0.0, 6.0));
        assert_eq!(elevations[2], (2.0, 4.0));
        assert_eq!(elevations[4], (6.0, 0.0));
        assert_eq!(elevations[5], (0.0, 0.0));
    }

    #[test]
    fn test_spine_width() {
        let pages = book(4);
        // 10 + 4·4 + 10, minus half of each cover
        assert_eq!(spine_width(&pages), 26.0);
        assert_eq!(spine_width(&[]), 0.0);
    }

    #[test]
    fn test_covers_swing_around_spine() {
        let pages = book(4);
        let closed = spine_positions(&pages, 26.0, 0.0);
        assert_eq!(closed.len(), 6);
        assert!(closed[0].distance(Vec3::new(13.0, 0.0, 26.0)) < 1e-4);
        assert!(closed[5].distance(Vec3::new(13.0, 0.0, 0.0)) < 1e-4);

        let open = spine_positions(&pages, 26.0, 1.0);
        assert!(open[0].distance(Vec3::new(-13.0, 0.0, 0.0)) < 1e-4);

        let finished = spine_positions(&pages, 26.0, 6.0);
        assert!(finished[5].distance(Vec3::new(-13.0, 0.0, 26.0)) < 1e-4);
    }

    #[test]
    fn test_inner_hinges_stay_on_stack_base() {
        let pages = book(4);
        for progress in [0.0, 1.0, 2.5, 6.0] {
            let spine = spine_positions(&pages, 26.0, progress);
            for hinge in &spine[1..5] {
                // Half the inner root thickness, whatever the covers do
                assert!((hinge.z - 2.0).abs() < 1e-5, "progress={progress}");
            }
        }

        // Spread along X between the cover hinges once open
        let open = spine_positions(&pages, 26.0, 1.0);
        let expected = open[0].x + (open[5].x - open[0].x) * 0.2;
        assert!((open[1].x - expected).abs() < 1e-4);
        assert!(open[1].x < open[4].x);
    }

    #[test]
    fn test_book_without_covers_has_no_swing() {
        let inner_geometry = PageGeometry {
            width: 445.0,
            height: 720.0,
            thickness: 2.0,
            root_thickness: 4.0,
        };
        let pages: Vec<Page> = (0..3)
            .map(|_| Page::with_slab(PageKind::Inner, inner_geometry).unwrap().0)
            .collect();
        let spine = spine_positions(&pages, spine_width(&pages), 0.0);
        assert!(spine.iter().all(|hinge| (hinge.z - 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_render_order_peaks_at_turning_leaf() {
        let orders: Vec<f32> = (0..4).map(|i| render_order(1.5, 4, i)).collect();
        assert_eq!(orders[1], 4.0);
        assert!(orders[0] < orders[1] && orders[2] < orders[1]);
    }
}
