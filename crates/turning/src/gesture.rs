//! Drag gesture interpretation.
//!
//! A [`GestureSession`] turns a stream of pointer samples into nudges of the
//! book's two damped scalars: the book-wide turn progress and the side shift
//! of the viewpoint. It never integrates anything itself; the owner ticks the
//! scalars and forwards their `Settled` events back through
//! [`GestureSession::on_settled`].

use tracing::debug;

use crate::damped::DampedScalar;
use crate::types::{GestureTuning, LayoutMode};

/// One pointer position together with the position at the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSample {
    pub x: f32,
    pub y: f32,
    pub prev_x: f32,
    pub prev_y: f32,
}

impl DragSample {
    /// A sample with no motion, as produced on pointer down.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
        }
    }

    pub fn delta_x(&self) -> f32 {
        self.x - self.prev_x
    }

    pub fn delta_y(&self) -> f32 {
        self.y - self.prev_y
    }
}

/// What the current (or still settling) gesture drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveGesture {
    /// Turning the leaf at `grabbed_page_index`, progress bounded to
    /// `[grabbed_page_index, grabbed_page_index + 1]`
    Turn { grabbed_page_index: usize },
    /// Shifting the viewpoint between the two pages of a spread
    Shift,
}

/// Which of the book scalars an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    Progress,
    SideShift,
}

#[derive(Debug, Clone)]
pub struct GestureSession {
    tuning: GestureTuning,
    layout: LayoutMode,
    page_count: usize,
    /// Pointer is down
    dragging: bool,
    /// The current drag already took over a gesture
    claimed: bool,
    active: Option<ActiveGesture>,
}

impl GestureSession {
    pub fn new(tuning: GestureTuning, layout: LayoutMode, page_count: usize) -> Self {
        Self {
            tuning,
            layout,
            page_count,
            dragging: false,
            claimed: false,
            active: None,
        }
    }

    pub fn active(&self) -> Option<ActiveGesture> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Page currently being turned, if any.
    pub fn grabbed_page_index(&self) -> Option<usize> {
        match self.active {
            Some(ActiveGesture::Turn { grabbed_page_index }) => Some(grabbed_page_index),
            _ => None,
        }
    }

    /// Convert a horizontal pixel delta into book progress.
    ///
    /// Dragging right moves back through the book, hence the negative scale.
    pub fn delta_to_progress(&self, pixel_delta: f32) -> f32 {
        pixel_delta / -self.tuning.drag_scale
    }

    /// Pointer down. The gesture kind is only decided on the first move.
    pub fn start(&mut self, _sample: DragSample) {
        self.dragging = true;
        self.claimed = false;
    }

    /// Pointer moved while down.
    pub fn drag(
        &mut self,
        sample: DragSample,
        progress: &mut DampedScalar,
        side_shift: &mut DampedScalar,
    ) {
        if !self.dragging {
            return;
        }
        let delta = self.delta_to_progress(sample.delta_x());
        if delta == 0.0 {
            return;
        }

        if !self.claimed {
            self.claim(delta, progress, side_shift);
        }

        match self.active {
            Some(ActiveGesture::Turn { .. }) => progress.nudge(delta),
            Some(ActiveGesture::Shift) => side_shift.nudge(delta * self.tuning.shift_scale),
            None => {}
        }
    }

    /// Pointer up. The driven scalar is released and left to settle.
    pub fn end(&mut self, progress: &mut DampedScalar, side_shift: &mut DampedScalar) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.claimed = false;

        match self.active {
            Some(ActiveGesture::Turn { grabbed_page_index }) => {
                debug!(grabbed_page_index, progress = progress.value(), "Turn released");
                progress.release();
            }
            Some(ActiveGesture::Shift) => {
                debug!(side_shift = side_shift.value(), "Shift released");
                side_shift.release();
            }
            None => {}
        }
    }

    /// A book scalar came to rest. Drops the gesture it belonged to unless a
    /// drag is still holding it.
    pub fn on_settled(&mut self, target: GestureTarget, progress: &mut DampedScalar) {
        if self.dragging && self.claimed {
            return;
        }
        match (self.active, target) {
            (Some(ActiveGesture::Turn { grabbed_page_index }), GestureTarget::Progress) => {
                progress.unbound();
                self.active = None;
                debug!(grabbed_page_index, progress = progress.value(), "Turn settled");
            }
            (Some(ActiveGesture::Shift), GestureTarget::SideShift) => {
                self.active = None;
                debug!("Shift settled");
            }
            _ => {}
        }
    }

    fn claim(&mut self, delta: f32, progress: &mut DampedScalar, side_shift: &mut DampedScalar) {
        self.claimed = true;

        // A gesture still settling from the previous drag is taken over as is
        match self.active {
            Some(ActiveGesture::Turn { grabbed_page_index }) => {
                progress.lock();
                debug!(grabbed_page_index, "Turn interrupted, re-locked");
                return;
            }
            Some(ActiveGesture::Shift) => {
                side_shift.lock();
                debug!("Shift interrupted, re-locked");
                return;
            }
            None => {}
        }

        if self.wants_shift(delta, side_shift) {
            side_shift.lock();
            self.active = Some(ActiveGesture::Shift);
            debug!(side_shift = side_shift.value(), "Shift started");
        } else {
            let grabbed_page_index = self.turn_lower_bound(progress.value(), delta);
            let lower = grabbed_page_index as f32;
            progress.lock();
            progress.set_bounds(lower, lower + 1.0);
            self.active = Some(ActiveGesture::Turn { grabbed_page_index });
            debug!(grabbed_page_index, progress = progress.value(), "Turn started");
        }
    }

    /// Vertical layout only: keep shifting mid-shift, or leave a side extreme
    /// toward the other page.
    fn wants_shift(&self, delta: f32, side_shift: &DampedScalar) -> bool {
        if self.layout != LayoutMode::Vertical {
            return false;
        }
        let shift = side_shift.value();
        let (min, max) = (side_shift.min_value(), side_shift.max_value());
        if shift > min && shift < max {
            return true;
        }
        (shift <= min && delta > 0.0) || (shift >= max && delta < 0.0)
    }

    /// Lower bound of the turn a drag from `value` in direction `delta` grabs.
    fn turn_lower_bound(&self, value: f32, delta: f32) -> usize {
        let lower = if delta > 0.0 {
            value.floor()
        } else {
            value.ceil() - 1.0
        };
        let last = self.page_count.saturating_sub(1) as f32;
        lower.clamp(0.0, last) as usize
    }
}
