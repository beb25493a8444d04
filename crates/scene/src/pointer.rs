//! Pointer → drag gesture bridge
//!
//! One pointer drives the book at a time: the mouse or the first touch that
//! lands. Other touches are ignored until the tracked pointer lifts.

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use turning::{BookController, DragSample};

/// Identity of a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// Tracks the single pointer currently dragging the book
#[derive(Resource, Debug, Default)]
pub struct PointerTracker {
    tracked: Option<(PointerId, Vec2)>,
}

impl PointerTracker {
    pub fn tracked(&self) -> Option<PointerId> {
        self.tracked.map(|(id, _)| id)
    }

    /// Start tracking `id` unless another pointer is already dragging.
    pub fn press(&mut self, id: PointerId, position: Vec2) -> Option<DragSample> {
        if self.tracked.is_some() {
            return None;
        }
        self.tracked = Some((id, position));
        Some(DragSample::at(position.x, position.y))
    }

    /// Sample for a move of the tracked pointer. `None` for other pointers
    /// or when it did not actually move.
    pub fn moved(&mut self, id: PointerId, position: Vec2) -> Option<DragSample> {
        let (tracked, last) = self.tracked.as_mut()?;
        if *tracked != id || *last == position {
            return None;
        }
        let sample = DragSample {
            x: position.x,
            y: position.y,
            prev_x: last.x,
            prev_y: last.y,
        };
        *last = position;
        Some(sample)
    }

    /// Stop tracking `id`. Returns whether it was the tracked pointer.
    pub fn release(&mut self, id: PointerId) -> bool {
        match self.tracked {
            Some((tracked, _)) if tracked == id => {
                self.tracked = None;
                true
            }
            _ => false,
        }
    }
}

/// Plugin feeding mouse and touch input into the book's gesture session
pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerTracker>();
    }
}

/// Forward this frame's pointer input to the book
pub(crate) fn handle_pointer(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut cursor_events: MessageReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    touches: Res<Touches>,
    mut tracker: ResMut<PointerTracker>,
    book: Option<ResMut<BookController>>,
) {
    let Some(mut book) = book else {
        cursor_events.clear();
        return;
    };

    // Only the latest cursor position of the frame matters
    let cursor = cursor_events.read().last().map(|event| event.position);

    if mouse_button.just_pressed(MouseButton::Left) {
        let position = cursor.or_else(|| windows.single().ok()?.cursor_position());
        if let Some(sample) = position.and_then(|p| tracker.press(PointerId::Mouse, p)) {
            book.swipe_start(sample);
        }
    }
    if let Some(sample) = cursor.and_then(|p| tracker.moved(PointerId::Mouse, p)) {
        book.swipe_move(sample);
    }
    if mouse_button.just_released(MouseButton::Left) && tracker.release(PointerId::Mouse) {
        book.swipe_end();
    }

    for touch in touches.iter_just_pressed() {
        if let Some(sample) = tracker.press(PointerId::Touch(touch.id()), touch.position()) {
            book.swipe_start(sample);
        }
    }
    for touch in touches.iter() {
        if let Some(sample) = tracker.moved(PointerId::Touch(touch.id()), touch.position()) {
            book.swipe_move(sample);
        }
    }
    for touch in touches.iter_just_released().chain(touches.iter_just_canceled()) {
        if tracker.release(PointerId::Touch(touch.id())) {
            book.swipe_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pointer_wins() {
        let mut tracker = PointerTracker::default();
        let sample = tracker.press(PointerId::Touch(3), Vec2::new(10.0, 20.0)).unwrap();
        assert_eq!(sample.delta_x(), 0.0);
        assert!(tracker.press(PointerId::Mouse, Vec2::ZERO).is_none());
        assert!(tracker.press(PointerId::Touch(4), Vec2::ZERO).is_none());
        assert_eq!(tracker.tracked(), Some(PointerId::Touch(3)));
    }

    #[test]
    fn test_moves_chain_previous_position() {
        let mut tracker = PointerTracker::default();
        tracker.press(PointerId::Mouse, Vec2::new(100.0, 50.0));

        let first = tracker.moved(PointerId::Mouse, Vec2::new(80.0, 55.0)).unwrap();
        assert_eq!(first.delta_x(), -20.0);
        assert_eq!(first.delta_y(), 5.0);

        let second = tracker.moved(PointerId::Mouse, Vec2::new(30.0, 55.0)).unwrap();
        assert_eq!((second.prev_x, second.x), (80.0, 30.0));

        // No motion, no sample
        assert!(tracker.moved(PointerId::Mouse, Vec2::new(30.0, 55.0)).is_none());
    }

    #[test]
    fn test_other_pointers_are_ignored() {
        let mut tracker = PointerTracker::default();
        tracker.press(PointerId::Touch(1), Vec2::ZERO);
        assert!(tracker.moved(PointerId::Touch(2), Vec2::ONE).is_none());
        assert!(tracker.moved(PointerId::Mouse, Vec2::ONE).is_none());
        assert!(!tracker.release(PointerId::Touch(2)));
        assert!(!tracker.release(PointerId::Mouse));

        assert!(tracker.release(PointerId::Touch(1)));
        assert_eq!(tracker.tracked(), None);
        assert!(tracker.press(PointerId::Mouse, Vec2::ZERO).is_some());
    }

    #[test]
    fn test_untracked_move_is_ignored() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.moved(PointerId::Mouse, Vec2::ONE).is_none());
        assert!(!tracker.release(PointerId::Mouse));
    }
}
