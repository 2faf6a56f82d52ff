use glam::Vec2;

use super::event::{InputEvent, MouseButton};

/// Everything the picking system needs to know about the mouse for one
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Left button held.
    pub left: bool,
    /// Right button held.
    pub right: bool,
    /// Cursor in normalized device coordinates, `[-1, 1]` with +y up.
    pub cursor_ndc: Vec2,
    /// Cursor in physical pixels, clamped to the viewport.
    pub cursor_px: (u32, u32),
    /// A button went down since the previous snapshot.
    pub drag_started: bool,
}

/// Accumulates window events between frames.
#[derive(Debug, Clone)]
pub struct InputTracker {
    viewport: (u32, u32),
    cursor: Vec2,
    left: bool,
    right: bool,
    drag_started: bool,
}

impl InputTracker {
    /// Tracker for a viewport of `width` x `height` physical pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width.max(1), height.max(1)),
            cursor: Vec2::ZERO,
            left: false,
            right: false,
            drag_started: false,
        }
    }

    /// Update the viewport size used for NDC conversion.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    /// Record one event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
            }
            InputEvent::MouseButton { button, pressed } => {
                let held = match button {
                    MouseButton::Left => &mut self.left,
                    MouseButton::Right => &mut self.right,
                    MouseButton::Middle => return,
                };
                if pressed && !*held {
                    self.drag_started = true;
                }
                *held = pressed;
            }
            InputEvent::CursorLeft => {
                self.left = false;
                self.right = false;
            }
        }
    }

    /// Snapshot the current state and clear the drag-start edge.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = self.peek();
        self.drag_started = false;
        snapshot
    }

    /// Current state without consuming the drag-start edge.
    #[must_use]
    pub fn peek(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
            cursor_ndc: self.cursor_ndc(),
            cursor_px: self.cursor_px(),
            drag_started: self.drag_started,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn cursor_ndc(&self) -> Vec2 {
        let (w, h) = self.viewport;
        Vec2::new(
            self.cursor.x / w as f32 * 2.0 - 1.0,
            1.0 - self.cursor.y / h as f32 * 2.0,
        )
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn cursor_px(&self) -> (u32, u32) {
        let (w, h) = self.viewport;
        let x = self.cursor.x.clamp(0.0, (w - 1) as f32);
        let y = self.cursor.y.clamp(0.0, (h - 1) as f32);
        (x as u32, y as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: true,
        }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: false,
        }
    }

    #[test]
    fn ndc_corners() {
        let mut tracker = InputTracker::new(800, 600);
        tracker.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        assert_eq!(tracker.peek().cursor_ndc, Vec2::new(-1.0, 1.0));
        tracker.handle_event(InputEvent::CursorMoved { x: 800.0, y: 600.0 });
        assert_eq!(tracker.peek().cursor_ndc, Vec2::new(1.0, -1.0));
        tracker.handle_event(InputEvent::CursorMoved { x: 400.0, y: 300.0 });
        assert_eq!(tracker.peek().cursor_ndc, Vec2::ZERO);
    }

    #[test]
    fn pixel_position_is_clamped() {
        let mut tracker = InputTracker::new(100, 50);
        tracker.handle_event(InputEvent::CursorMoved { x: 250.0, y: -4.0 });
        assert_eq!(tracker.peek().cursor_px, (99, 0));
    }

    #[test]
    fn drag_edge_fires_once() {
        let mut tracker = InputTracker::new(100, 100);
        tracker.handle_event(press(MouseButton::Left));
        let first = tracker.snapshot();
        assert!(first.left && first.drag_started);
        let second = tracker.snapshot();
        assert!(second.left && !second.drag_started);
    }

    #[test]
    fn repeated_press_does_not_refire() {
        let mut tracker = InputTracker::new(100, 100);
        tracker.handle_event(press(MouseButton::Right));
        let _ = tracker.snapshot();
        tracker.handle_event(press(MouseButton::Right));
        assert!(!tracker.snapshot().drag_started);
    }

    #[test]
    fn release_and_middle_button() {
        let mut tracker = InputTracker::new(100, 100);
        tracker.handle_event(press(MouseButton::Middle));
        assert!(!tracker.peek().drag_started);
        tracker.handle_event(press(MouseButton::Left));
        tracker.handle_event(release(MouseButton::Left));
        let snap = tracker.snapshot();
        assert!(!snap.left);
        assert!(snap.drag_started);
    }

    #[test]
    fn cursor_left_releases_buttons() {
        let mut tracker = InputTracker::new(100, 100);
        tracker.handle_event(press(MouseButton::Left));
        tracker.handle_event(press(MouseButton::Right));
        tracker.handle_event(InputEvent::CursorLeft);
        let snap = tracker.peek();
        assert!(!snap.left && !snap.right);
    }
}
