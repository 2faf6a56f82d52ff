/// Platform-agnostic input events.
///
/// Hosts translate their window events into these and feed them to an
/// [`InputTracker`](super::InputTracker).
///
/// # Example
///
/// ```ignore
/// tracker.handle_event(InputEvent::CursorMoved { x: 100.0, y: 200.0 });
/// let snapshot = tracker.snapshot();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Cursor left the window. Buttons are treated as released.
    CursorLeft,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button. Translates the selection.
    Left,
    /// Secondary (right) mouse button. Rotates the selection.
    Right,
    /// Middle mouse button (wheel click). Ignored by picking.
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            // Middle, back, forward and extra buttons take no part in
            // picking.
            _ => Self::Middle,
        }
    }
}
