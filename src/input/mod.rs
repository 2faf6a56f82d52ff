//! Input handling: platform-agnostic events and the per-frame snapshot the
//! picking system consumes.

/// Platform-agnostic input events.
pub mod event;
/// Button/cursor tracking and snapshot emission.
pub mod state;

pub use event::{InputEvent, MouseButton};
pub use state::{InputSnapshot, InputTracker};
