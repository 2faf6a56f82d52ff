//! Cursor picking and object manipulation.
//!
//! Each frame the cursor is unprojected into a world-space ray, tested
//! against the selected object's bounding sphere, and fed through a
//! translate/rotate drag state machine. Which object is selected comes from
//! a [`SelectionResolver`], typically the GPU index readback in
//! [`crate::renderer::IndexPicker`].

mod drag;
mod ray;
mod selection;
mod system;

pub use drag::{
    DragDelta, DragMode, DragState, PickHit, DEFAULT_ROTATION_DEADZONE,
};
pub use ray::{PickRay, RaySegment};
pub use selection::{FixedSelection, PickColor, SelectionResolver};
pub use system::PickingSystem;
