//! Perspective camera and the per-frame camera snapshot handed to picking
//! and rendering.
//!
//! Camera movement is left to the host; the engine only reads a
//! [`CameraState`] once per frame.

/// Core camera struct and its matrix snapshot.
pub mod core;

pub use self::core::{Camera, CameraState};
