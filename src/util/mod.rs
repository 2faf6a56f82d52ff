//! Shared utilities for the engine and viewer.

/// Frame time measurement and smoothed FPS.
pub mod frame_timing;
