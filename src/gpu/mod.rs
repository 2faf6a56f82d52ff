//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render-target textures,
//! fullscreen pipeline boilerplate and shader composition.

/// Shared wgpu boilerplate for fullscreen filter pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Framework-agnostic render-target texture abstraction.
pub mod texture;
