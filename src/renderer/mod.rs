//! Rendering subsystems: the scene pass (drawers, uniforms, index target),
//! the pick readback, and GPU execution of the bloom filter graph.

mod drawer;
mod filter_graph;
mod filter_pipelines;
mod frame_targets;
mod impostor;
mod index_picker;
mod index_sample;
pub mod pipeline_util;
mod uniforms;

pub use drawer::{
    DrawBindings, DrawerSetup, SceneBindings, SceneDrawer, SceneLayouts,
};
pub use filter_graph::{FilterGraph, PresentPass};
pub use filter_pipelines::FilterPipelines;
pub use frame_targets::FrameTargets;
pub use impostor::ImpostorRenderer;
pub use index_picker::IndexPicker;
pub use index_sample::IndexSamplePass;
pub use uniforms::{FrameUniforms, ObjectUniforms};
