//! Bloom filter graph shape.
//!
//! Everything here is GPU-free: [`FilterGraphShape::build`] turns a screen
//! size and [`BloomSettings`] into an ordered stage list, and
//! [`crate::renderer::FilterGraph`] realizes that list into textures, bind
//! groups and passes.

mod config;
mod controls;
mod graph;

pub use config::{BloomSettings, BlurSizing};
pub use controls::{BloomControls, BloomUpdate};
pub use graph::{
    FilterGraphShape, FilterStage, Resolution, ShaderPair, StageId,
    StageInput, StageKind, StageOutput, StageParams,
};
