// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D object manipulation with a procedural bloom filter graph,
//! built on wgpu.
//!
//! Glint turns cursor input into translation and rotation of the object
//! under the mouse, and post-processes each frame with a bloom chain whose
//! stages are assembled from a handful of resolution and iteration
//! parameters.
//!
//! # Key entry points
//!
//! - [`engine::SceneEngine`] - per-frame `update` and `render`, filter
//!   graph rebuilds and bloom parameter setters
//! - [`picking::PickingSystem`] - ray construction and the translate/rotate
//!   drag state machine
//! - [`filter::FilterGraphShape`] - the GPU-free bloom stage list
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Each frame runs input, then picking (which moves the selected object),
//! then the scene pass (color, pick index and depth), then a one-texel
//! index readback and the filter graph, which ends in the presented image.
//! Hosts plug in their own [`renderer::SceneDrawer`] and
//! [`picking::SelectionResolver`].

pub mod camera;
pub mod engine;
pub mod error;
pub mod filter;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use engine::SceneEngine;
pub use error::{FilterConfigError, GlintError};
pub use input::{InputEvent, InputSnapshot, InputTracker, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{demo_scene, Viewer, ViewerBuilder};
