//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::GpuInitError;

/// Reasons a bloom filter configuration is rejected before any GPU work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterConfigError {
    /// `down_levels` was zero.
    ZeroDownLevels,
    /// `down_levels` was not a power of two.
    DownLevelsNotPowerOfTwo(u32),
    /// Dividing the screen by `down_levels` leaves less than one pixel.
    DownLevelsExceedResolution {
        /// Requested divisor.
        down_levels: u32,
        /// Screen width in pixels.
        width: u32,
        /// Screen height in pixels.
        height: u32,
    },
    /// Screen width or height was zero.
    EmptyResolution,
    /// Threshold outside `[0, 1]` (or not finite).
    ThresholdOutOfRange(f32),
    /// Strength below zero (or not finite).
    NegativeStrength(f32),
}

impl fmt::Display for FilterConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDownLevels => write!(f, "down_levels must be at least 1"),
            Self::DownLevelsNotPowerOfTwo(n) => {
                write!(f, "down_levels must be a power of two, got {n}")
            }
            Self::DownLevelsExceedResolution {
                down_levels,
                width,
                height,
            } => write!(
                f,
                "down_levels {down_levels} leaves no pixels at {width}x{height}"
            ),
            Self::EmptyResolution => write!(f, "screen resolution is empty"),
            Self::ThresholdOutOfRange(t) => {
                write!(f, "threshold must lie in [0, 1], got {t}")
            }
            Self::NegativeStrength(s) => {
                write!(f, "strength must be finite and non-negative, got {s}")
            }
        }
    }
}

impl std::error::Error for FilterConfigError {}

/// Errors produced by the glint crate.
#[derive(Debug)]
pub enum GlintError {
    /// GPU context initialization failure.
    Gpu(GpuInitError),
    /// Bloom configuration rejected; the previous filter graph stays active.
    FilterConfig(FilterConfigError),
    /// GPU resource allocation failed while realizing a filter graph.
    ResourceCreation(String),
    /// WGSL module registration or composition failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for GlintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::FilterConfig(e) => {
                write!(f, "invalid filter configuration: {e}")
            }
            Self::ResourceCreation(msg) => {
                write!(f, "GPU resource creation failed: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for GlintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::FilterConfig(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GpuInitError> for GlintError {
    fn from(e: GpuInitError) -> Self {
        Self::Gpu(e)
    }
}

impl From<FilterConfigError> for GlintError {
    fn from(e: FilterConfigError) -> Self {
        Self::FilterConfig(e)
    }
}

impl From<std::io::Error> for GlintError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
