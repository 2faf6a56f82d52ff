use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Scene pass and presentation toggles.
pub struct DisplayOptions {
    /// Run the bloom filter graph. When off, the scene is presented as is.
    #[schemars(title = "Post Processing")]
    pub post_processing: bool,
    /// Scene pass samples per pixel (1 or 4).
    #[schemars(title = "MSAA Samples", range(min = 1, max = 4))]
    pub msaa_samples: u32,
    /// Forwarded to host drawers; impostors have no edges to show.
    #[schemars(title = "Wireframe")]
    pub wireframe: bool,
    /// Scene clear color (linear RGB).
    #[schemars(skip)]
    pub clear_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            post_processing: true,
            msaa_samples: 4,
            wireframe: false,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl DisplayOptions {
    /// Sample count actually used: 4 when more than one is requested.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        if self.msaa_samples > 1 {
            4
        } else {
            1
        }
    }

    /// Clear color as a wgpu color with full alpha.
    #[must_use]
    pub fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_color;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: 1.0,
        }
    }
}
