//! Render pipelines for every filter [`ShaderPair`].

use super::pipeline_util::SCENE_COLOR_FORMAT;
use crate::error::GlintError;
use crate::filter::{ShaderPair, StageOutput};
use crate::gpu::pipeline_helpers::{
    create_fullscreen_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

const SAMPLING: (&str, &str) = (
    include_str!("../../assets/shaders/screen/sampling.wgsl"),
    "screen/sampling.wgsl",
);
const BLUR_X: (&str, &str) = (
    include_str!("../../assets/shaders/screen/blur_x.wgsl"),
    "screen/blur_x.wgsl",
);
const BLUR_Y: (&str, &str) = (
    include_str!("../../assets/shaders/screen/blur_y.wgsl"),
    "screen/blur_y.wgsl",
);
const COMBINE: (&str, &str) = (
    include_str!("../../assets/shaders/screen/combine.wgsl"),
    "screen/combine.wgsl",
);

/// Shader file and fragment entry point for a pair.
fn shader_of(pair: ShaderPair) -> ((&'static str, &'static str), &'static str) {
    match pair {
        ShaderPair::Sampling => (SAMPLING, "fs_sampling"),
        ShaderPair::Threshold => (SAMPLING, "fs_threshold"),
        ShaderPair::BlurX => (BLUR_X, "fs_blur_x"),
        ShaderPair::BlurY => (BLUR_Y, "fs_blur_y"),
        ShaderPair::Combine => (COMBINE, "fs_combine"),
    }
}

fn slot(pair: ShaderPair) -> usize {
    match pair {
        ShaderPair::Sampling => 0,
        ShaderPair::Threshold => 1,
        ShaderPair::BlurX => 2,
        ShaderPair::BlurY => 3,
        ShaderPair::Combine => 4,
    }
}

/// Pipelines, layouts and the shared sampler for filter stages.
///
/// Intermediate stages render `Rgba16Float`; the combine stage and the
/// post-processing-off passthrough render the presentation format.
pub struct FilterPipelines {
    single_input_layout: wgpu::BindGroupLayout,
    dual_input_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    intermediate: Vec<wgpu::RenderPipeline>,
    combine_present: wgpu::RenderPipeline,
    sampling_present: wgpu::RenderPipeline,
}

impl FilterPipelines {
    /// Every filter shader as `(source, file_path)`.
    pub const SOURCES: &'static [(&'static str, &'static str)] =
        &[SAMPLING, BLUR_X, BLUR_Y, COMBINE];

    /// Compose the filter shaders and build one pipeline per pair.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Shader`] if a shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, GlintError> {
        let device = &context.device;
        let single_input_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Filter Single Input Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
                ],
            });
        let dual_input_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Filter Dual Input Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    filtering_sampler(2),
                    uniform_buffer(3, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let mut modules = Vec::with_capacity(Self::SOURCES.len());
        for &(source, path) in Self::SOURCES {
            modules.push((
                path,
                composer.compose(device, path, source, path)?,
            ));
        }
        let module_for = |pair: ShaderPair| {
            let ((_, path), entry) = shader_of(pair);
            modules
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, module)| (module, entry))
                .ok_or_else(|| {
                    GlintError::Shader(format!("no module for {pair:?}"))
                })
        };

        let build = |pair: ShaderPair,
                     format: wgpu::TextureFormat|
         -> Result<wgpu::RenderPipeline, GlintError> {
            let (module, entry) = module_for(pair)?;
            let layout = if pair.input_count() == 2 {
                &dual_input_layout
            } else {
                &single_input_layout
            };
            Ok(create_fullscreen_pipeline(
                device,
                &format!("Filter {pair:?} {format:?}"),
                module,
                entry,
                format,
                &[layout],
            ))
        };

        let mut intermediate = Vec::with_capacity(ShaderPair::ALL.len());
        for pair in ShaderPair::ALL {
            debug_assert_eq!(slot(pair), intermediate.len());
            intermediate.push(build(pair, SCENE_COLOR_FORMAT)?);
        }
        let combine_present = build(ShaderPair::Combine, context.format())?;
        let sampling_present = build(ShaderPair::Sampling, context.format())?;

        Ok(Self {
            single_input_layout,
            dual_input_layout,
            sampler: linear_sampler(device, "Filter Sampler"),
            intermediate,
            combine_present,
            sampling_present,
        })
    }

    /// Pipeline for a stage with the given shader and output.
    #[must_use]
    pub fn pipeline(
        &self,
        pair: ShaderPair,
        output: StageOutput,
    ) -> &wgpu::RenderPipeline {
        match (output, pair) {
            (StageOutput::Presentation, ShaderPair::Combine) => {
                &self.combine_present
            }
            (StageOutput::Presentation, _) => &self.sampling_present,
            (StageOutput::Intermediate, _) => &self.intermediate[slot(pair)],
        }
    }

    /// Bind group layout for a pair.
    #[must_use]
    pub fn layout(&self, pair: ShaderPair) -> &wgpu::BindGroupLayout {
        if pair.input_count() == 2 {
            &self.dual_input_layout
        } else {
            &self.single_input_layout
        }
    }

    /// Shared linear clamp sampler.
    #[must_use]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
