//! GPU realization of a [`FilterGraphShape`]: one texture, parameter
//! buffer and bind group per stage, executed as a sequence of fullscreen
//! passes.

use wgpu::util::DeviceExt;

use super::filter_pipelines::FilterPipelines;
use super::pipeline_util::SCENE_COLOR_FORMAT;
use crate::error::GlintError;
use crate::filter::{
    BloomUpdate, FilterGraphShape, FilterStage, Resolution, ShaderPair,
    StageId, StageInput, StageKind, StageOutput, StageParams,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::RenderTarget;

struct RealizedStage {
    target: Option<RenderTarget>,
    params: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A bloom graph with its GPU resources.
pub struct FilterGraph {
    shape: FilterGraphShape,
    stages: Vec<RealizedStage>,
}

impl FilterGraph {
    /// Allocate every stage's resources inside an out-of-memory and a
    /// validation error scope.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ResourceCreation`] if any allocation fails. No
    /// partially built graph escapes.
    pub fn realize(
        context: &RenderContext,
        pipelines: &FilterPipelines,
        shape: FilterGraphShape,
        scene_view: &wgpu::TextureView,
    ) -> Result<Self, GlintError> {
        let device = &context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let stages = allocate_stages(device, pipelines, &shape, scene_view);

        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(error) = out_of_memory.or(validation) {
            return Err(GlintError::ResourceCreation(error.to_string()));
        }

        let stages = stages?;
        log::info!(
            "filter graph realized: {} stages at {}x{}",
            stages.len(),
            shape.screen().width,
            shape.screen().height
        );
        Ok(Self { shape, stages })
    }

    /// The stage list this graph was realized from.
    #[must_use]
    pub fn shape(&self) -> &FilterGraphShape {
        &self.shape
    }

    /// Apply pending threshold/strength edits, re-uploading only the stages
    /// whose parameter block changed.
    pub fn apply_update(&mut self, queue: &wgpu::Queue, update: BloomUpdate) {
        if let Some(threshold) = update.threshold {
            if let Some(id) = self.shape.set_threshold(threshold) {
                self.upload_params(queue, id);
            }
        }
        if let Some(strength) = update.strength {
            if let Some(id) = self.shape.set_strength(strength) {
                self.upload_params(queue, id);
            }
        }
    }

    /// Re-upload one stage's parameter block from the shape.
    pub fn upload_params(&self, queue: &wgpu::Queue, id: StageId) {
        let (Some(stage), Some(realized)) =
            (self.shape.stage(id), self.stages.get(id.index()))
        else {
            return;
        };
        log::trace!("uploading params for stage {id:?}: {:?}", stage.params);
        queue.write_buffer(
            &realized.params,
            0,
            bytemuck::bytes_of(&stage.params),
        );
    }

    /// Encode one pass per stage in construction order. The combine stage
    /// writes `present_view`.
    pub fn execute(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipelines: &FilterPipelines,
        present_view: &wgpu::TextureView,
    ) {
        for (stage, realized) in self.shape.stages().iter().zip(&self.stages) {
            let view = realized
                .target
                .as_ref()
                .map_or(present_view, |target| &target.view);
            encode_fullscreen_pass(
                encoder,
                pass_label(stage),
                view,
                pipelines.pipeline(stage.shader, stage.output),
                &realized.bind_group,
            );
        }
    }
}

fn allocate_stages(
    device: &wgpu::Device,
    pipelines: &FilterPipelines,
    shape: &FilterGraphShape,
    scene_view: &wgpu::TextureView,
) -> Result<Vec<RealizedStage>, GlintError> {
    let mut realized: Vec<RealizedStage> = Vec::with_capacity(shape.len());
    for stage in shape.stages() {
        let label = pass_label(stage);
        let target = match stage.output {
            StageOutput::Intermediate => Some(RenderTarget::new(
                device,
                label,
                stage.resolution.width,
                stage.resolution.height,
                SCENE_COLOR_FORMAT,
            )),
            StageOutput::Presentation => None,
        };

        let mut inputs = Vec::with_capacity(stage.inputs.len());
        for input in &stage.inputs {
            let view = match *input {
                StageInput::Scene => scene_view,
                StageInput::Stage(src) => realized
                    .get(src.index())
                    .and_then(|s| s.target.as_ref())
                    .map(|t| &t.view)
                    .ok_or_else(|| {
                        GlintError::ResourceCreation(format!(
                            "stage {:?} reads unavailable output of {src:?}",
                            stage.id
                        ))
                    })?,
            };
            inputs.push(view);
        }

        let params = create_params_buffer(device, label, &stage.params);
        let bind_group = create_stage_bind_group(
            device,
            pipelines,
            stage.shader,
            &inputs,
            &params,
        );
        realized.push(RealizedStage {
            target,
            params,
            bind_group,
        });
    }
    Ok(realized)
}

fn pass_label(stage: &FilterStage) -> &'static str {
    match stage.kind {
        StageKind::Copy => "Filter Copy",
        StageKind::Downsample => "Filter Downsample",
        StageKind::BlurX => "Filter Blur X",
        StageKind::BlurY => "Filter Blur Y",
        StageKind::Upsample => "Filter Upsample",
        StageKind::Combine => "Filter Combine",
    }
}

fn create_params_buffer(
    device: &wgpu::Device,
    label: &str,
    params: &StageParams,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} Params")),
        contents: bytemuck::bytes_of(params),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn create_stage_bind_group(
    device: &wgpu::Device,
    pipelines: &FilterPipelines,
    shader: ShaderPair,
    inputs: &[&wgpu::TextureView],
    params: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let mut entries: Vec<wgpu::BindGroupEntry<'_>> = inputs
        .iter()
        .enumerate()
        .map(|(i, &view)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        })
        .collect();
    let next = entries.len() as u32;
    entries.push(wgpu::BindGroupEntry {
        binding: next,
        resource: wgpu::BindingResource::Sampler(pipelines.sampler()),
    });
    entries.push(wgpu::BindGroupEntry {
        binding: next + 1,
        resource: params.as_entire_binding(),
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("Filter {shader:?} Bind Group")),
        layout: pipelines.layout(shader),
        entries: &entries,
    })
}

fn encode_fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        ..Default::default()
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

/// Scene color straight to the presentation target, used when
/// post-processing is off.
pub struct PresentPass {
    _params: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PresentPass {
    /// Bind `scene_view` for a plain sampling pass.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        pipelines: &FilterPipelines,
        scene_view: &wgpu::TextureView,
        resolution: Resolution,
    ) -> Self {
        let device = &context.device;
        let (dx, dy) = resolution.texel_size();
        let params = create_params_buffer(
            device,
            "Present",
            &StageParams {
                dx,
                dy,
                threshold: 0.0,
                strength: 0.0,
            },
        );
        let bind_group = create_stage_bind_group(
            device,
            pipelines,
            ShaderPair::Sampling,
            &[scene_view],
            &params,
        );
        Self {
            _params: params,
            bind_group,
        }
    }

    /// Encode the passthrough into `present_view`.
    pub fn execute(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipelines: &FilterPipelines,
        present_view: &wgpu::TextureView,
    ) {
        encode_fullscreen_pass(
            encoder,
            "Present Passthrough",
            present_view,
            pipelines.pipeline(ShaderPair::Sampling, StageOutput::Presentation),
            &self.bind_group,
        );
    }
}
