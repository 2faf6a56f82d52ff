//! Sample-0 copy of the multisampled index attachment.
//!
//! A hardware resolve averages the pick colors of two objects meeting at an
//! edge, and the average can decode to a third object. This pass instead
//! writes one sample per pixel into the single-sample index target that
//! [`IndexPicker`](super::IndexPicker) copies from.

use super::frame_targets::FrameTargets;
use super::pipeline_util::INDEX_FORMAT;
use crate::error::GlintError;
use crate::gpu::pipeline_helpers::{
    create_fullscreen_pipeline, multisampled_texture_2d,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

/// Pipeline plus a bind group for the current frame targets.
pub struct IndexSamplePass {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    /// `None` while the targets are single-sampled.
    bind_group: Option<wgpu::BindGroup>,
}

impl IndexSamplePass {
    /// The sample-0 shader as `(source, file_path)`.
    pub const SOURCE: (&'static str, &'static str) = (
        include_str!("../../assets/shaders/screen/index_sample.wgsl"),
        "screen/index_sample.wgsl",
    );

    /// Build the pipeline and bind `targets`.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        targets: &FrameTargets,
    ) -> Result<Self, GlintError> {
        let device = &context.device;
        let (source, path) = Self::SOURCE;
        let module = composer.compose(device, path, source, path)?;
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Index Sample Layout"),
                entries: &[multisampled_texture_2d(0)],
            });
        let pipeline = create_fullscreen_pipeline(
            device,
            "Index Sample",
            &module,
            "fs_sample_zero",
            INDEX_FORMAT,
            &[&layout],
        );
        let mut pass = Self {
            layout,
            pipeline,
            bind_group: None,
        };
        pass.bind(device, targets);
        Ok(pass)
    }

    /// Rebind after the frame targets were recreated.
    pub fn bind(&mut self, device: &wgpu::Device, targets: &FrameTargets) {
        self.bind_group = targets.index_samples().map(|samples| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Index Sample Bind Group"),
                layout: &self.layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(
                        &samples.view,
                    ),
                }],
            })
        });
    }

    /// Write sample 0 into `targets.index_resolve`. No-op for
    /// single-sampled targets, which already render there.
    pub fn execute(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &FrameTargets,
    ) {
        let Some(bind_group) = &self.bind_group else {
            return;
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Index Sample Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &targets.index_resolve.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
