//! Scene pass attachments and their single-sample resolves.

use super::pipeline_util::{DEPTH_FORMAT, INDEX_FORMAT, SCENE_COLOR_FORMAT};
use crate::gpu::texture::RenderTarget;

/// Color, index and depth attachments for the scene pass.
///
/// With `sample_count > 1` the color and index attachments are multisampled.
/// Color resolves into `color_resolve` for the filter graph. The index
/// attachment is kept unresolved and an
/// [`IndexSamplePass`](super::IndexSamplePass) copies its sample 0 into
/// `index_resolve` for the readback. Single-sampled targets render straight
/// into the resolve textures.
pub struct FrameTargets {
    color_msaa: Option<RenderTarget>,
    index_msaa: Option<RenderTarget>,
    /// Resolved HDR scene color.
    pub color_resolve: RenderTarget,
    /// Single-sample pick-index target.
    pub index_resolve: RenderTarget,
    /// Depth attachment (multisampled to match the color attachments).
    pub depth: RenderTarget,
    sample_count: u32,
    width: u32,
    height: u32,
}

impl FrameTargets {
    /// Allocate targets for a `width` x `height` frame.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let sample_count = if sample_count > 1 { 4 } else { 1 };
        let width = width.max(1);
        let height = height.max(1);
        let (color_msaa, index_msaa) = if sample_count > 1 {
            (
                Some(RenderTarget::with_samples(
                    device,
                    "Scene Color MSAA",
                    width,
                    height,
                    SCENE_COLOR_FORMAT,
                    sample_count,
                )),
                Some(RenderTarget::with_samples(
                    device,
                    "Scene Index MSAA",
                    width,
                    height,
                    INDEX_FORMAT,
                    sample_count,
                )),
            )
        } else {
            (None, None)
        };
        Self {
            color_msaa,
            index_msaa,
            color_resolve: RenderTarget::new(
                device,
                "Scene Color",
                width,
                height,
                SCENE_COLOR_FORMAT,
            ),
            index_resolve: RenderTarget::new(
                device,
                "Scene Index",
                width,
                height,
                INDEX_FORMAT,
            ),
            depth: RenderTarget::with_samples(
                device,
                "Scene Depth",
                width,
                height,
                DEPTH_FORMAT,
                sample_count,
            ),
            sample_count,
            width,
            height,
        }
    }

    /// Samples per pixel of the scene attachments.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Multisampled index attachment, present when `sample_count > 1`.
    #[must_use]
    pub fn index_samples(&self) -> Option<&RenderTarget> {
        self.index_msaa.as_ref()
    }

    /// Frame size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Begin the scene pass: clears color to `clear_color`, index to
    /// transparent black and depth to 1.
    pub fn begin_scene_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear_color: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        let color = match &self.color_msaa {
            Some(msaa) => attachment(
                &msaa.view,
                Some(&self.color_resolve.view),
                clear_color,
            ),
            None => attachment(&self.color_resolve.view, None, clear_color),
        };
        let index_view = self
            .index_msaa
            .as_ref()
            .map_or(&self.index_resolve.view, |msaa| &msaa.view);
        let index = attachment(index_view, None, wgpu::Color::TRANSPARENT);
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(color), Some(index)],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        })
    }
}

/// A resolved attachment discards its samples; an unresolved one keeps them.
fn attachment<'a>(
    view: &'a wgpu::TextureView,
    resolve_target: Option<&'a wgpu::TextureView>,
    clear: wgpu::Color,
) -> wgpu::RenderPassColorAttachment<'a> {
    let store = if resolve_target.is_some() {
        wgpu::StoreOp::Discard
    } else {
        wgpu::StoreOp::Store
    };
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(clear),
            store,
        },
        depth_slice: None,
    }
}
