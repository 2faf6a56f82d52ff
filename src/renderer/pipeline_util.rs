//! Attachment formats shared by every scene drawer.

/// Format of the HDR scene color attachment.
pub const SCENE_COLOR_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba16Float;
/// Format of the flat pick-index attachment.
pub const INDEX_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
/// Format of the scene depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scene pass fragment targets.
///
/// - Target 0: HDR color, no blending
/// - Target 1: pick index, no blending
#[must_use]
pub fn scene_fragment_targets() -> [Option<wgpu::ColorTargetState>; 2] {
    [
        Some(wgpu::ColorTargetState {
            format: SCENE_COLOR_FORMAT,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        }),
        Some(wgpu::ColorTargetState {
            format: INDEX_FORMAT,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        }),
    ]
}

/// Standard depth-stencil state used by all scene pipelines.
#[must_use]
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Multisample state for `sample_count` samples.
#[must_use]
pub fn multisample_state(sample_count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: sample_count,
        ..Default::default()
    }
}
