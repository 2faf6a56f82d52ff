//! Scene drawing seam: the [`SceneDrawer`] trait and the uniform bindings
//! the engine hands to it each frame.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use super::uniforms::{FrameUniforms, ObjectUniforms};
use crate::error::GlintError;
use crate::gpu::pipeline_helpers::uniform_buffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::scene::ObjectId;

/// Draws scene objects into the scene pass.
///
/// Pipelines must target [`scene_fragment_targets`](super::pipeline_util::scene_fragment_targets)
/// and [`depth_stencil_state`](super::pipeline_util::depth_stencil_state)
/// with the sample count passed to [`prepare`](Self::prepare). Bind group 0
/// is the frame block, group 1 the object block.
pub trait SceneDrawer {
    /// (Re)build GPU state. Called when the drawer is installed and whenever
    /// the scene sample count changes.
    ///
    /// # Errors
    ///
    /// Returns an error if shader composition or pipeline setup fails.
    fn prepare(&mut self, setup: DrawerSetup<'_>) -> Result<(), GlintError>;

    /// Record draw calls for every object in `bindings`.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, bindings: &DrawBindings<'_>);
}

/// Everything a drawer needs to build its pipelines.
pub struct DrawerSetup<'a> {
    /// GPU device and queue.
    pub context: &'a RenderContext,
    /// Shared WGSL composer (`glint::scene` is registered).
    pub composer: &'a mut ShaderComposer,
    /// Frame and object bind group layouts.
    pub layouts: &'a SceneLayouts,
    /// Samples per pixel of the scene attachments.
    pub sample_count: u32,
}

/// Bind groups for one frame.
pub struct DrawBindings<'a> {
    /// Camera block, group 0.
    pub frame: &'a wgpu::BindGroup,
    /// Object blocks, group 1, in scene order.
    pub objects: Vec<(ObjectId, &'a wgpu::BindGroup)>,
    /// Cursor marker block, if the marker is visible this frame.
    pub marker: Option<&'a wgpu::BindGroup>,
    /// Host wireframe toggle.
    pub wireframe: bool,
}

/// Bind group layouts for the frame and object uniform blocks.
pub struct SceneLayouts {
    /// Group 0: `FrameUniforms`.
    pub frame: wgpu::BindGroupLayout,
    /// Group 1: `ObjectUniforms`.
    pub object: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    fn new(device: &wgpu::Device) -> Self {
        let visibility =
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Uniforms Layout"),
                entries: &[uniform_buffer(0, visibility)],
            });
        let object =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Uniforms Layout"),
                entries: &[uniform_buffer(0, visibility)],
            });
        Self { frame, object }
    }
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        contents: &T,
    ) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(contents),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// GPU uniform buffers for the camera, every object and the cursor marker.
pub struct SceneBindings {
    layouts: SceneLayouts,
    frame: UniformSlot,
    objects: Vec<UniformSlot>,
    marker: UniformSlot,
    marker_visible: bool,
}

impl SceneBindings {
    /// Create layouts and the camera/marker buffers. Object buffers are
    /// allocated on first write.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let layouts = SceneLayouts::new(device);
        let frame = UniformSlot::new(
            device,
            &layouts.frame,
            "Frame Uniforms",
            &FrameUniforms::default(),
        );
        let marker = UniformSlot::new(
            device,
            &layouts.object,
            "Marker Uniforms",
            &ObjectUniforms::zeroed(),
        );
        Self {
            layouts,
            frame,
            objects: Vec::new(),
            marker,
            marker_visible: false,
        }
    }

    /// Bind group layouts for drawer pipelines.
    #[must_use]
    pub fn layouts(&self) -> &SceneLayouts {
        &self.layouts
    }

    /// Upload the camera block.
    pub fn write_frame(&self, queue: &wgpu::Queue, frame: &FrameUniforms) {
        queue.write_buffer(&self.frame.buffer, 0, bytemuck::bytes_of(frame));
    }

    /// Upload one block per object, growing the slot list as needed.
    pub fn write_objects(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        blocks: &[ObjectUniforms],
    ) {
        for (i, block) in blocks.iter().enumerate() {
            if let Some(slot) = self.objects.get(i) {
                queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(block));
            } else {
                self.objects.push(UniformSlot::new(
                    device,
                    &self.layouts.object,
                    &format!("Object {i} Uniforms"),
                    block,
                ));
            }
        }
        self.objects.truncate(blocks.len());
    }

    /// Upload the marker block, or hide the marker with `None`.
    pub fn write_marker(
        &mut self,
        queue: &wgpu::Queue,
        marker: Option<&ObjectUniforms>,
    ) {
        self.marker_visible = marker.is_some();
        if let Some(block) = marker {
            queue.write_buffer(&self.marker.buffer, 0, bytemuck::bytes_of(block));
        }
    }

    /// Borrow this frame's bind groups.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn bindings(&self, wireframe: bool) -> DrawBindings<'_> {
        DrawBindings {
            frame: &self.frame.bind_group,
            objects: self
                .objects
                .iter()
                .enumerate()
                .map(|(i, slot)| (ObjectId::from_raw(i as u32), &slot.bind_group))
                .collect(),
            marker: self.marker_visible.then_some(&self.marker.bind_group),
            wireframe,
        }
    }
}
