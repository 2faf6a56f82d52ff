//! Default scene drawer: each object's bounding sphere as a ray-cast
//! impostor, plus the cursor marker.

use super::drawer::{DrawBindings, DrawerSetup, SceneDrawer};
use super::pipeline_util::{
    depth_stencil_state, multisample_state, scene_fragment_targets,
};
use crate::error::GlintError;

/// Vertices of the camera-facing quad (two triangles).
const QUAD_VERTICES: u32 = 6;

/// Draws every object as a shaded sphere impostor.
///
/// Stands in for host meshes: the sphere matches the object's bounds, so
/// what the user grabs is exactly what picking tests against.
#[derive(Default)]
pub struct ImpostorRenderer {
    pipeline: Option<wgpu::RenderPipeline>,
}

impl ImpostorRenderer {
    /// WGSL source and file path of the impostor shader.
    pub const SOURCE: (&'static str, &'static str) = (
        include_str!("../../assets/shaders/raster/impostor_sphere.wgsl"),
        "raster/impostor_sphere.wgsl",
    );

    /// Drawer with no pipeline yet; built in [`SceneDrawer::prepare`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneDrawer for ImpostorRenderer {
    fn prepare(&mut self, setup: DrawerSetup<'_>) -> Result<(), GlintError> {
        let (source, path) = Self::SOURCE;
        let device = &setup.context.device;
        let shader = setup.composer.compose(
            device,
            "Sphere Impostor Shader",
            source,
            path,
        )?;

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sphere Impostor Pipeline Layout"),
                bind_group_layouts: &[
                    &setup.layouts.frame,
                    &setup.layouts.object,
                ],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sphere Impostor Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &scene_fragment_targets(),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(depth_stencil_state()),
                multisample: multisample_state(setup.sample_count),
                multiview: None,
                cache: None,
            });
        self.pipeline = Some(pipeline);
        log::debug!(
            "impostor pipeline built for {}x MSAA",
            setup.sample_count
        );
        Ok(())
    }

    fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        bindings: &DrawBindings<'_>,
    ) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bindings.frame, &[]);
        for &(_, bind_group) in &bindings.objects {
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw(0..QUAD_VERTICES, 0..1);
        }
        if let Some(marker) = bindings.marker {
            pass.set_bind_group(1, marker, &[]);
            pass.draw(0..QUAD_VERTICES, 0..1);
        }
    }
}
