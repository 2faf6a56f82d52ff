//! Per-frame update and render.

use super::scene_sync::{marker_block, object_blocks};
use super::SceneEngine;
use crate::camera::CameraState;
use crate::input::InputSnapshot;
use crate::picking::SelectionResolver;
use crate::renderer::FrameUniforms;

impl SceneEngine {
    /// Advance one frame on the CPU side.
    ///
    /// Resolves the pick target, runs the drag state machine and moves the
    /// selected object, then refreshes the camera, object and marker
    /// uniforms and any pending bloom parameter edits. All of it completes
    /// before [`render`](Self::render) encodes GPU work.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        camera: &CameraState,
    ) {
        self.frame_timing.record(dt);
        self.index_picker.poll(&self.context.device);

        let resolver: &mut dyn SelectionResolver = match self.resolver.as_mut()
        {
            Some(resolver) => &mut **resolver,
            None => &mut self.index_picker,
        };
        self.last_delta =
            self.picking
                .update(input, camera, resolver, &mut self.scene);
        self.cursor_px = input.cursor_px;

        let queue = &self.context.queue;
        self.scene_bindings
            .write_frame(queue, &FrameUniforms::from_camera(camera));
        self.scene_bindings.write_objects(
            &self.context.device,
            queue,
            &object_blocks(&self.scene),
        );
        let marker =
            marker_block(&self.options.picking, self.picking.pick_point());
        self.scene_bindings.write_marker(queue, marker.as_ref());

        self.flush_bloom_controls();
    }

    /// Push pending threshold/strength edits into the filter graph.
    fn flush_bloom_controls(&mut self) {
        if !self.bloom_controls.is_dirty() {
            return;
        }
        let update = self.bloom_controls.take_dirty();
        if let Some(threshold) = update.threshold {
            self.options.bloom.threshold = threshold;
        }
        if let Some(strength) = update.strength {
            self.options.bloom.strength = strength;
        }
        if let Some(graph) = &mut self.filter_graph {
            graph.apply_update(&self.context.queue, update);
        }
    }

    /// Draw the scene, run the filter graph and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the next surface texture cannot be
    /// acquired (including when the context has no surface).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_view(&view);
        frame.present();
        Ok(())
    }

    /// Draw the scene and run the filter graph into `present_view`, which
    /// must have the context's format.
    pub fn render_to_view(&mut self, present_view: &wgpu::TextureView) {
        let mut encoder = self.context.create_encoder();
        {
            let mut pass = self.frame_targets.begin_scene_pass(
                &mut encoder,
                self.options.display.wgpu_clear_color(),
            );
            let bindings =
                self.scene_bindings.bindings(self.options.display.wireframe);
            self.drawer.draw(&mut pass, &bindings);
        }

        if self.resolver.is_none() {
            self.index_sample_pass
                .execute(&mut encoder, &self.frame_targets);
            self.index_picker.copy_pixel_to_staging(
                &mut encoder,
                &self.frame_targets.index_resolve,
                self.cursor_px,
            );
        }

        match &self.filter_graph {
            Some(graph) if self.options.display.post_processing => {
                graph.execute(&mut encoder, &self.filter_pipelines, present_view);
            }
            _ => self.present_pass.execute(
                &mut encoder,
                &self.filter_pipelines,
                present_view,
            ),
        }

        self.context.submit(encoder);
        self.index_picker.start_readback();
    }
}
