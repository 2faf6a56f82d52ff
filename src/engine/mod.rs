//! The scene engine: owns the scene, picking, the scene pass and the
//! filter graph, and drives them once per frame.

mod frame;
mod options;
mod scene_sync;

use crate::error::GlintError;
use crate::filter::{BloomControls, FilterGraphShape};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::picking::{DragDelta, DragMode, PickingSystem, SelectionResolver};
use crate::renderer::{
    DrawerSetup, FilterGraph, FilterPipelines, FrameTargets, ImpostorRenderer,
    IndexPicker, IndexSamplePass, PresentPass, SceneBindings, SceneDrawer,
};
use crate::scene::{ObjectId, Scene};
use crate::util::frame_timing::FrameTiming;

/// Interactive scene engine: picking and drag manipulation, the scene pass
/// and the bloom filter graph.
///
/// # Frame loop
///
/// Each frame, call [`update`](Self::update) with the frame time, an
/// [`InputSnapshot`](crate::input::InputSnapshot) and the host camera, then
/// [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the surface size changes.
///
/// # Bloom
///
/// [`rebuild_filter_graph`](Self::rebuild_filter_graph) replaces the graph
/// wholesale and keeps the previous one on failure.
/// [`set_bloom_threshold`](Self::set_bloom_threshold) and
/// [`set_bloom_strength`](Self::set_bloom_strength) only touch the stages
/// that read those values, on the next `update`.
///
/// # Collaborators
///
/// Objects are drawn by a [`SceneDrawer`] ([`ImpostorRenderer`] by default)
/// and the pick target comes from a [`SelectionResolver`] (the GPU
/// [`IndexPicker`] by default).
pub struct SceneEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    composer: ShaderComposer,
    scene: Scene,
    picking: PickingSystem,
    index_picker: IndexPicker,
    index_sample_pass: IndexSamplePass,
    /// Host resolver; `None` reads the index target.
    resolver: Option<Box<dyn SelectionResolver>>,
    drawer: Box<dyn SceneDrawer>,
    scene_bindings: SceneBindings,
    frame_targets: FrameTargets,
    filter_pipelines: FilterPipelines,
    /// `None` when the current settings do not fit the surface; the scene
    /// is then presented unfiltered.
    filter_graph: Option<FilterGraph>,
    present_pass: PresentPass,
    bloom_controls: BloomControls,
    options: Options,
    /// Per-frame timing and FPS tracking.
    pub frame_timing: FrameTiming,
    cursor_px: (u32, u32),
    last_delta: DragDelta,
}

impl SceneEngine {
    /// Engine rendering to a window surface.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError`] if GPU initialization, shader composition or
    /// the initial filter graph fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        scene: Scene,
        options: Options,
    ) -> Result<Self, GlintError> {
        let context = RenderContext::new(window, size).await?;
        Self::from_context(context, scene, options)
    }

    /// Engine from a pre-built [`RenderContext`] (for embedding or
    /// headless rendering with [`render_to_view`](Self::render_to_view)).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError`] if shader composition or the initial filter
    /// graph fails.
    pub fn from_context(
        context: RenderContext,
        scene: Scene,
        options: Options,
    ) -> Result<Self, GlintError> {
        let mut composer = ShaderComposer::new()?;
        let (width, height) = (context.width(), context.height());

        let frame_targets = FrameTargets::new(
            &context.device,
            width,
            height,
            options.display.sample_count(),
        );
        let scene_bindings = SceneBindings::new(&context.device);

        let mut drawer: Box<dyn SceneDrawer> = Box::new(ImpostorRenderer::new());
        drawer.prepare(DrawerSetup {
            context: &context,
            composer: &mut composer,
            layouts: scene_bindings.layouts(),
            sample_count: frame_targets.sample_count(),
        })?;

        let filter_pipelines = FilterPipelines::new(&context, &mut composer)?;
        let shape = FilterGraphShape::build(width, height, &options.bloom)?;
        let filter_graph = FilterGraph::realize(
            &context,
            &filter_pipelines,
            shape,
            &frame_targets.color_resolve.view,
        )?;
        let present_pass = PresentPass::new(
            &context,
            &filter_pipelines,
            &frame_targets.color_resolve.view,
            filter_graph.shape().screen(),
        );

        let index_picker = IndexPicker::new(&context.device);
        let index_sample_pass =
            IndexSamplePass::new(&context, &mut composer, &frame_targets)?;
        log::info!(
            "scene engine ready: {} objects, {width}x{height}, {}x MSAA",
            scene.len(),
            frame_targets.sample_count()
        );

        Ok(Self {
            picking: PickingSystem::new(&options.picking),
            bloom_controls: BloomControls::new(&options.bloom),
            context,
            composer,
            scene,
            index_picker,
            index_sample_pass,
            resolver: None,
            drawer,
            scene_bindings,
            frame_targets,
            filter_pipelines,
            filter_graph: Some(filter_graph),
            present_pass,
            options,
            frame_timing: FrameTiming::new(0),
            cursor_px: (0, 0),
            last_delta: DragDelta::IDENTITY,
        })
    }

    /// The scene being manipulated.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access for host-side edits (adding objects, materials).
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Currently selected object.
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.picking.selected()
    }

    /// Select an object directly, dropping any drag in progress.
    pub fn select(&mut self, id: Option<ObjectId>) {
        self.picking.select(id);
    }

    /// Current drag mode.
    #[must_use]
    pub fn drag_mode(&self) -> DragMode {
        self.picking.drag_mode()
    }

    /// The delta applied by the most recent [`update`](Self::update).
    #[must_use]
    pub fn last_delta(&self) -> DragDelta {
        self.last_delta
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Stages of the active filter graph, if one is realized.
    #[must_use]
    pub fn filter_graph_shape(&self) -> Option<&FilterGraphShape> {
        self.filter_graph.as_ref().map(FilterGraph::shape)
    }

    /// Replace the scene drawer and build its pipelines.
    ///
    /// # Errors
    ///
    /// Returns the drawer's [`SceneDrawer::prepare`] error; the previous
    /// drawer stays installed.
    pub fn set_drawer(
        &mut self,
        mut drawer: Box<dyn SceneDrawer>,
    ) -> Result<(), GlintError> {
        drawer.prepare(DrawerSetup {
            context: &self.context,
            composer: &mut self.composer,
            layouts: self.scene_bindings.layouts(),
            sample_count: self.frame_targets.sample_count(),
        })?;
        self.drawer = drawer;
        Ok(())
    }

    /// Replace the selection resolver. `None` restores the GPU index
    /// picker.
    pub fn set_selection_resolver(
        &mut self,
        resolver: Option<Box<dyn SelectionResolver>>,
    ) {
        self.resolver = resolver;
    }
}
