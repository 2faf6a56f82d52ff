//! Standalone window backed by winit, showing a demo scene.
//!
//! Left-drag translates the object under the cursor, right-drag rotates it.
//! Arrow keys adjust bloom (up/down threshold, left/right strength) and
//! `P` toggles post-processing.
//!
//! ```no_run
//! # use glint::Viewer;
//! Viewer::builder()
//!     .with_title("glint")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    camera::Camera,
    engine::SceneEngine,
    error::GlintError,
    input::{InputEvent, InputTracker, MouseButton},
    options::Options,
    scene::{Material, Scene, SceneObject},
    util::frame_timing::FrameTiming,
};

/// Threshold change per arrow key press.
const THRESHOLD_STEP: f32 = 0.05;
/// Strength change per arrow key press.
const STRENGTH_STEP: f32 = 0.1;

/// Two objects in front of the camera: a large sphere and a box-sized one
/// beside it.
#[must_use]
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    let _ = scene.add(SceneObject::new(
        "sphere",
        Mat4::from_translation(Vec3::new(0.0, 0.3, 3.0)),
        1.3,
        Material::flat(Vec3::ONE, Vec3::splat(0.3)),
    ));
    let _ = scene.add(SceneObject::new(
        "box",
        Mat4::from_translation(Vec3::new(2.0, 0.3, 3.0)),
        0.5 * std::f32::consts::SQRT_2,
        Material::flat(Vec3::splat(0.5), Vec3::splat(0.1)),
    ));
    scene
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    scene: Option<Scene>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            scene: None,
            options: None,
            title: "glint".into(),
        }
    }

    /// Show `scene` instead of [`demo_scene`].
    #[must_use]
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            scene: self.scene,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window for manipulating a scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    scene: Option<Scene>,
    options: Option<Options>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), GlintError> {
        let event_loop =
            EventLoop::new().map_err(|e| GlintError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            camera: Camera::looking_at(
                Vec3::new(0.0, 0.5, -2.0),
                Vec3::new(1.0, 0.3, 3.0),
                1.6,
            ),
            input: InputTracker::new(1, 1),
            timing: FrameTiming::new(0),
            scene: Some(self.scene.unwrap_or_else(demo_scene)),
            options: self.options.unwrap_or_default(),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GlintError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<SceneEngine>,
    camera: Camera,
    input: InputTracker,
    timing: FrameTiming,
    /// Handed to the engine on `resumed`.
    scene: Option<Scene>,
    options: Options,
    title: String,
}

impl ViewerApp {
    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.camera.resize(width, height);
        self.input.resize(width, height);
        if let Some(engine) = &mut self.engine {
            engine.resize(width, height);
        }
    }

    fn redraw(&mut self) {
        let dt = self.timing.tick();
        let snapshot = self.input.snapshot();
        let camera = self.camera.state();
        let Some(engine) = &mut self.engine else {
            return;
        };
        engine.update(dt, &snapshot, &camera);
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                if let Some(w) = &self.window {
                    let inner = w.inner_size();
                    self.resize(inner.width, inner.height);
                }
            }
            Err(e) => {
                log::error!("render error: {e:?}");
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let bloom = &engine.options().bloom;
        let (threshold, strength) = (bloom.threshold, bloom.strength);
        match code {
            KeyCode::ArrowUp => {
                engine.set_bloom_threshold(threshold + THRESHOLD_STEP);
            }
            KeyCode::ArrowDown => {
                engine.set_bloom_threshold(threshold - THRESHOLD_STEP);
            }
            KeyCode::ArrowRight => {
                engine.set_bloom_strength(strength + STRENGTH_STEP);
            }
            KeyCode::ArrowLeft => {
                engine.set_bloom_strength(strength - STRENGTH_STEP);
            }
            KeyCode::KeyP => {
                let mut options = engine.options().clone();
                options.display.post_processing =
                    !options.display.post_processing;
                log::info!(
                    "post-processing {}",
                    if options.display.post_processing { "on" } else { "off" }
                );
                engine.set_options(options);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let (width, height) = (inner.width.max(1), inner.height.max(1));
        self.camera.resize(width, height);
        self.input.resize(width, height);

        let scene = self.scene.take().unwrap_or_default();
        let engine = match pollster::block_on(SceneEngine::new(
            window.clone(),
            (width, height),
            scene,
            self.options.clone(),
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.input.handle_event(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            #[allow(clippy::cast_possible_truncation)]
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_event(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => {
                self.input.handle_event(InputEvent::CursorLeft);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(code);
                }
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_bounds_match_transforms() {
        let scene = demo_scene();
        assert_eq!(scene.len(), 2);
        for (_, object) in scene.iter() {
            let center = object.transform().w_axis.truncate();
            assert_eq!(object.bounds().center, center);
        }
    }
}
