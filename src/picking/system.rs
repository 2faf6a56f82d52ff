use glam::Vec3;

use super::drag::{DragDelta, DragMode, DragState, PickHit};
use super::ray::RaySegment;
use super::selection::SelectionResolver;
use crate::camera::CameraState;
use crate::input::InputSnapshot;
use crate::options::PickingOptions;
use crate::scene::{ObjectId, Scene};

/// Turns cursor + camera state into incremental transforms of the selected
/// object.
#[derive(Debug, Clone, Default)]
pub struct PickingSystem {
    drag: DragState,
    selected: Option<ObjectId>,
    pick_point: Option<Vec3>,
}

impl PickingSystem {
    /// Create an idle picking system with nothing selected.
    #[must_use]
    pub fn new(options: &PickingOptions) -> Self {
        Self {
            drag: DragState::new(options.rotation_deadzone),
            selected: None,
            pick_point: None,
        }
    }

    /// Push picking options into the drag state machine.
    pub fn apply_options(&mut self, options: &PickingOptions) {
        self.drag.set_rotation_deadzone(options.rotation_deadzone);
    }

    /// Currently selected object.
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Current drag mode.
    #[must_use]
    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    /// Where the ray met the selected bounds this frame, if a button is held
    /// and the ray hit.
    #[must_use]
    pub fn pick_point(&self) -> Option<Vec3> {
        self.pick_point
    }

    /// Select an object directly, dropping any drag in progress.
    pub fn select(&mut self, id: Option<ObjectId>) {
        self.selected = id;
        self.drag.reset();
    }

    /// Run one frame: resolve the selection, advance the drag state machine
    /// and apply the resulting delta to the selected object.
    ///
    /// Returns the delta that was applied.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        camera: &CameraState,
        resolver: &mut dyn SelectionResolver,
        scene: &mut Scene,
    ) -> DragDelta {
        self.refresh_selection(resolver.resolve_selection(), scene);
        self.pick_point = None;

        let Some(id) = self.selected else {
            return self.drag.advance(input, None);
        };
        let Some(bounds) = scene.get(id).map(|o| *o.bounds()) else {
            return self.drag.advance(input, None);
        };
        if !input.left && !input.right {
            return self.drag.advance(input, None);
        }

        let Some(segment) =
            RaySegment::from_ndc(input.cursor_ndc, camera.view, camera.proj)
        else {
            log::trace!("picking: singular view-projection, frame skipped");
            return DragDelta::IDENTITY;
        };

        let hit = segment.ray.intersect_sphere(&bounds).map(|t| PickHit {
            segment: &segment,
            t,
            center: bounds.center,
        });
        self.pick_point = hit.as_ref().map(PickHit::point);

        let delta = self.drag.advance(input, hit.as_ref());
        if !delta.is_identity() {
            let _ = scene.apply_drag(id, &delta);
        }
        delta
    }

    /// Adopt a newly resolved object unless a drag is holding the current
    /// one.
    fn refresh_selection(&mut self, resolved: Option<ObjectId>, scene: &Scene) {
        let Some(id) = resolved else {
            return;
        };
        if self.selected == Some(id) || self.drag.is_active() {
            return;
        }
        if !scene.contains(id) {
            log::warn!("picking: resolver returned unknown {id:?}");
            return;
        }
        log::debug!("picking: selected {:?} -> {:?}", self.selected, id);
        self.selected = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec2};

    use super::*;
    use crate::picking::FixedSelection;
    use crate::scene::{Material, SceneObject};

    fn camera() -> CameraState {
        CameraState {
            view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO, Vec3::Y),
            proj: Mat4::perspective_rh(1.2, 1.0, 0.1, 50.0),
            eye: Vec3::new(0.0, 0.0, -3.0),
        }
    }

    fn scene() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let a = scene.add(SceneObject::new(
            "a",
            Mat4::IDENTITY,
            1.0,
            Material::default(),
        ));
        let b = scene.add(SceneObject::new(
            "b",
            Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0)),
            1.0,
            Material::default(),
        ));
        (scene, a, b)
    }

    fn frame(left: bool, right: bool, started: bool, x: f32) -> InputSnapshot {
        InputSnapshot {
            left,
            right,
            drag_started: started,
            cursor_ndc: Vec2::new(x, 0.0),
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let (mut scene, a, _) = scene();
        let mut picking = PickingSystem::default();
        let mut resolver = FixedSelection(None);
        let delta = picking.update(
            &frame(true, false, true, 0.0),
            &camera(),
            &mut resolver,
            &mut scene,
        );
        assert!(delta.is_identity());
        assert_eq!(picking.selected(), None);
        assert_eq!(
            scene.get(a).map(SceneObject::transform),
            Some(Mat4::IDENTITY)
        );
    }

    #[test]
    fn drag_moves_only_the_selected_object() {
        let (mut scene, a, b) = scene();
        let mut picking = PickingSystem::default();
        let mut resolver = FixedSelection(Some(a));
        let cam = camera();

        let _ = picking.update(&frame(true, false, true, 0.0), &cam, &mut resolver, &mut scene);
        assert!(matches!(picking.drag_mode(), DragMode::Translating { .. }));
        assert!(picking.pick_point().is_some());

        let delta = picking.update(
            &frame(true, false, false, 0.05),
            &cam,
            &mut resolver,
            &mut scene,
        );
        assert!(delta.translation.x < 0.0);
        let center = scene.get(a).map(|o| o.bounds().center);
        assert!(center.is_some_and(|c| c.abs_diff_eq(delta.translation, 1e-6)));
        assert_eq!(
            scene.get(b).map(|o| o.bounds().center),
            Some(Vec3::new(4.0, 0.0, 0.0))
        );
    }

    #[test]
    fn selection_is_locked_during_drag() {
        let (mut scene, a, b) = scene();
        let mut picking = PickingSystem::default();
        let cam = camera();
        let _ = picking.update(
            &frame(false, true, true, 0.0),
            &cam,
            &mut FixedSelection(Some(a)),
            &mut scene,
        );
        assert!(matches!(picking.drag_mode(), DragMode::Rotating { .. }));

        let _ = picking.update(
            &frame(false, true, false, 0.0),
            &cam,
            &mut FixedSelection(Some(b)),
            &mut scene,
        );
        assert_eq!(picking.selected(), Some(a));

        let _ = picking.update(
            &frame(false, false, false, 0.0),
            &cam,
            &mut FixedSelection(Some(b)),
            &mut scene,
        );
        assert_eq!(picking.selected(), Some(b));
        assert_eq!(picking.drag_mode(), DragMode::Idle);
    }

    #[test]
    fn singular_camera_leaves_state_untouched() {
        let (mut scene, a, _) = scene();
        let mut picking = PickingSystem::default();
        let mut resolver = FixedSelection(Some(a));
        let _ = picking.update(
            &frame(true, false, true, 0.0),
            &camera(),
            &mut resolver,
            &mut scene,
        );
        let before = picking.drag_mode();

        let broken = CameraState {
            proj: Mat4::ZERO,
            ..camera()
        };
        let delta = picking.update(
            &frame(true, false, false, 0.3),
            &broken,
            &mut resolver,
            &mut scene,
        );
        assert!(delta.is_identity());
        assert_eq!(picking.drag_mode(), before);
    }

    #[test]
    fn rotation_keeps_object_in_place() {
        let (mut scene, a, _) = scene();
        let mut picking = PickingSystem::default();
        let mut resolver = FixedSelection(Some(a));
        let cam = camera();
        let _ = picking.update(&frame(false, true, true, 0.0), &cam, &mut resolver, &mut scene);
        let delta = picking.update(
            &frame(false, true, false, 0.2),
            &cam,
            &mut resolver,
            &mut scene,
        );
        assert_ne!(delta.rotation, Quat::IDENTITY);
        let center = scene.get(a).map(|o| o.bounds().center);
        assert!(center.is_some_and(|c| c.abs_diff_eq(Vec3::ZERO, 1e-6)));
    }
}
