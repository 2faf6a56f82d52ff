//! Object registry: an arena of manipulable objects addressed by
//! [`ObjectId`].
//!
//! Objects are created at scene setup and never removed during a session,
//! so an id handed out by [`Scene::add`] stays valid for the lifetime of the
//! scene.

mod bounds;
mod object;

pub use bounds::BoundingSphere;
pub use object::{compose_drag, Material, SceneObject};

use crate::picking::DragDelta;

/// Stable handle to an object in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Wrap a raw id, e.g. one decoded from an index render target.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena slot of this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Flat object storage in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        log::debug!("scene: added '{}' as {:?}", object.name(), id);
        self.objects.push(object);
        id
    }

    /// Look up an object.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.index())
    }

    /// Whether `id` refers to an object in this scene.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        id.index() < self.objects.len()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects with their ids.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    /// Apply a drag increment to one object. Returns `false` if `id` is
    /// unknown. Other objects are never touched.
    pub fn apply_drag(&mut self, id: ObjectId, delta: &DragDelta) -> bool {
        self.get_mut(id).is_some_and(|obj| {
            obj.apply_drag(delta);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3};

    use super::*;

    fn two_object_scene() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let sphere = scene.add(SceneObject::new(
            "sphere",
            Mat4::from_translation(Vec3::new(0.0, 0.3, 3.0)),
            1.3,
            Material::default(),
        ));
        let cube = scene.add(SceneObject::new(
            "cube",
            Mat4::from_translation(Vec3::new(2.0, 0.3, 3.0)),
            0.5 * std::f32::consts::SQRT_2,
            Material::default(),
        ));
        (scene, sphere, cube)
    }

    #[test]
    fn ids_are_dense_indices() {
        let (scene, sphere, cube) = two_object_scene();
        assert_eq!(sphere.index(), 0);
        assert_eq!(cube.index(), 1);
        assert_eq!(scene.len(), 2);
        assert!(!scene.contains(ObjectId::from_raw(2)));
    }

    #[test]
    fn drag_only_touches_target() {
        let (mut scene, sphere, cube) = two_object_scene();
        let before = scene.get(cube).map(SceneObject::transform);
        let moved = scene.apply_drag(
            sphere,
            &DragDelta {
                translation: Vec3::X,
                rotation: Quat::from_rotation_y(0.2),
            },
        );
        assert!(moved);
        assert_eq!(scene.get(cube).map(SceneObject::transform), before);
        let center = scene.get(sphere).map(|o| o.bounds().center);
        assert_eq!(center, Some(Vec3::new(1.0, 0.3, 3.0)));
    }

    #[test]
    fn drag_on_unknown_id_is_rejected() {
        let (mut scene, _, _) = two_object_scene();
        assert!(!scene.apply_drag(ObjectId::from_raw(9), &DragDelta::IDENTITY));
    }
}
