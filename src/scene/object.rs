use glam::{Mat4, Quat, Vec3, Vec4};

use super::BoundingSphere;
use crate::picking::DragDelta;

/// Opaque rendering descriptor handed through to drawers.
///
/// The core never interprets these values; texture paths are host strings
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Diffuse albedo.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
    /// Whether the host drawer should sample `texture_path`.
    pub use_texture: bool,
    /// Host-provided texture file path.
    pub texture_path: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self::flat(Vec3::splat(0.8), Vec3::splat(0.2))
    }
}

impl Material {
    /// Untextured material with the given colors.
    #[must_use]
    pub fn flat(diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            diffuse,
            specular,
            use_texture: false,
            texture_path: None,
        }
    }

    /// Attach a texture path and enable texturing.
    #[must_use]
    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self.use_texture = true;
        self
    }
}

/// A manipulable scene object: world transform, material and bounds.
///
/// Transform and bounds are only reachable through methods that keep
/// `bounds.center` equal to the transform's translation.
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    transform: Mat4,
    bounds: BoundingSphere,
    material: Material,
}

impl SceneObject {
    /// Create an object whose bounding sphere of `radius` is centered on the
    /// translation of `transform`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        transform: Mat4,
        radius: f32,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            transform,
            bounds: BoundingSphere::new(translation_of(&transform), radius),
            material,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current world transform.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Bounding sphere in world space.
    #[must_use]
    pub fn bounds(&self) -> &BoundingSphere {
        &self.bounds
    }

    /// Rendering descriptor.
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Mutable rendering descriptor.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Replace the world transform and resync the bounds.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.bounds.center = translation_of(&transform);
    }

    /// Apply one frame of drag: rotate about the object's own center, then
    /// translate by the increment.
    pub fn apply_drag(&mut self, delta: &DragDelta) {
        self.set_transform(compose_drag(
            self.transform,
            delta.rotation,
            delta.translation,
        ));
    }
}

/// `T(origin + translation) * R(rotation) * L`, where `L` is `transform`
/// with its translation removed.
#[must_use]
pub fn compose_drag(transform: Mat4, rotation: Quat, translation: Vec3) -> Mat4 {
    let origin = translation_of(&transform);
    let mut local = transform;
    local.w_axis = Vec4::W;
    Mat4::from_translation(origin + translation)
        * Mat4::from_quat(rotation)
        * local
}

fn translation_of(transform: &Mat4) -> Vec3 {
    transform.w_axis.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(center: Vec3) -> SceneObject {
        SceneObject::new(
            "probe",
            Mat4::from_translation(center),
            1.0,
            Material::default(),
        )
    }

    #[test]
    fn bounds_follow_set_transform() {
        let mut obj = object_at(Vec3::ZERO);
        obj.set_transform(Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.4),
            Vec3::new(1.0, -2.0, 3.0),
        ));
        assert_eq!(obj.bounds().center, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(obj.bounds().radius, 1.0);
    }

    #[test]
    fn rotation_keeps_center_fixed() {
        let center = Vec3::new(2.0, 0.3, 3.0);
        let mut obj = object_at(center);
        obj.apply_drag(&DragDelta {
            translation: Vec3::ZERO,
            rotation: Quat::from_rotation_z(1.0),
        });
        assert!(obj.bounds().center.abs_diff_eq(center, 1e-6));
        let expected = Mat4::from_translation(center)
            * Mat4::from_quat(Quat::from_rotation_z(1.0));
        assert!(obj.transform().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn rotation_accumulates_on_existing_orientation() {
        let mut obj = object_at(Vec3::X);
        let step = Quat::from_rotation_y(0.25);
        for _ in 0..4 {
            obj.apply_drag(&DragDelta {
                translation: Vec3::ZERO,
                rotation: step,
            });
        }
        let expected = Mat4::from_translation(Vec3::X)
            * Mat4::from_quat(Quat::from_rotation_y(1.0));
        assert!(obj.transform().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn translation_appends_after_rotation() {
        let mut obj = object_at(Vec3::new(0.0, 0.0, 5.0));
        obj.apply_drag(&DragDelta {
            translation: Vec3::new(0.5, -1.0, 0.0),
            rotation: Quat::from_rotation_x(0.3),
        });
        assert!(obj
            .bounds()
            .center
            .abs_diff_eq(Vec3::new(0.5, -1.0, 5.0), 1e-6));
    }

    #[test]
    fn textured_material_keeps_host_path() {
        let m = Material::default().with_texture("textures/earth.jpg");
        assert!(m.use_texture);
        assert_eq!(m.texture_path.as_deref(), Some("textures/earth.jpg"));
    }
}
