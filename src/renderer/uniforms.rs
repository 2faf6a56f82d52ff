//! CPU mirrors of the `glint::scene` WGSL uniform blocks.

use glam::{Mat4, Vec3};

use crate::camera::CameraState;
use crate::picking::PickColor;
use crate::scene::{Material, SceneObject};

/// Default Blinn-Phong exponent for scene materials.
const SHININESS: f32 = 32.0;

/// Per-frame camera block (`FrameUniforms` in WGSL).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// `proj * view`.
    pub view_proj: [[f32; 4]; 4],
    /// World-to-view.
    pub view: [[f32; 4]; 4],
    /// View-to-clip.
    pub proj: [[f32; 4]; 4],
    /// Eye position, w unused.
    pub eye: [f32; 4],
}

impl FrameUniforms {
    /// Build the block from a camera snapshot.
    #[must_use]
    pub fn from_camera(camera: &CameraState) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            view: camera.view.to_cols_array_2d(),
            proj: camera.proj.to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
        }
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            view: identity,
            proj: identity,
            eye: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Per-object block (`ObjectUniforms` in WGSL).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    /// Object-to-world.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`.
    pub normal: [[f32; 4]; 4],
    /// Bounding sphere, xyz center + w radius.
    pub bounds: [f32; 4],
    /// Diffuse color, w = 1 when the host should sample its texture.
    pub diffuse: [f32; 4],
    /// Specular color, w = shininess.
    pub specular: [f32; 4],
    /// Flat color written to the index target.
    pub index_color: [f32; 4],
}

impl ObjectUniforms {
    /// Block for a scene object with the given pick color.
    #[must_use]
    pub fn from_object(object: &SceneObject, pick: PickColor) -> Self {
        let model = object.transform();
        Self::build(
            model,
            object.bounds().to_array(),
            object.material(),
            pick,
        )
    }

    /// Block for the cursor marker: an unpickable flat sphere.
    #[must_use]
    pub fn marker(center: Vec3, radius: f32, color: Vec3) -> Self {
        let model = Mat4::from_translation(center);
        let material = Material::flat(color, Vec3::ZERO);
        Self::build(
            model,
            center.extend(radius).to_array(),
            &material,
            PickColor::BACKGROUND,
        )
    }

    fn build(
        model: Mat4,
        bounds: [f32; 4],
        material: &Material,
        pick: PickColor,
    ) -> Self {
        let textured = if material.use_texture { 1.0 } else { 0.0 };
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            bounds,
            diffuse: material.diffuse.extend(textured).to_array(),
            specular: material.specular.extend(SHININESS).to_array(),
            index_color: pick.to_f32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::scene::ObjectId;

    #[test]
    fn block_sizes_match_wgsl_layout() {
        assert_eq!(size_of::<FrameUniforms>(), 208);
        assert_eq!(size_of::<ObjectUniforms>(), 192);
    }

    #[test]
    fn object_block_tracks_bounds_and_pick_color() {
        let transform = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.7),
            Vec3::new(2.0, 0.3, 3.0),
        );
        let object = SceneObject::new("cube", transform, 0.7, Material::default());
        let pick = PickColor::encode(ObjectId::from_raw(1)).unwrap();
        let block = ObjectUniforms::from_object(&object, pick);
        assert_eq!(block.bounds, [2.0, 0.3, 3.0, 0.7]);
        assert_eq!(block.index_color, [2.0 / 255.0, 0.0, 0.0, 1.0]);
        let normal = Mat4::from_cols_array_2d(&block.normal);
        let expected = Quat::from_rotation_y(0.7) * Vec3::X;
        assert!(normal.transform_vector3(Vec3::X).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn marker_is_not_pickable() {
        let block = ObjectUniforms::marker(Vec3::ONE, 0.05, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(block.index_color, [0.0; 4]);
        assert_eq!(block.bounds, [1.0, 1.0, 1.0, 0.05]);
    }

    #[test]
    fn frame_block_carries_eye() {
        let camera = crate::camera::Camera::default();
        let block = FrameUniforms::from_camera(&camera.state());
        assert_eq!(block.eye, [0.0, 0.0, -2.0, 1.0]);
    }
}
