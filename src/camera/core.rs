use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

/// Read-only camera matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix, `[0, 1]` depth.
    pub proj: Mat4,
    /// Eye position in world space.
    pub eye: Vec3,
}

impl CameraState {
    /// Combined `proj * view`.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.6,
            fovy: 70.0,
            znear: 0.01,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Camera at `eye` looking at `target` with +Y up.
    #[must_use]
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            aspect,
            ..Self::default()
        }
    }

    /// Update the aspect ratio from a viewport size.
    #[allow(clippy::cast_precision_loss)]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Snapshot the matrices for this frame.
    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            view: self.build_view(),
            proj: self.build_projection(),
            eye: self.eye,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::looking_at(
            Vec3::new(0.0, 0.5, -3.0),
            Vec3::new(0.0, 0.3, 3.0),
            1.6,
        );
        let ndc = camera.build_matrix().project_point3(camera.target);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn state_matches_builders() {
        let mut camera = Camera::default();
        camera.resize(1280, 720);
        let state = camera.state();
        assert!(state.view_proj().abs_diff_eq(camera.build_matrix(), 1e-6));
        assert_eq!(state.eye, camera.eye);
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
