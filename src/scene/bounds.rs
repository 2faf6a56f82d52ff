use glam::Vec3;

/// Sphere approximating an object's extent, used for cheap hit testing.
///
/// The center tracks the owning object's translation; see
/// [`SceneObject`](super::SceneObject).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// World-space center.
    pub center: Vec3,
    /// Radius in world units.
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a sphere at `center` with the given `radius`.
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside or on the sphere.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Pack as `[x, y, z, radius]` for GPU uniforms.
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        self.center.extend(self.radius).to_array()
    }
}
