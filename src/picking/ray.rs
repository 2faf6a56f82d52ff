use glam::{Mat4, Vec2, Vec3};

use crate::scene::BoundingSphere;

/// Determinants at or below this magnitude are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-10;

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Ray origin (the cursor on the near plane).
    pub origin: Vec3,
    /// Unit direction toward the far plane.
    pub direction: Vec3,
}

impl PickRay {
    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray–sphere test. Returns the distance to the nearest intersection in
    /// front of the origin, or `None` on a miss.
    ///
    /// When the origin is inside the sphere the exit point is returned, so a
    /// hit always has `t >= 0`.
    #[must_use]
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<f32> {
        let l = sphere.center - self.origin;
        let s = l.dot(self.direction);
        let l2 = l.length_squared();
        let r2 = sphere.radius * sphere.radius;
        let m2 = l2 - s * s;
        let origin_inside = l2 <= r2;

        if m2 > r2 || (s < 0.0 && !origin_inside) {
            return None;
        }

        let q = (r2 - m2).max(0.0).sqrt();
        let t = if origin_inside { s + q } else { s - q };
        Some(t.max(0.0))
    }
}

/// The cursor unprojected onto the near and far planes, plus the ray
/// between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    /// Cursor on the near plane (NDC z = 0).
    pub near: Vec3,
    /// Cursor on the far plane (NDC z = 1).
    pub far: Vec3,
    /// Ray from `near` toward `far`.
    pub ray: PickRay,
}

impl RaySegment {
    /// Unproject `ndc` through the inverse of `proj * view`.
    ///
    /// Returns `None` when the combined matrix is singular or the unprojected
    /// points collapse, in which case picking is skipped for the frame.
    #[must_use]
    pub fn from_ndc(ndc: Vec2, view: Mat4, proj: Mat4) -> Option<Self> {
        let view_proj = proj * view;
        if view_proj.determinant().abs() <= SINGULAR_EPSILON {
            return None;
        }
        let inverse = view_proj.inverse();

        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }

        let direction = (far - near).try_normalize()?;
        Some(Self {
            near,
            far,
            ray: PickRay {
                origin: near,
                direction,
            },
        })
    }

    /// Distance between the near and far points.
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.far - self.near).length()
    }

    /// Point at `ratio` of the way from `near` to `far`.
    #[must_use]
    pub fn lerp(&self, ratio: f32) -> Vec3 {
        self.near + (self.far - self.near) * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> (Mat4, Mat4) {
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.5, -3.0),
            Vec3::new(0.0, 0.3, 3.0),
            Vec3::Y,
        );
        let proj = Mat4::perspective_rh(70f32.to_radians(), 1.6, 0.1, 50.0);
        (view, proj)
    }

    #[test]
    fn unproject_round_trips_through_view_projection() {
        let (view, proj) = camera();
        let view_proj = proj * view;
        for &(x, y) in &[
            (0.0, 0.0),
            (-1.0, -1.0),
            (1.0, 1.0),
            (0.35, -0.8),
            (-0.9, 0.6),
        ] {
            let seg = RaySegment::from_ndc(Vec2::new(x, y), view, proj)
                .unwrap_or_else(|| panic!("ray for ({x}, {y})"));
            let near = view_proj.project_point3(seg.near);
            let far = view_proj.project_point3(seg.far);
            assert!(near.abs_diff_eq(Vec3::new(x, y, 0.0), 1e-3), "{near}");
            assert!(far.abs_diff_eq(Vec3::new(x, y, 1.0), 1e-3), "{far}");
            assert!((seg.ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn singular_view_projection_is_skipped() {
        let (view, _) = camera();
        assert!(RaySegment::from_ndc(Vec2::ZERO, view, Mat4::ZERO).is_none());
        let flat = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
        assert!(RaySegment::from_ndc(Vec2::ZERO, flat, Mat4::IDENTITY)
            .is_none());
    }

    #[test]
    fn sphere_hit_reports_analytic_distance() {
        let ray = PickRay {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.5);
        let t = ray.intersect_sphere(&sphere);
        assert!(t.is_some_and(|t| (t - 3.5).abs() < 1e-5), "{t:?}");
    }

    #[test]
    fn sphere_hit_off_axis() {
        let direction = Vec3::new(0.0, 0.6, 0.8);
        let ray = PickRay {
            origin: Vec3::ZERO,
            direction,
        };
        // Sphere centered on the ray, so the entry point is at t0 = 10 - r.
        let sphere = BoundingSphere::new(direction * 10.0, 2.0);
        let t = ray.intersect_sphere(&sphere);
        assert!(t.is_some_and(|t| (t - 8.0).abs() < 1e-4), "{t:?}");
    }

    #[test]
    fn sphere_miss_to_the_side() {
        let ray = PickRay {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        let sphere = BoundingSphere::new(Vec3::new(3.0, 0.0, 5.0), 1.0);
        assert_eq!(ray.intersect_sphere(&sphere), None);
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let ray = PickRay {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert_eq!(ray.intersect_sphere(&sphere), None);
    }

    #[test]
    fn origin_inside_returns_exit_point() {
        let ray = PickRay {
            origin: Vec3::new(0.0, 0.0, 4.5),
            direction: Vec3::Z,
        };
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = ray.intersect_sphere(&sphere);
        assert!(t.is_some_and(|t| (t - 1.5).abs() < 1e-5), "{t:?}");
    }

    #[test]
    fn segment_lerp_spans_near_to_far() {
        let (view, proj) = camera();
        let seg = RaySegment::from_ndc(Vec2::new(0.2, 0.1), view, proj);
        let seg = seg.unwrap_or_else(|| panic!("ray"));
        assert!(seg.lerp(0.0).abs_diff_eq(seg.near, 1e-6));
        assert!(seg.lerp(1.0).abs_diff_eq(seg.far, 1e-3));
    }
}
