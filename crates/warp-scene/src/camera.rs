//! Orthographic editor camera.

use warp_math::{Point2, Point3, Ray, Vector3};

/// An orthographic camera looking down -Z at the z=0 surface plane.
///
/// The vertical half-extent is fixed at 1 world unit; the horizontal
/// half-extent tracks the viewport aspect ratio.
#[derive(Debug, Clone)]
pub struct Camera {
    pub aspect: f64,
    pub eye_z: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            aspect,
            eye_z: 5.0,
            near: 0.1,
            far: 10.0,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// World-space extent visible on screen: `(-aspect..aspect, -1..1)`.
    pub fn half_extents(&self) -> Point2 {
        Point2::new(self.aspect, 1.0)
    }

    /// Cast a ray from a pointer position in normalized device
    /// coordinates ([-1, 1] on both axes, +y up).
    pub fn pointer_ray(&self, ndc: Point2) -> Ray {
        let origin = Point3::new(ndc.x * self.aspect, ndc.y, self.eye_z);
        Ray::new(origin, -Vector3::Z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
