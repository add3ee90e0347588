use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// The z=0 plane all warp surfaces live on.
    pub fn xy() -> Self {
        Self::new(Point3::ZERO, Vector3::Z)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_signed_distance() {
        let plane = Plane::xy();
        assert!((plane.signed_distance(dvec3(0.0, 0.0, 5.0)) - 5.0).abs() < 1e-10);
        assert!((plane.signed_distance(dvec3(0.0, 0.0, -3.0)) + 3.0).abs() < 1e-10);
    }
}
