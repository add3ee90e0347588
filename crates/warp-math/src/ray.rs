use crate::{Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Intersect with a plane. Returns `(t, point)` for hits in front of
    /// the origin, `None` when the ray is parallel or points away.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<(f64, Point3)> {
        let denom = self.direction.dot(plane.normal);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (plane.origin - self.origin).dot(plane.normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some((t, self.at(t)))
    }

    /// Moller-Trumbore ray/triangle intersection, both-sided.
    ///
    /// Backface culling is deliberately off: dragging corners can flip the
    /// winding of a warped quad and it must stay pickable.
    pub fn intersect_triangle(&self, a: Point3, b: Point3, c: Point3) -> Option<(f64, Point3)> {
        let e1 = b - a;
        let e2 = c - a;
        let pvec = self.direction.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = self.origin - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(e1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(qvec) * inv_det;
        if t < 0.0 {
            return None;
        }
        Some((t, self.at(t)))
    }
}
