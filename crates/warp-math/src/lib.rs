pub mod plane;
pub mod ray;

pub use glam::{dvec2, dvec3, DVec2, DVec3};
pub use plane::Plane;
pub use ray::Ray;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
