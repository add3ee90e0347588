//! Surface geometry and deformation for projection mapping.
//!
//! A [`WarpSurface`] is a planar quad mesh whose shape is a pure algebraic
//! function of its control points: four corners, optional curved-edge
//! midpoints (Coons patch) and positional pins (inverse-distance-weighted
//! displacement). Every control mutation recomputes the whole grid.

pub mod bezier;
pub mod grid;
pub mod patch;
pub mod pin;
pub mod surface;

pub use bezier::QuadBezier;
pub use grid::GridBuffer;
pub use patch::{bilinear_point, coons_point, edge_curve, Edge};
pub use pin::{apply_pins, influence_radius, Pin};
pub use surface::{TextureKey, WarpSurface, DEFAULT_SEGMENTS, MAX_SEGMENTS, MIN_SEGMENTS};
