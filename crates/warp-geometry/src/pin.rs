//! Pin displacement: local inverse-distance-weighted deformation applied
//! on top of the patch-interpolated base shape.

use warp_core::PinId;
use warp_math::Point2;

/// Influence radius as a fraction of the surface diagonal.
const RADIUS_FACTOR: f64 = 0.75;

/// Cubic falloff exponent: smooth, compactly supported, zero derivative
/// at the boundary.
const FALLOFF: i32 = 3;

/// A user-placed control point that locally drags nearby vertices.
///
/// `origin` is where the pin was placed on the un-pinned surface;
/// `position` is where it has since been dragged. Influence is computed
/// against the surface's current patch-interpolated shape, never a frozen
/// base mesh.
#[derive(Debug, Clone, Copy)]
pub struct Pin {
    pub id: PinId,
    pub origin: Point2,
    pub position: Point2,
}

impl Pin {
    pub fn at(point: Point2) -> Self {
        Self {
            id: PinId::new(),
            origin: point,
            position: point,
        }
    }

    pub fn displacement(&self) -> Point2 {
        self.position - self.origin
    }
}

/// Influence radius for the current corner set: 0.75 x the TR->BL
/// diagonal, so influence scales with surface size.
pub fn influence_radius(corners: &[Point2; 4]) -> f64 {
    (corners[1] - corners[3]).length() * RADIUS_FACTOR
}

/// Displace a base point by the unnormalized weighted sum of pin pulls.
///
/// The sum is intentionally NOT divided by the total weight: overlapping
/// pins stack cumulatively, which the editor's stacking behavior relies
/// on. Do not replace this with normalized IDW.
pub fn apply_pins(base: Point2, pins: &[Pin], radius: f64) -> Point2 {
    if pins.is_empty() || radius <= 0.0 {
        return base;
    }
    let mut sum = Point2::ZERO;
    for pin in pins {
        let dist = (base - pin.origin).length();
        if dist >= radius {
            continue;
        }
        let w = (1.0 - dist / radius).powi(FALLOFF);
        sum += pin.displacement() * w;
    }
    base + sum
}
