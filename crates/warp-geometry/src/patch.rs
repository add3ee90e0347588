//! Bilinear and Coons-patch interpolation over four corners.
//!
//! Corners are ordered TL, TR, BR, BL. The parameterization follows the
//! grid convention: `v = 1` is the top edge, `v = 0` the bottom edge.

use crate::bezier::QuadBezier;
use serde::{Deserialize, Serialize};
use warp_math::Point2;

/// One edge of a quad surface, in midpoint-array order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Corner indices (into the TL, TR, BR, BL array) of this edge's
    /// start and end, in boundary-curve direction.
    pub fn corner_indices(self) -> (usize, usize) {
        match self {
            Edge::Top => (0, 1),    // TL -> TR
            Edge::Right => (1, 2),  // TR -> BR
            Edge::Bottom => (3, 2), // BL -> BR
            Edge::Left => (0, 3),   // TL -> BL
        }
    }
}

/// Bilinear interpolation of the four corners.
pub fn bilinear_point(corners: &[Point2; 4], u: f64, v: f64) -> Point2 {
    let [tl, tr, br, bl] = *corners;
    tl * ((1.0 - u) * v) + tr * (u * v) + br * (u * (1.0 - v)) + bl * ((1.0 - u) * (1.0 - v))
}

/// The boundary curve of one edge: a quadratic Bezier through the edge's
/// corner pair, controlled by that edge's midpoint. A missing midpoint
/// degenerates to the straight segment.
pub fn edge_curve(corners: &[Point2; 4], midpoints: &[Option<Point2>; 4], edge: Edge) -> QuadBezier {
    let (s, e) = edge.corner_indices();
    let (start, end) = (corners[s], corners[e]);
    match midpoints[edge.index()] {
        Some(ctrl) => QuadBezier::new(start, ctrl, end),
        None => QuadBezier::segment(start, end),
    }
}

/// Coons-patch interpolation: blends the four boundary curves and removes
/// the double-counted bilinear term, so the patch matches every boundary
/// curve exactly and reduces to bilinear when all midpoints are linear.
///
/// Left and right curves run top-to-bottom, so they are evaluated at
/// `1 - v` to keep `v = 1` at the TL/TR end.
pub fn coons_point(
    corners: &[Point2; 4],
    midpoints: &[Option<Point2>; 4],
    u: f64,
    v: f64,
) -> Point2 {
    let top = edge_curve(corners, midpoints, Edge::Top);
    let bottom = edge_curve(corners, midpoints, Edge::Bottom);
    let left = edge_curve(corners, midpoints, Edge::Left);
    let right = edge_curve(corners, midpoints, Edge::Right);

    bottom.point_at(u) * (1.0 - v) + top.point_at(u) * v
        + left.point_at(1.0 - v) * (1.0 - u)
        + right.point_at(1.0 - v) * u
        - bilinear_point(corners, u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp_math::dvec2;

    fn unit_corners() -> [Point2; 4] {
        [
            dvec2(-0.5, 0.375),  // TL
            dvec2(0.5, 0.375),   // TR
            dvec2(0.5, -0.375),  // BR
            dvec2(-0.5, -0.375), // BL
        ]
    }

    #[test]
    fn test_bilinear_corners() {
        let c = unit_corners();
        assert!((bilinear_point(&c, 0.0, 0.0) - c[3]).length() < 1e-12); // BL
        assert!((bilinear_point(&c, 1.0, 0.0) - c[2]).length() < 1e-12); // BR
        assert!((bilinear_point(&c, 0.0, 1.0) - c[0]).length() < 1e-12); // TL
        assert!((bilinear_point(&c, 1.0, 1.0) - c[1]).length() < 1e-12); // TR
    }

    #[test]
    fn test_bilinear_center() {
        let c = unit_corners();
        let p = bilinear_point(&c, 0.5, 0.5);
        assert!(p.length() < 1e-12);
    }

    #[test]
    fn test_coons_matches_bilinear_with_linear_midpoints() {
        let c = unit_corners();
        let midpoints: [Option<Point2>; 4] = [
            Some((c[0] + c[1]) * 0.5),
            Some((c[1] + c[2]) * 0.5),
            Some((c[3] + c[2]) * 0.5),
            Some((c[0] + c[3]) * 0.5),
        ];
        for j in 0..=8 {
            for i in 0..=8 {
                let (u, v) = (i as f64 / 8.0, j as f64 / 8.0);
                let diff = coons_point(&c, &midpoints, u, v) - bilinear_point(&c, u, v);
                assert!(diff.length() < 1e-12, "mismatch at ({u}, {v})");
            }
        }
    }

    #[test]
    fn test_coons_matches_bilinear_with_null_midpoints() {
        let c = unit_corners();
        let midpoints = [None; 4];
        let diff = coons_point(&c, &midpoints, 0.3, 0.7) - bilinear_point(&c, 0.3, 0.7);
        assert!(diff.length() < 1e-12);
    }

    #[test]
    fn test_coons_interpolates_curved_top_edge() {
        let c = unit_corners();
        let mut midpoints = [None; 4];
        // Pull the top edge upward
        let ctrl = dvec2(0.0, 0.6);
        midpoints[Edge::Top.index()] = Some(ctrl);

        let curve = QuadBezier::new(c[0], ctrl, c[1]);
        for i in 0..=8 {
            let u = i as f64 / 8.0;
            let on_patch = coons_point(&c, &midpoints, u, 1.0);
            let on_curve = curve.point_at(u);
            assert!((on_patch - on_curve).length() < 1e-12, "boundary mismatch at u={u}");
        }
    }

    #[test]
    fn test_coons_corners_exact() {
        let c = unit_corners();
        let midpoints = [Some(dvec2(0.0, 0.9)), Some(dvec2(0.8, 0.0)), None, None];
        assert!((coons_point(&c, &midpoints, 0.0, 1.0) - c[0]).length() < 1e-12);
        assert!((coons_point(&c, &midpoints, 1.0, 1.0) - c[1]).length() < 1e-12);
        assert!((coons_point(&c, &midpoints, 1.0, 0.0) - c[2]).length() < 1e-12);
        assert!((coons_point(&c, &midpoints, 0.0, 0.0) - c[3]).length() < 1e-12);
    }
}
