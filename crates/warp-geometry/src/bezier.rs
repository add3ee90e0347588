//! Quadratic Bezier curves for curved surface edges.

use serde::{Deserialize, Serialize};
use warp_math::Point2;

/// A quadratic Bezier curve with a single control point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuadBezier {
    pub start: Point2,
    pub ctrl: Point2,
    pub end: Point2,
}

impl QuadBezier {
    pub fn new(start: Point2, ctrl: Point2, end: Point2) -> Self {
        Self { start, ctrl, end }
    }

    /// A straight segment expressed as a degenerate quadratic (control
    /// point at the linear midpoint).
    pub fn segment(start: Point2, end: Point2) -> Self {
        Self {
            start,
            ctrl: (start + end) * 0.5,
            end,
        }
    }

    /// Evaluate the curve at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point2 {
        let s = 1.0 - t;
        self.start * (s * s) + self.ctrl * (2.0 * t * s) + self.end * (t * t)
    }

    /// Sample the curve into `segments + 1` polyline points.
    pub fn sample(&self, segments: usize) -> Vec<Point2> {
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp_math::dvec2;

    #[test]
    fn test_endpoints() {
        let c = QuadBezier::new(dvec2(0.0, 0.0), dvec2(0.5, 1.0), dvec2(1.0, 0.0));
        assert!((c.point_at(0.0) - c.start).length() < 1e-12);
        assert!((c.point_at(1.0) - c.end).length() < 1e-12);
    }

    #[test]
    fn test_segment_is_linear() {
        let c = QuadBezier::segment(dvec2(0.0, 0.0), dvec2(2.0, 4.0));
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let expected = dvec2(2.0 * t, 4.0 * t);
            assert!((c.point_at(t) - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_midpoint_pull() {
        // Control point above the chord pulls the midpoint halfway up
        let c = QuadBezier::new(dvec2(0.0, 0.0), dvec2(0.5, 1.0), dvec2(1.0, 0.0));
        let mid = c.point_at(0.5);
        assert!((mid - dvec2(0.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn test_sample_count() {
        let c = QuadBezier::segment(dvec2(0.0, 0.0), dvec2(1.0, 0.0));
        assert_eq!(c.sample(16).len(), 17);
        assert_eq!(c.sample(4).len(), 5);
    }
}
