//! Fixed-topology vertex grid backing a warp surface.

use warp_math::{Point2, Point3};

/// A `(segments+1) x (segments+1)` vertex grid with standard UV
/// parameterization and a fixed triangle topology.
///
/// `u = i/segments` runs left to right, `v = j/segments` bottom to top,
/// so `v = 1` is the top edge. Positions start at zero and are filled in
/// by the owning surface; z stays 0 for the planar model.
#[derive(Debug, Clone)]
pub struct GridBuffer {
    segments: u32,
    pub positions: Vec<Point3>,
    pub uvs: Vec<Point2>,
    pub indices: Vec<u32>,
}

impl GridBuffer {
    pub fn new(segments: u32) -> Self {
        let side = segments + 1;
        let count = (side * side) as usize;

        let mut uvs = Vec::with_capacity(count);
        for j in 0..side {
            for i in 0..side {
                uvs.push(Point2::new(
                    i as f64 / segments as f64,
                    j as f64 / segments as f64,
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for j in 0..segments {
            for i in 0..segments {
                let a = j * side + i;
                let b = a + 1;
                let d = a + side;
                let c = d + 1;
                // CCW for +Z normals
                indices.extend_from_slice(&[a, b, c]);
                indices.extend_from_slice(&[a, c, d]);
            }
        }

        Self {
            segments,
            positions: vec![Point3::ZERO; count],
            uvs,
            indices,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as position triples, for ray picking.
    pub fn triangles(&self) -> impl Iterator<Item = (Point3, Point3, Point3)> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            (
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let grid = GridBuffer::new(4);
        assert_eq!(grid.vertex_count(), 25);
        assert_eq!(grid.uvs.len(), 25);
        assert_eq!(grid.triangle_count(), 32);
    }

    #[test]
    fn test_uv_range() {
        let grid = GridBuffer::new(8);
        assert_eq!(grid.uvs[0], Point2::new(0.0, 0.0));
        let last = *grid.uvs.last().unwrap();
        assert_eq!(last, Point2::new(1.0, 1.0));
        for uv in &grid.uvs {
            assert!((0.0..=1.0).contains(&uv.x));
            assert!((0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let grid = GridBuffer::new(5);
        let max = grid.vertex_count() as u32;
        assert!(grid.indices.iter().all(|&i| i < max));
    }
}
