//! The warpable quad surface.

use slotmap::new_key_type;
use warp_core::{PinId, Result, SurfaceId, WarpError};
use warp_math::{Point2, Point3};

use crate::bezier::QuadBezier;
use crate::grid::GridBuffer;
use crate::patch::{bilinear_point, coons_point, edge_curve, Edge};
use crate::pin::{apply_pins, influence_radius, Pin};

pub const MIN_SEGMENTS: u32 = 4;
pub const MAX_SEGMENTS: u32 = 64;
pub const DEFAULT_SEGMENTS: u32 = 32;

const DEFAULT_WIDTH: f64 = 1.0;
const DEFAULT_HEIGHT: f64 = 0.75;

/// Offset applied to a duplicated surface so it does not sit exactly on
/// top of its source.
const DUPLICATE_OFFSET: Point2 = Point2::new(0.05, -0.05);

/// Edge overlay resampling density.
const EDGE_SAMPLES_CURVED: usize = 16;
const EDGE_SAMPLES_STRAIGHT: usize = 4;

new_key_type! {
    /// Opaque handle into the scene's texture store. Shared between a
    /// surface and its duplicates; the geometry layer never dereferences it.
    pub struct TextureKey;
}

/// One warpable quad: four corners, optional curved-edge control points,
/// positional pins, and the grid buffer it owns.
///
/// Shape is recomputed in full after every control-point mutation; there
/// is no incremental update path. The model is planar: all geometry lives
/// in the z=0 plane and degenerate corner sets are allowed (they simply
/// produce a degenerate mesh).
#[derive(Debug, Clone)]
pub struct WarpSurface {
    id: SurfaceId,
    /// Ordered TL, TR, BR, BL.
    corners: [Point2; 4],
    segments: u32,
    bezier_enabled: bool,
    /// Top, Right, Bottom, Left. Null until bezier is first enabled;
    /// persists after it is disabled.
    edge_midpoints: [Option<Point2>; 4],
    pins: Vec<Pin>,
    texture: Option<TextureKey>,
    grid: GridBuffer,
}

impl WarpSurface {
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64, segments: u32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let corners = [
            Point2::new(center_x - hw, center_y + hh),
            Point2::new(center_x + hw, center_y + hh),
            Point2::new(center_x + hw, center_y - hh),
            Point2::new(center_x - hw, center_y - hh),
        ];
        let segments = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        let mut surface = Self {
            id: SurfaceId::new(),
            corners,
            segments,
            bezier_enabled: false,
            edge_midpoints: [None; 4],
            pins: Vec::new(),
            texture: None,
            grid: GridBuffer::new(segments),
        };
        surface.update_geometry();
        surface
    }

    /// Reconstitute a surface from persisted control state (codec path).
    pub fn restore(
        id: SurfaceId,
        corners: [Point2; 4],
        segments: u32,
        bezier_enabled: bool,
        edge_midpoints: [Option<Point2>; 4],
        pins: Vec<Pin>,
    ) -> Self {
        let segments = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        let mut surface = Self {
            id,
            corners,
            segments,
            bezier_enabled,
            edge_midpoints,
            pins,
            texture: None,
            grid: GridBuffer::new(segments),
        };
        surface.update_geometry();
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn corners(&self) -> &[Point2; 4] {
        &self.corners
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn bezier_enabled(&self) -> bool {
        self.bezier_enabled
    }

    pub fn edge_midpoints(&self) -> &[Option<Point2>; 4] {
        &self.edge_midpoints
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    pub fn grid(&self) -> &GridBuffer {
        &self.grid
    }

    pub fn texture(&self) -> Option<TextureKey> {
        self.texture
    }

    /// Whether a raster image is bound. Affects shading only, never geometry.
    pub fn textured(&self) -> bool {
        self.texture.is_some()
    }

    pub fn set_texture(&mut self, texture: Option<TextureKey>) {
        self.texture = texture;
    }

    /// Pass-1 position: Coons patch when bezier is enabled, bilinear
    /// otherwise.
    pub fn base_point(&self, u: f64, v: f64) -> Point2 {
        if self.bezier_enabled {
            coons_point(&self.corners, &self.edge_midpoints, u, v)
        } else {
            bilinear_point(&self.corners, u, v)
        }
    }

    /// Full two-pass evaluation at `(u, v)`: patch interpolation, then
    /// pin displacement against the current patch shape.
    pub fn point_at(&self, u: f64, v: f64) -> Point2 {
        let base = self.base_point(u, v);
        apply_pins(base, &self.pins, influence_radius(&self.corners))
    }

    /// Compute final per-vertex positions for the current grid. Pure with
    /// respect to the surface's control state.
    pub fn compute_shape(&self) -> Vec<Point2> {
        let radius = influence_radius(&self.corners);
        self.grid
            .uvs
            .iter()
            .map(|uv| {
                let base = self.base_point(uv.x, uv.y);
                apply_pins(base, &self.pins, radius)
            })
            .collect()
    }

    /// Write `compute_shape` output into the owned grid buffer.
    fn update_geometry(&mut self) {
        let shape = self.compute_shape();
        for (pos, p) in self.grid.positions.iter_mut().zip(shape) {
            *pos = Point3::new(p.x, p.y, 0.0);
        }
    }

    /// Move one corner (0 = TL, 1 = TR, 2 = BR, 3 = BL).
    pub fn set_corner(&mut self, index: usize, point: Point2) {
        debug_assert!(index < 4);
        self.corners[index] = point;
        self.update_geometry();
    }

    /// Move one edge's curve control point.
    pub fn set_edge_midpoint(&mut self, edge: Edge, point: Point2) {
        self.edge_midpoints[edge.index()] = Some(point);
        self.update_geometry();
    }

    /// Toggle curved edges. The first enable lazily creates the four
    /// midpoints at each edge's current linear midpoint; disabling keeps
    /// them, the flag only gates their influence.
    pub fn set_bezier_enabled(&mut self, enabled: bool) {
        if enabled && self.edge_midpoints.iter().all(Option::is_none) {
            for edge in Edge::ALL {
                let (s, e) = edge.corner_indices();
                self.edge_midpoints[edge.index()] =
                    Some((self.corners[s] + self.corners[e]) * 0.5);
            }
        }
        self.bezier_enabled = enabled;
        self.update_geometry();
    }

    /// Change grid resolution. Out-of-range values are clamped, the old
    /// grid is discarded, and the shape is recomputed from the existing
    /// corner/pin/bezier state.
    pub fn set_segments(&mut self, segments: u32) {
        let segments = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        if segments == self.segments {
            return;
        }
        self.segments = segments;
        self.grid = GridBuffer::new(segments);
        self.update_geometry();
    }

    /// Place a pin with zero initial displacement at `point`.
    pub fn add_pin(&mut self, point: Point2) -> PinId {
        let pin = Pin::at(point);
        let id = pin.id;
        self.pins.push(pin);
        self.update_geometry();
        id
    }

    /// Drag a pin's current position; its origin never moves.
    pub fn move_pin(&mut self, id: PinId, position: Point2) -> Result<()> {
        let pin = self
            .pins
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| WarpError::NotFound(format!("{id}")))?;
        pin.position = position;
        self.update_geometry();
        Ok(())
    }

    pub fn remove_pin(&mut self, id: PinId) -> Result<()> {
        let before = self.pins.len();
        self.pins.retain(|p| p.id != id);
        if self.pins.len() == before {
            return Err(WarpError::NotFound(format!("{id}")));
        }
        self.update_geometry();
        Ok(())
    }

    /// Resample one boundary curve for edge-line display: 16 samples when
    /// bezier is active, 4 straight segments otherwise.
    pub fn sample_edge(&self, edge: Edge) -> Vec<Point2> {
        if self.bezier_enabled {
            edge_curve(&self.corners, &self.edge_midpoints, edge).sample(EDGE_SAMPLES_CURVED)
        } else {
            let (s, e) = edge.corner_indices();
            QuadBezier::segment(self.corners[s], self.corners[e]).sample(EDGE_SAMPLES_STRAIGHT)
        }
    }

    /// Clone this surface with a fresh id and slightly offset controls.
    ///
    /// The texture handle is shared, not cloned. Pins are not carried
    /// over to the duplicate.
    pub fn duplicate(&self) -> WarpSurface {
        let corners = self.corners.map(|c| c + DUPLICATE_OFFSET);
        let edge_midpoints = self.edge_midpoints.map(|m| m.map(|p| p + DUPLICATE_OFFSET));
        let mut surface = Self {
            id: SurfaceId::new(),
            corners,
            segments: self.segments,
            bezier_enabled: self.bezier_enabled,
            edge_midpoints,
            pins: Vec::new(),
            texture: self.texture,
            grid: GridBuffer::new(self.segments),
        };
        surface.update_geometry();
        surface
    }
}

impl Default for WarpSurface {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SEGMENTS)
    }
}
