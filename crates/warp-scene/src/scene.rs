//! Per-surface render attachments.
//!
//! Every surface in the scene owns one attachment: the overlay geometry
//! (corner/midpoint handles, pin markers, edge polylines) the external
//! renderer draws on top of the surface mesh. Attachments are created on
//! attach, refreshed after every mutation, and torn down on detach, so a
//! deleted surface can never leave a dangling overlay behind.

use std::collections::HashMap;

use log::debug;
use warp_core::SurfaceId;
use warp_geometry::{Edge, WarpSurface};
use warp_math::{Point2, Point3};

/// Handle disc radius in world units, shared by pick tests.
pub const HANDLE_RADIUS: f64 = 0.035;
/// Pin marker radius in world units.
pub const PIN_RADIUS: f64 = 0.03;

// Overlays draw slightly in front of the mesh.
const EDGE_Z: f64 = 0.01;
const PIN_Z: f64 = 0.01;
const HANDLE_Z: f64 = 0.02;

/// Overlay geometry for one surface.
#[derive(Debug, Clone)]
pub struct SurfaceAttachment {
    pub corner_handles: [Point3; 4],
    /// One handle per edge, present once the surface's midpoints exist.
    pub midpoint_handles: [Option<Point3>; 4],
    pub pin_markers: Vec<Point3>,
    /// Edge polylines in draw order: top, right, bottom, left.
    pub edge_lines: [Vec<Point3>; 4],
    pub selected: bool,
    pub handles_visible: bool,
}

impl SurfaceAttachment {
    fn from_surface(surface: &WarpSurface, selected: bool, handles_visible: bool) -> Self {
        let lift = |p: Point2, z: f64| Point3::new(p.x, p.y, z);

        let corner_handles =
            std::array::from_fn(|i| lift(surface.corners()[i], HANDLE_Z));
        let midpoint_handles =
            std::array::from_fn(|i| surface.edge_midpoints()[i].map(|p| lift(p, HANDLE_Z)));
        let pin_markers = surface
            .pins()
            .iter()
            .map(|pin| lift(pin.position, PIN_Z))
            .collect();
        let edge_lines = Edge::ALL.map(|edge| {
            surface
                .sample_edge(edge)
                .into_iter()
                .map(|p| lift(p, EDGE_Z))
                .collect()
        });

        Self {
            corner_handles,
            midpoint_handles,
            pin_markers,
            edge_lines,
            selected,
            handles_visible,
        }
    }
}

/// The set of live attachments, keyed by surface id.
#[derive(Debug, Default)]
pub struct Scene {
    attachments: HashMap<SurfaceId, SurfaceAttachment>,
    handles_visible: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            attachments: HashMap::new(),
            handles_visible: true,
        }
    }

    pub fn handles_visible(&self) -> bool {
        self.handles_visible
    }

    /// Create the attachment for a newly added surface.
    pub fn attach(&mut self, surface: &WarpSurface) {
        debug!("attaching {} to scene", surface.id());
        self.attachments.insert(
            surface.id(),
            SurfaceAttachment::from_surface(surface, false, self.handles_visible),
        );
    }

    /// Refresh a surface's overlay after a control mutation.
    pub fn sync(&mut self, surface: &WarpSurface) {
        if let Some(existing) = self.attachments.get(&surface.id()) {
            let (selected, visible) = (existing.selected, existing.handles_visible);
            self.attachments.insert(
                surface.id(),
                SurfaceAttachment::from_surface(surface, selected, visible),
            );
        }
    }

    /// Tear down a deleted surface's overlay.
    pub fn detach(&mut self, id: SurfaceId) {
        debug!("detaching {id} from scene");
        self.attachments.remove(&id);
    }

    pub fn attachment(&self, id: SurfaceId) -> Option<&SurfaceAttachment> {
        self.attachments.get(&id)
    }

    pub fn set_selected(&mut self, id: SurfaceId, selected: bool) {
        if let Some(attachment) = self.attachments.get_mut(&id) {
            attachment.selected = selected;
        }
    }

    pub fn set_handles_visible(&mut self, visible: bool) {
        self.handles_visible = visible;
        for attachment in self.attachments.values_mut() {
            attachment.handles_visible = visible;
        }
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn clear(&mut self) {
        self.attachments.clear();
    }
}
