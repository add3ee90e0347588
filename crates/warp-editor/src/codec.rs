//! Lossless round-trip of the surface collection's control-point state.
//!
//! Records carry control points only: corners, segments, the bezier flag,
//! edge midpoints, and pins. Vertex buffers are derived state and texture
//! bindings are deliberately excluded — images are large out-of-band
//! assets handled by the surrounding application.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use warp_core::{Result, SurfaceId, WarpError};
use warp_geometry::{Pin, WarpSurface};
use warp_math::Point2;

use crate::events::EditorEvent;
use crate::manager::SurfaceManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinRecord {
    pub id: u64,
    pub origin: [f64; 2],
    pub position: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub id: u64,
    /// TL, TR, BR, BL.
    pub corners: [[f64; 2]; 4],
    pub segments: u32,
    pub bezier_enabled: bool,
    /// Top, Right, Bottom, Left; null until bezier was first enabled.
    pub edge_midpoints: [Option<[f64; 2]>; 4],
    pub pins: Vec<PinRecord>,
}

fn pack(p: Point2) -> [f64; 2] {
    [p.x, p.y]
}

fn unpack(p: [f64; 2]) -> Point2 {
    Point2::new(p[0], p[1])
}

impl SurfaceRecord {
    pub fn from_surface(surface: &WarpSurface) -> Self {
        Self {
            id: surface.id().value(),
            corners: surface.corners().map(pack),
            segments: surface.segments(),
            bezier_enabled: surface.bezier_enabled(),
            edge_midpoints: surface.edge_midpoints().map(|m| m.map(pack)),
            pins: surface
                .pins()
                .iter()
                .map(|pin| PinRecord {
                    id: pin.id.value(),
                    origin: pack(pin.origin),
                    position: pack(pin.position),
                })
                .collect(),
        }
    }

    /// Rebuild a surface from this record. The surface id is restored;
    /// pin ids are regenerated (only top-level ids survive a round trip).
    /// Out-of-range segment counts are clamped rather than rejected.
    pub fn into_surface(self) -> WarpSurface {
        let pins = self
            .pins
            .into_iter()
            .map(|record| {
                let mut pin = Pin::at(unpack(record.origin));
                pin.position = unpack(record.position);
                pin
            })
            .collect();
        WarpSurface::restore(
            SurfaceId::restore(self.id),
            self.corners.map(unpack),
            self.segments,
            self.bezier_enabled,
            self.edge_midpoints.map(|m| m.map(unpack)),
            pins,
        )
    }
}

/// Snapshot the collection as an ordered record list.
pub fn serialize(manager: &SurfaceManager) -> Vec<SurfaceRecord> {
    manager
        .surfaces()
        .iter()
        .map(SurfaceRecord::from_surface)
        .collect()
}

/// Replace the collection with the recorded surfaces, attach them to the
/// scene, and select the first one if any exist.
pub fn deserialize(manager: &mut SurfaceManager, records: Vec<SurfaceRecord>) {
    manager.clear_all();
    let count = records.len();
    for record in records {
        debug!("restoring surface#{}", record.id);
        manager.insert_restored(record.into_surface());
    }
    let first = manager.surfaces().first().map(|s| s.id());
    manager.select(first);
    manager.push_event(EditorEvent::SurfaceCountChanged(count));
    info!("restored {count} surfaces");
}

/// Serialize the collection to a JSON document.
pub fn to_json(manager: &SurfaceManager) -> Result<String> {
    serde_json::to_string(&serialize(manager)).map_err(|e| WarpError::Codec(e.to_string()))
}

/// Load the collection from a JSON document. Malformed input is rejected
/// as a whole; no partially-initialized surface is ever added.
pub fn from_json(manager: &mut SurfaceManager, json: &str) -> Result<()> {
    let records: Vec<SurfaceRecord> =
        serde_json::from_str(json).map_err(|e| WarpError::Codec(e.to_string()))?;
    deserialize(manager, records);
    Ok(())
}
