use warp_core::SurfaceId;

/// Change notifications for UI mirroring, drained by the host.
///
/// Selection changes are always followed by the new selection's segment
/// count and bezier flag (or the defaults when selection was cleared) so
/// per-surface controls can update without querying back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    SelectionChanged(Option<SurfaceId>),
    SurfaceCountChanged(usize),
    SegmentsChanged(u32),
    BezierChanged(bool),
}
