use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PIN_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of a warp surface.
///
/// Ids are process-unique. `restore` reconstitutes a persisted id and bumps
/// the generator past it so freshly minted ids never collide with loaded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn new() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn restore(raw: u64) -> Self {
        NEXT_SURFACE_ID.fetch_max(raw + 1, Ordering::Relaxed);
        Self(raw)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Opaque identifier of a pin within a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PinId(u64);

impl PinId {
    pub fn new() -> Self {
        Self(NEXT_PIN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let a = SurfaceId::new();
        let b = SurfaceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_restore_bumps_generator() {
        let loaded = SurfaceId::restore(1_000_000);
        let fresh = SurfaceId::new();
        assert!(fresh.value() > loaded.value());
    }
}
