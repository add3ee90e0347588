//! Editor layer: owns the surface collection, drives picking and
//! dragging from pointer input, and round-trips the collection through
//! the serialization codec.

pub mod codec;
pub mod events;
pub mod manager;

pub use codec::{PinRecord, SurfaceRecord};
pub use events::EditorEvent;
pub use manager::{Key, SurfaceManager};
