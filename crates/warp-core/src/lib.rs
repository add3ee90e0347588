pub mod error;
pub mod id;

pub use error::{Result, WarpError};
pub use id::{PinId, SurfaceId};
