//! Scene-side collaborators of the warp engine: the picking camera, the
//! shared texture store, and per-surface render overlays the external
//! renderer reads between mutations.

pub mod camera;
pub mod scene;
pub mod texture;

pub use camera::Camera;
pub use scene::{Scene, SurfaceAttachment};
pub use texture::{TextureImage, TextureStore};
