//! Shared texture storage.
//!
//! Decoded images live in an arena keyed by [`TextureKey`]; surfaces hold
//! copyable keys, so a duplicated surface shares its source's image
//! without cloning pixel data. Image decode itself happens outside the
//! engine; the store only keeps the decoded bytes alive.

use slotmap::SlotMap;
use warp_geometry::TextureKey;

/// A decoded RGBA8 raster image.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Arena of decoded images shared across surfaces.
#[derive(Debug, Default)]
pub struct TextureStore {
    images: SlotMap<TextureKey, TextureImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: TextureImage) -> TextureKey {
        self.images.insert(image)
    }

    pub fn get(&self, key: TextureKey) -> Option<&TextureImage> {
        self.images.get(key)
    }

    pub fn remove(&mut self, key: TextureKey) -> Option<TextureImage> {
        self.images.remove(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
