//! Decoded images

use crate::utils::{RenderError, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BITMAP_ID: AtomicU64 = AtomicU64::new(1);

/// An RGBA image ready to be drawn
#[derive(Clone, PartialEq)]
pub struct Bitmap {
    id: u64,
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap unmultiplied RGBA pixels (`width * height * 4` bytes)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            id: NEXT_BITMAP_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// Process-unique identity, stable across clones
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Image decoding collaborator
pub trait ImageDecoder {
    /// Decode fetched bytes into a bitmap
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap>;
}

/// Decoder backed by the `image` crate (PNG, JPEG, GIF, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| RenderError::ImageDecode(e.to_string()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Bitmap::from_rgba(width, height, rgba.into_raw()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a solid-colour PNG for tests
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let bitmap = RasterDecoder.decode(&png_bytes(4, 2)).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (4, 2));
        assert_eq!(bitmap.pixels().len(), 4 * 2 * 4);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = RasterDecoder.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(
            err,
            crate::WispError::Render(RenderError::ImageDecode(_))
        ));
    }

    #[test]
    fn test_ids_are_unique_and_survive_clone() {
        let a = Bitmap::from_rgba(1, 1, vec![0; 4]);
        let b = Bitmap::from_rgba(1, 1, vec![0; 4]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
