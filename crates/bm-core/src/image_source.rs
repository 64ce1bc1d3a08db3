//! Decoded image source.
//!
//! The host hands the canvas either encoded bytes (native) or an RGBA pixel
//! buffer read back from the browser. Either way the canvas only needs the
//! pixel dimensions and, for `auto` color mode, the pixels themselves.

use crate::error::ImageError;
use crate::model::ImageInfo;

/// An image decoded to 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub info: ImageInfo,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decode PNG / JPEG / WebP bytes.
    ///
    /// # Errors
    /// Returns [`ImageError::Decode`] for unreadable data and
    /// [`ImageError::Empty`] for zero-sized images.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded image {width}x{height}");
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Wrap an existing RGBA buffer, validating its length.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ImageError> {
        check_rgba(width, height, &rgba)?;
        Ok(Self {
            info: ImageInfo { width, height },
            rgba,
        })
    }
}

/// Validate that `pixels` is a non-empty `width × height` RGBA buffer.
pub fn check_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Empty { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(ImageError::BufferSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
