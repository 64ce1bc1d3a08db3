//! Error types at the canvas boundaries.

use crate::id::AnnotationId;
use thiserror::Error;

/// Failures reported by an [`AnnotationStore`](crate::store::AnnotationStore).
///
/// The canvas never retries these; whoever drives the store surfaces them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("image not found: {image_id}")]
    ImageNotFound { image_id: String },

    #[error("annotation not found: {id}")]
    AnnotationNotFound { id: AnnotationId },

    #[error("invalid annotation: {message}")]
    Invalid { message: String },

    /// Transport or backend failure (network error, HTTP status, ...).
    #[error("store rejected the request: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Failures while turning an image source into pixels.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
