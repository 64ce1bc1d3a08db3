pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod id;
pub mod image_source;
pub mod luminance;
pub mod model;
pub mod store;

pub use color::Color;
pub use config::{CanvasConfig, ColorMode, CrosshairConfig};
pub use error::{ImageError, StoreError};
pub use geometry::{BoundingBox, MIN_BOX_SIZE, Point, Rect, Size, bbox_to_rect, rect_to_bbox};
pub use handles::{ResizeAxis, ResizeHandle, resize_rect};
pub use id::AnnotationId;
pub use image_source::DecodedImage;
pub use luminance::LuminanceMap;
pub use model::{Annotation, AnnotationPatch, ImageInfo, LabelChoice};
pub use store::{AnnotationStore, MemoryStore};
