//! Annotation data model.
//!
//! Mirrors the annotation store's records. The canvas reads these and asks
//! the store for changes; it never owns annotation identity.

use crate::geometry::{BoundingBox, Rect, Size};
use crate::id::AnnotationId;
use serde::{Deserialize, Serialize};

/// A labeled bounding box on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub label: String,
    pub class_id: u32,
    pub bbox: BoundingBox,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        label: impl Into<String>,
        class_id: u32,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            class_id,
            bbox,
        }
    }

    /// The annotation's rect in image pixels.
    pub fn rect(&self, image: Size) -> Rect {
        self.bbox.to_rect(image)
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &AnnotationPatch) {
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(class_id) = patch.class_id {
            self.class_id = class_id;
        }
        if let Some(bbox) = patch.bbox {
            self.bbox = bbox.clamped();
        }
    }
}

/// Partial update for an annotation; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl AnnotationPatch {
    pub fn bbox(bbox: BoundingBox) -> Self {
        Self {
            bbox: Some(bbox),
            ..Self::default()
        }
    }}

/// The label newly drawn boxes receive. `class_id` is the label's index in
/// the project's ordered label list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelChoice {
    pub label: String,
    pub class_id: u32,
}

impl LabelChoice {
    pub fn new(label: impl Into<String>, class_id: u32) -> Self {
        Self {
            label: label.into(),
            class_id,
        }
    }

    /// Pick the `index`-th entry of an ordered label list.
    pub fn from_list(labels: &[String], index: usize) -> Option<Self> {
        labels
            .get(index)
            .map(|label| Self::new(label.clone(), index as u32))
    }
}

impl Default for LabelChoice {
    fn default() -> Self {
        Self::new("object", 0)
    }
}

/// Pixel dimensions of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}
