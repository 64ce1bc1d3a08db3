//! Annotation store boundary.
//!
//! The store owns annotation identity and persistence. The canvas talks to
//! it only through this trait, after a gesture completes.

use crate::error::StoreError;
use crate::geometry::BoundingBox;
use crate::id::AnnotationId;
use crate::model::{Annotation, AnnotationPatch};
use std::collections::HashMap;

pub trait AnnotationStore {
    /// All annotations of an image, in draw order.
    fn list(&self, image_id: &str) -> Result<Vec<Annotation>, StoreError>;

    /// Persist a new annotation; the store assigns its ID.
    fn create(
        &mut self,
        image_id: &str,
        label: &str,
        class_id: u32,
        bbox: BoundingBox,
    ) -> Result<Annotation, StoreError>;

    fn update(
        &mut self,
        image_id: &str,
        id: AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<Annotation, StoreError>;

    fn delete(&mut self, image_id: &str, id: AnnotationId) -> Result<(), StoreError>;
}

/// In-process store keyed by image ID.
///
/// Applies the same validation as the server: non-empty labels and boxes
/// inside the unit square.
#[derive(Debug, Default)]
pub struct MemoryStore {
    images: HashMap<String, Vec<Annotation>>,
    next_id: u64,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image with no annotations.
    pub fn add_image(&mut self, image_id: impl Into<String>) {
        self.images.entry(image_id.into()).or_default();
    }

    /// While offline every call fails with [`StoreError::Rejected`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Rejected("store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn image_mut(&mut self, image_id: &str) -> Result<&mut Vec<Annotation>, StoreError> {
        self.images
            .get_mut(image_id)
            .ok_or_else(|| StoreError::ImageNotFound {
                image_id: image_id.to_string(),
            })
    }
}

fn validate_bbox(bbox: &BoundingBox) -> Result<(), StoreError> {
    if bbox.is_within_unit() {
        Ok(())
    } else {
        Err(StoreError::invalid(format!("bbox outside image: {bbox:?}")))
    }
}

impl AnnotationStore for MemoryStore {
    fn list(&self, image_id: &str) -> Result<Vec<Annotation>, StoreError> {
        self.check_online()?;
        self.images
            .get(image_id)
            .cloned()
            .ok_or_else(|| StoreError::ImageNotFound {
                image_id: image_id.to_string(),
            })
    }

    fn create(
        &mut self,
        image_id: &str,
        label: &str,
        class_id: u32,
        bbox: BoundingBox,
    ) -> Result<Annotation, StoreError> {
        self.check_online()?;
        if label.trim().is_empty() {
            return Err(StoreError::invalid("label must not be empty"));
        }
        validate_bbox(&bbox)?;
        self.next_id += 1;
        let id = AnnotationId::intern(&format!("ann-{}", self.next_id));
        let annotation = Annotation::new(id, label, class_id, bbox);
        self.image_mut(image_id)?.push(annotation.clone());
        Ok(annotation)
    }

    fn update(
        &mut self,
        image_id: &str,
        id: AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<Annotation, StoreError> {
        self.check_online()?;
        if let Some(bbox) = &patch.bbox {
            validate_bbox(bbox)?;
        }
        if patch.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(StoreError::invalid("label must not be empty"));
        }
        let annotation = self
            .image_mut(image_id)?
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::AnnotationNotFound { id })?;
        annotation.apply(patch);
        Ok(annotation.clone())
    }

    fn delete(&mut self, image_id: &str, id: AnnotationId) -> Result<(), StoreError> {
        self.check_online()?;
        let annotations = self.image_mut(image_id)?;
        let before = annotations.len();
        annotations.retain(|a| a.id != id);
        if annotations.len() == before {
            return Err(StoreError::AnnotationNotFound { id });
        }
        Ok(())
    }
}
