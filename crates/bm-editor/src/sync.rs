//! Sync engine: canvas intents → annotation store.
//!
//! The canvas updates its own state optimistically and never waits for the
//! store. The sync engine is the other half of that contract:
//!
//! - **Store → Canvas**: `load` replaces the controller's annotations with
//!   the store's list for the current image.
//! - **Canvas → Store**: `flush` drains the controller's intent queue and
//!   forwards each create/update/delete. Created boxes carry a provisional
//!   ID; once the store assigns the real one, the controller is told to
//!   rename, and later intents still naming the provisional ID are mapped.
//!
//! Failures are reported, not retried. The caller decides whether to
//! `load` again to drop the optimistic state.

use bm_core::{AnnotationId, AnnotationStore, StoreError};
use std::collections::HashMap;

use crate::controller::CanvasController;
use crate::tools::CanvasIntent;

/// Outcome of one [`SyncEngine::flush`].
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Store calls that succeeded.
    pub applied: usize,
    pub errors: Vec<StoreError>,
    /// Intents the store does not handle (selection, config), in order.
    pub forwarded: Vec<CanvasIntent>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct SyncEngine<S> {
    store: S,
    image_id: String,
    /// Provisional ID → store-assigned ID.
    aliases: HashMap<AnnotationId, AnnotationId>,
}

impl<S: AnnotationStore> SyncEngine<S> {
    pub fn new(store: S, image_id: impl Into<String>) -> Self {
        Self {
            store,
            image_id: image_id.into(),
            aliases: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Point the engine at another image. Call `load` afterwards.
    pub fn set_image(&mut self, image_id: impl Into<String>) {
        self.image_id = image_id.into();
        self.aliases.clear();
    }

    /// Replace the controller's annotations with the store's list.
    pub fn load(&mut self, controller: &mut CanvasController) -> Result<usize, StoreError> {
        let annotations = self.store.list(&self.image_id)?;
        let count = annotations.len();
        log::debug!("loaded {count} annotations for {}", self.image_id);
        controller.set_annotations(annotations);
        Ok(count)
    }

    /// Send every queued intent to the store.
    pub fn flush(&mut self, controller: &mut CanvasController) -> FlushReport {
        let mut report = FlushReport::default();
        for intent in controller.take_intents() {
            let result = match intent {
                CanvasIntent::Create {
                    id,
                    label,
                    class_id,
                    bbox,
                } => self
                    .store
                    .create(&self.image_id, &label, class_id, bbox)
                    .map(|created| {
                        log::debug!("store assigned {:?} to {id:?}", created.id);
                        self.aliases.insert(id, created.id);
                        controller.replace_annotation_id(id, created.id);
                    }),
                CanvasIntent::Update { id, patch } => {
                    let id = self.resolve(id);
                    self.store.update(&self.image_id, id, &patch).map(drop)
                }
                CanvasIntent::Delete { id } => {
                    let id = self.resolve(id);
                    self.store.delete(&self.image_id, id)
                }
                other => {
                    report.forwarded.push(other);
                    continue;
                }
            };
            match result {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    log::warn!("store sync failed for {}: {err}", self.image_id);
                    report.errors.push(err);
                }
            }
        }
        report
    }

    fn resolve(&self, id: AnnotationId) -> AnnotationId {
        self.aliases.get(&id).copied().unwrap_or(id)
    }
}
