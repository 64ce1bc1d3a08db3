//! Hit testing: point → annotation / resize handle lookup.
//!
//! All inputs are image-space. Callers convert their screen-space radii by
//! dividing by the current viewport scale, so hit areas feel the same at
//! every zoom level.

use bm_core::{Annotation, AnnotationId, Point, Rect, ResizeHandle, Size};

/// Screen-space margin added around boxes for selection clicks.
pub const HIT_MARGIN_PX: f64 = 4.0;
/// Screen-space pick radius around each resize handle.
pub const HANDLE_HIT_RADIUS_PX: f64 = 10.0;

/// Find the annotation to select at image point `p`.
///
/// Candidates are boxes whose rect grown by `margin` contains `p`. The
/// smallest-area candidate wins so nested boxes stay selectable; equal areas
/// go to the most recently drawn one (highest index).
pub fn hit_test(
    annotations: &[Annotation],
    image: Size,
    p: Point,
    margin: f64,
) -> Option<AnnotationId> {
    let mut best: Option<(f64, AnnotationId)> = None;
    for annotation in annotations {
        let rect = annotation.rect(image);
        if !rect.expanded(margin).contains(p) {
            continue;
        }
        let area = rect.area();
        match best {
            Some((best_area, _)) if area > best_area => {}
            _ => best = Some((area, annotation.id)),
        }
    }
    best.map(|(_, id)| id)
}

/// Find the handle of `rect` nearest to `p`, if any lies within `radius`.
pub fn handle_at(rect: &Rect, p: Point, radius: f64) -> Option<ResizeHandle> {
    let mut best: Option<(f64, ResizeHandle)> = None;
    for handle in ResizeHandle::ALL {
        let d = handle.anchor(rect).distance_to(p);
        if d > radius {
            continue;
        }
        if best.is_none_or(|(best_d, _)| d < best_d) {
            best = Some((d, handle));
        }
    }
    best.map(|(_, handle)| handle)
}
