//! Annotation render model.
//!
//! Derives everything a painter needs from the stored normalized boxes plus
//! the live gesture state: screen rects and outline colors, the selection
//! halo and handles, and the rect being drawn. Building a scene is
//! a pure function; painters never look at annotations directly.

use crate::style::{
    HALO_DASH_PX, HALO_OFFSET_PX, SELECTED_STROKE_WIDTH_PX, STROKE_WIDTH_PX, box_color,
    contrasting_ink,
};
use bm_core::{
    Annotation, AnnotationId, CanvasConfig, Color, LabelChoice, LuminanceMap, Point, Rect,
    ResizeHandle, Size,
};
use smallvec::SmallVec;

/// Drawn radius of a resize handle, in screen pixels.
pub const HANDLE_RADIUS_PX: f64 = 5.0;

/// Image → screen mapping: `screen = image · scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    pub scale: f64,
    pub offset: Point,
}

impl ScreenMapping {
    pub fn point(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }

    pub fn rect(&self, r: &Rect) -> Rect {
        let r = r.normalized();
        let origin = self.point(Point::new(r.x, r.y));
        Rect::new(
            origin.x,
            origin.y,
            r.width * self.scale,
            r.height * self.scale,
        )
    }

    /// Convert a screen-space length to image space; zero when unscaled.
    pub fn image_length(&self, screen_px: f64) -> f64 {
        if self.scale > 0.0 { screen_px / self.scale } else { 0.0 }
    }
}

/// Dashed double outline around the selected box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halo {
    /// Halo rect in screen space.
    pub screen: Rect,
    pub primary: Color,
    pub secondary: Color,
    pub dash: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxVisual {
    pub id: AnnotationId,
    pub label: String,
    pub class_id: u32,
    /// Image-space rect (live gesture rect when one is in flight).
    pub rect: Rect,
    pub screen: Rect,
    pub color: Color,
    pub selected: bool,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    pub halo: Option<Halo>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleVisual {
    pub handle: ResizeHandle,
    /// Image-space center.
    pub center: Point,
    /// Image-space radius: constant on screen at any zoom.
    pub radius: f64,
    pub screen_center: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingVisual {
    /// Normalized image-space rect.
    pub rect: Rect,
    pub screen: Rect,
    pub color: Color,
}

/// A box whose geometry is being changed by a drag or resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePreview {
    pub id: AnnotationId,
    pub rect: Rect,
}

/// Everything `build_scene` reads.
pub struct SceneInput<'a> {
    pub annotations: &'a [Annotation],
    pub image: Size,
    pub mapping: ScreenMapping,
    pub selected: Option<AnnotationId>,
    /// Handles are shown only in select mode.
    pub show_handles: bool,
    pub preview: Option<LivePreview>,
    pub drawing: Option<Rect>,
    pub active_label: &'a LabelChoice,
    pub config: &'a CanvasConfig,
    pub luminance: Option<&'a LuminanceMap>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Boxes in draw order; the selected box is moved last so it paints on top.
    pub boxes: Vec<BoxVisual>,
    pub handles: SmallVec<[HandleVisual; 8]>,
    pub drawing: Option<DrawingVisual>,
}

impl Scene {
    pub fn selected(&self) -> Option<&BoxVisual> {
        self.boxes.iter().find(|b| b.selected)
    }
}

pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let mut scene = Scene::default();
    if input.image.is_empty() {
        return scene;
    }

    let mut selected_box = None;
    for annotation in input.annotations {
        let rect = match input.preview {
            Some(p) if p.id == annotation.id => p.rect.normalized(),
            _ => annotation.rect(input.image),
        };
        let visual = box_visual(input, annotation, rect);
        if visual.selected {
            selected_box = Some(visual);
        } else {
            scene.boxes.push(visual);
        }
    }

    if let Some(selected) = selected_box {
        if input.show_handles {
            scene.handles = handle_visuals(&selected.rect, input.mapping);
        }
        scene.boxes.push(selected);
    }

    if let Some(drawing) = input.drawing {
        let rect = drawing.normalized();
        scene.drawing = Some(DrawingVisual {
            rect,
            screen: input.mapping.rect(&rect),
            color: box_color(
                &input.active_label.label,
                &rect,
                input.config,
                input.luminance,
            ),
        });
    }

    log::trace!(
        "scene: {} boxes, {} handles, drawing={}",
        scene.boxes.len(),
        scene.handles.len(),
        scene.drawing.is_some()
    );
    scene
}

fn box_visual(input: &SceneInput<'_>, annotation: &Annotation, rect: Rect) -> BoxVisual {
    let selected = input.selected == Some(annotation.id);
    let color = box_color(&annotation.label, &rect, input.config, input.luminance);
    let screen = input.mapping.rect(&rect);
    let halo = selected.then(|| Halo {
        screen: screen.expanded(HALO_OFFSET_PX),
        primary: color,
        secondary: contrasting_ink(color),
        dash: HALO_DASH_PX,
    });
    BoxVisual {
        id: annotation.id,
        label: annotation.label.clone(),
        class_id: annotation.class_id,
        rect,
        screen,
        color,
        selected,
        stroke_width: if selected {
            SELECTED_STROKE_WIDTH_PX
        } else {
            STROKE_WIDTH_PX
        },
        halo,
    }
}

/// The eight handles of `rect`, sized independent of zoom.
pub fn handle_visuals(rect: &Rect, mapping: ScreenMapping) -> SmallVec<[HandleVisual; 8]> {
    let radius = mapping.image_length(HANDLE_RADIUS_PX);
    ResizeHandle::ALL
        .iter()
        .map(|&handle| {
            let center = handle.anchor(rect);
            HandleVisual {
                handle,
                center,
                radius,
                screen_center: mapping.point(center),
            }
        })
        .collect()
}
