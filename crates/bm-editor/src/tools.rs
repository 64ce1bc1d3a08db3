//! Tool system for canvas interactions.
//!
//! The active [`ToolKind`] decides how a pointer-down is interpreted; the
//! resulting gesture lives in a single [`Interaction`] value until pointer-up
//! or cancellation. Completed gestures produce [`CanvasIntent`]s, which the
//! controller applies locally and queues for the annotation store.
//!
//! | Tool   | Pointer-down                          | Pointer-up                    |
//! |--------|---------------------------------------|-------------------------------|
//! | Select | handle → resize, body → drag, else hit-test | bbox update / click select |
//! | Draw   | inside image → start rect             | create if larger than 10 px   |
//! | Pan    | arm panning                           | disarm                        |

use bm_core::{
    Annotation, AnnotationId, AnnotationPatch, BoundingBox, CanvasConfig, LabelChoice, MIN_BOX_SIZE,
    Point, Rect, ResizeHandle, Size, rect_to_bbox, resize_rect,
};
use bm_render::{HANDLE_HIT_RADIUS_PX, HIT_MARGIN_PX, LivePreview, handle_at, hit_test};
use serde::Serialize;
use smallvec::SmallVec;

use crate::viewport::Viewport;

/// Screen-space movement below which a drag counts as a click.
pub const DRAG_SLOP_PX: f64 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Pan,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Draw => "draw",
            ToolKind::Pan => "pan",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ToolKind::Select),
            "draw" => Some(ToolKind::Draw),
            "pan" => Some(ToolKind::Pan),
            _ => None,
        }
    }
}

/// A change the canvas asks its host to carry out.
///
/// Geometry is always normalized; the host never sees image pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CanvasIntent {
    /// A new box was drawn. `id` is provisional until the store assigns one.
    Create {
        id: AnnotationId,
        label: String,
        class_id: u32,
        bbox: BoundingBox,
    },
    Update {
        id: AnnotationId,
        patch: AnnotationPatch,
    },
    Delete {
        id: AnnotationId,
    },
    Select {
        id: Option<AnnotationId>,
    },
    ConfigChanged {
        config: CanvasConfig,
    },
}

pub type Intents = SmallVec<[CanvasIntent; 2]>;

/// An in-flight resize of one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub id: AnnotationId,
    pub handle: ResizeHandle,
    pub start: Rect,
    pub current: Rect,
}

/// The gesture in progress. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Rubber-band rect of a new box, in image pixels.
    Drawing { anchor: Point, corner: Point },
    Dragging {
        id: AnnotationId,
        start: Rect,
        /// Image point grabbed at pointer-down.
        grab: Point,
        /// Screen point of pointer-down, for the click slop.
        press: Point,
        current: Rect,
        moved: bool,
    },
    Resizing(ResizeSession),
    /// Last screen position while panning.
    Panning { last: Point },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Drawing { .. } => "drawing",
            Interaction::Dragging { .. } => "dragging",
            Interaction::Resizing(_) => "resizing",
            Interaction::Panning { .. } => "panning",
        }
    }
}

/// What a tool may read (and, for panning, move) while handling a pointer event.
pub struct ToolContext<'a> {
    pub annotations: &'a [Annotation],
    pub viewport: &'a mut Viewport,
    pub selected: Option<AnnotationId>,
    pub active_label: &'a LabelChoice,
}

impl ToolContext<'_> {
    fn image(&self) -> Size {
        self.viewport.image().unwrap_or_default()
    }

    fn selected_rect(&self) -> Option<(AnnotationId, Rect)> {
        let id = self.selected?;
        let image = self.image();
        self.annotations
            .iter()
            .find(|a| a.id == id)
            .map(|a| (id, a.rect(image)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolState {
    kind: ToolKind,
    interaction: Interaction,
}

impl ToolState {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            interaction: Interaction::Idle,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Switch tools. Any gesture in progress is dropped.
    pub fn set_kind(&mut self, kind: ToolKind) {
        if !self.interaction.is_idle() {
            log::debug!("tool switch discards {}", self.interaction.name());
        }
        self.kind = kind;
        self.interaction = Interaction::Idle;
    }

    /// Drop the current gesture without committing it.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.interaction.is_idle();
        if was_active {
            log::debug!("cancel {}", self.interaction.name());
        }
        self.interaction = Interaction::Idle;
        was_active
    }

    /// The rubber-band rect of a box being drawn (not normalized).
    pub fn drawing_rect(&self) -> Option<Rect> {
        match self.interaction {
            Interaction::Drawing { anchor, corner } => Some(Rect::from_anchor(anchor, corner)),
            _ => None,
        }
    }

    /// Live geometry of a box being dragged or resized.
    pub fn preview(&self) -> Option<LivePreview> {
        match self.interaction {
            Interaction::Dragging { id, current, .. } => Some(LivePreview { id, rect: current }),
            Interaction::Resizing(session) => Some(LivePreview {
                id: session.id,
                rect: session.current,
            }),
            _ => None,
        }
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, screen: Point, ctx: &mut ToolContext<'_>) -> Intents {
        let mut intents = Intents::new();
        if !ctx.viewport.is_ready() {
            return intents;
        }
        let p = ctx.viewport.screen_to_image(screen);

        match self.kind {
            ToolKind::Select => {
                if let Some((id, rect)) = ctx.selected_rect() {
                    let radius = ctx.viewport.image_length(HANDLE_HIT_RADIUS_PX);
                    if let Some(handle) = handle_at(&rect, p, radius) {
                        log::debug!("resize {id:?} from {handle:?}");
                        self.interaction = Interaction::Resizing(ResizeSession {
                            id,
                            handle,
                            start: rect,
                            current: rect,
                        });
                        return intents;
                    }
                    if rect.contains(p) {
                        self.interaction = drag(id, rect, p, screen);
                        return intents;
                    }
                }
                let margin = ctx.viewport.image_length(HIT_MARGIN_PX);
                let hit = hit_test(ctx.annotations, ctx.image(), p, margin);
                if hit != ctx.selected {
                    intents.push(CanvasIntent::Select { id: hit });
                }
                if let Some(id) = hit
                    && let Some(rect) = annotation_rect(ctx, id)
                {
                    self.interaction = drag(id, rect, p, screen);
                }
            }
            ToolKind::Draw => {
                if ctx.image().contains(p) {
                    self.interaction = Interaction::Drawing {
                        anchor: p,
                        corner: p,
                    };
                }
            }
            ToolKind::Pan => {
                self.interaction = Interaction::Panning { last: screen };
            }
        }
        intents
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    /// Returns `true` when the scene needs repainting.
    pub fn pointer_move(&mut self, screen: Point, ctx: &mut ToolContext<'_>) -> bool {
        let p = ctx.viewport.screen_to_image(screen);
        let image = ctx.image();

        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Drawing { corner, .. } => {
                *corner = image.clamp_point(p);
                true
            }
            Interaction::Dragging {
                start,
                grab,
                press,
                current,
                moved,
                ..
            } => {
                if !*moved && press.distance_to(screen) > DRAG_SLOP_PX {
                    *moved = true;
                }
                if *moved {
                    *current = start.translated_within(p.x - grab.x, p.y - grab.y, image);
                }
                *moved
            }
            Interaction::Resizing(session) => {
                session.current =
                    resize_rect(&session.start, session.handle, p, image, MIN_BOX_SIZE);
                true
            }
            Interaction::Panning { last } => {
                ctx.viewport.pan_by(screen.x - last.x, screen.y - last.y);
                *last = screen;
                true
            }
        }
    }

    // ─── Pointer up ──────────────────────────────────────────────────────

    pub fn pointer_up(&mut self, screen: Point, ctx: &mut ToolContext<'_>) -> Intents {
        self.pointer_move(screen, ctx);
        let mut intents = Intents::new();
        let image = ctx.image();

        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::Panning { .. } => {}
            Interaction::Drawing { anchor, corner } => {
                let rect = Rect::from_anchor(anchor, corner);
                if rect.exceeds(MIN_BOX_SIZE) {
                    let bbox = rect_to_bbox(&rect.clamp_within(image), image);
                    let id = AnnotationId::provisional();
                    log::debug!("draw {id:?} {bbox:?}");
                    intents.push(CanvasIntent::Create {
                        id,
                        label: ctx.active_label.label.clone(),
                        class_id: ctx.active_label.class_id,
                        bbox,
                    });
                } else {
                    log::debug!("discard {}x{} box", rect.width.abs(), rect.height.abs());
                }
            }
            Interaction::Dragging {
                id,
                start,
                current,
                moved,
                ..
            } => {
                if !moved {
                    // A click: boxes nested inside the grabbed one stay reachable.
                    let p = ctx.viewport.screen_to_image(screen);
                    let margin = ctx.viewport.image_length(HIT_MARGIN_PX);
                    let hit = hit_test(ctx.annotations, image, p, margin);
                    if hit.is_some() && hit != Some(id) {
                        intents.push(CanvasIntent::Select { id: hit });
                    }
                } else if current != start {
                    log::debug!("move {id:?} to {current:?}");
                    intents.push(update_bbox(id, &current, image));
                }
            }
            Interaction::Resizing(session) => {
                if session.current != session.start {
                    log::debug!("resize {:?} to {:?}", session.id, session.current);
                    intents.push(update_bbox(session.id, &session.current, image));
                }
            }
        }
        intents
    }
}

fn drag(id: AnnotationId, rect: Rect, grab: Point, press: Point) -> Interaction {
    Interaction::Dragging {
        id,
        start: rect,
        grab,
        press,
        current: rect,
        moved: false,
    }
}

fn annotation_rect(ctx: &ToolContext<'_>, id: AnnotationId) -> Option<Rect> {
    let image = ctx.image();
    ctx.annotations.iter().find(|a| a.id == id).map(|a| a.rect(image))
}

fn update_bbox(id: AnnotationId, rect: &Rect, image: Size) -> CanvasIntent {
    CanvasIntent::Update {
        id,
        patch: AnnotationPatch::bbox(rect_to_bbox(rect, image)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const IMAGE: Size = Size::new(1000.0, 800.0);

    /// Viewport at 1:1 with the image at the origin, so screen = image.
    fn viewport() -> Viewport {
        let mut vp = Viewport::new(IMAGE);
        vp.set_image(Some(IMAGE));
        vp
    }

    fn ann(id: &str, rect: Rect) -> Annotation {
        let bbox = BoundingBox::from_rect(&rect, IMAGE);
        Annotation::new(AnnotationId::intern(id), "price", 1, bbox)
    }

    fn run(
        tool: &mut ToolState,
        annotations: &[Annotation],
        selected: Option<AnnotationId>,
        from: Point,
        to: Point,
    ) -> Intents {
        let mut vp = viewport();
        let label = LabelChoice::new("price", 1);
        let mut ctx = ToolContext {
            annotations,
            viewport: &mut vp,
            selected,
            active_label: &label,
        };
        let mut intents = tool.pointer_down(from, &mut ctx);
        tool.pointer_move(to, &mut ctx);
        intents.extend(tool.pointer_up(to, &mut ctx));
        intents
    }

    #[test]
    fn draw_creates_normalized_box() {
        let mut tool = ToolState::new(ToolKind::Draw);
        let intents = run(
            &mut tool,
            &[],
            None,
            Point::new(300.0, 250.0),
            Point::new(100.0, 100.0),
        );
        assert_eq!(intents.len(), 1);
        match &intents[0] {
            CanvasIntent::Create {
                id,
                label,
                class_id,
                bbox,
            } => {
                assert!(id.is_provisional());
                assert_eq!(label, "price");
                assert_eq!(*class_id, 1);
                assert!(
                    bbox.approx_eq(&BoundingBox::new(0.2, 0.21875, 0.2, 0.1875), 1e-9)
                );
            }
            other => panic!("expected Create, got {other:?}"),
        }
        assert!(tool.interaction().is_idle());
    }

    #[test]
    fn tiny_draw_is_discarded() {
        let mut tool = ToolState::new(ToolKind::Draw);
        let intents = run(
            &mut tool,
            &[],
            None,
            Point::new(100.0, 100.0),
            Point::new(105.0, 103.0),
        );
        assert!(intents.is_empty());
    }

    #[test]
    fn draw_outside_image_does_not_start() {
        let mut vp = Viewport::new(Size::new(1200.0, 800.0));
        vp.set_image(Some(IMAGE));
        let label = LabelChoice::default();
        let mut ctx = ToolContext {
            annotations: &[],
            viewport: &mut vp,
            selected: None,
            active_label: &label,
        };
        let mut tool = ToolState::new(ToolKind::Draw);
        // Image is centered at x ∈ [100, 1100].
        tool.pointer_down(Point::new(50.0, 100.0), &mut ctx);
        assert!(tool.interaction().is_idle());
    }

    #[test]
    fn drawing_corner_clamps_to_image() {
        let mut vp = viewport();
        let label = LabelChoice::default();
        let mut ctx = ToolContext {
            annotations: &[],
            viewport: &mut vp,
            selected: None,
            active_label: &label,
        };
        let mut tool = ToolState::new(ToolKind::Draw);
        tool.pointer_down(Point::new(900.0, 700.0), &mut ctx);
        tool.pointer_move(Point::new(1500.0, -50.0), &mut ctx);
        assert_eq!(
            tool.drawing_rect(),
            Some(Rect::new(900.0, 700.0, 100.0, -700.0))
        );
    }

    #[test]
    fn background_click_selects_smallest() {
        let anns = [
            ann("big", Rect::new(100.0, 100.0, 200.0, 100.0)),
            ann("small", Rect::new(120.0, 120.0, 100.0, 50.0)),
        ];
        let mut tool = ToolState::new(ToolKind::Select);
        let p = Point::new(150.0, 140.0);
        let intents = run(&mut tool, &anns, None, p, p);
        let id = Some(anns[1].id);
        assert_eq!(intents.as_slice(), &[CanvasIntent::Select { id }]);
    }

    #[test]
    fn click_inside_selected_reaches_nested_box() {
        let anns = [
            ann("big", Rect::new(100.0, 100.0, 400.0, 300.0)),
            ann("small", Rect::new(200.0, 200.0, 50.0, 50.0)),
        ];
        let mut tool = ToolState::new(ToolKind::Select);
        let p = Point::new(220.0, 220.0);
        let intents = run(&mut tool, &anns, Some(anns[0].id), p, p);
        let id = Some(anns[1].id);
        assert_eq!(intents.as_slice(), &[CanvasIntent::Select { id }]);
    }

    #[test]
    fn empty_click_deselects() {
        let anns = [ann("a", Rect::new(100.0, 100.0, 50.0, 50.0))];
        let mut tool = ToolState::new(ToolKind::Select);
        let p = Point::new(600.0, 600.0);
        let intents = run(&mut tool, &anns, Some(anns[0].id), p, p);
        assert_eq!(intents.as_slice(), &[CanvasIntent::Select { id: None }]);
    }

    #[test]
    fn drag_within_slop_is_a_click() {
        let anns = [ann("a", Rect::new(100.0, 100.0, 50.0, 50.0))];
        let mut tool = ToolState::new(ToolKind::Select);
        let intents = run(
            &mut tool,
            &anns,
            Some(anns[0].id),
            Point::new(120.0, 120.0),
            Point::new(122.0, 121.0),
        );
        assert!(intents.is_empty());
    }

    #[test]
    fn drag_clamps_to_image() {
        let anns = [ann("a", Rect::new(900.0, 100.0, 50.0, 50.0))];
        let mut tool = ToolState::new(ToolKind::Select);
        let intents = run(
            &mut tool,
            &anns,
            Some(anns[0].id),
            Point::new(920.0, 120.0),
            Point::new(1200.0, 70.0),
        );
        match &intents[0] {
            CanvasIntent::Update { id, patch } => {
                assert_eq!(*id, anns[0].id);
                let rect = patch.bbox.unwrap().to_rect(IMAGE);
                assert!((rect.x - 950.0).abs() < 1e-6);
                assert!((rect.y - 50.0).abs() < 1e-6);
                assert!((rect.width - 50.0).abs() < 1e-6);
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn resize_from_corner_handle() {
        let anns = [ann("a", Rect::new(100.0, 100.0, 200.0, 100.0))];
        let mut tool = ToolState::new(ToolKind::Select);
        let intents = run(
            &mut tool,
            &anns,
            Some(anns[0].id),
            Point::new(302.0, 201.0),
            Point::new(400.0, 300.0),
        );
        match &intents[0] {
            CanvasIntent::Update { patch, .. } => {
                let rect = patch.bbox.unwrap().to_rect(IMAGE);
                assert!((rect.width - 300.0).abs() < 1e-6);
                assert!((rect.height - 200.0).abs() < 1e-6);
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn pan_moves_viewport_by_raw_delta() {
        let mut vp = viewport();
        let label = LabelChoice::default();
        let mut ctx = ToolContext {
            annotations: &[],
            viewport: &mut vp,
            selected: None,
            active_label: &label,
        };
        let mut tool = ToolState::new(ToolKind::Pan);
        tool.pointer_down(Point::new(10.0, 10.0), &mut ctx);
        tool.pointer_move(Point::new(30.0, 5.0), &mut ctx);
        tool.pointer_up(Point::new(30.0, 5.0), &mut ctx);
        assert_eq!(vp.position(), Point::new(20.0, -5.0));
        assert!(tool.interaction().is_idle());
    }

    #[test]
    fn switching_tools_clears_gesture() {
        let mut vp = viewport();
        let label = LabelChoice::default();
        let mut ctx = ToolContext {
            annotations: &[],
            viewport: &mut vp,
            selected: None,
            active_label: &label,
        };
        let mut tool = ToolState::new(ToolKind::Draw);
        tool.pointer_down(Point::new(10.0, 10.0), &mut ctx);
        assert!(tool.drawing_rect().is_some());
        tool.set_kind(ToolKind::Select);
        assert!(tool.interaction().is_idle());
        assert_eq!(tool.drawing_rect(), None);
    }

    #[test]
    fn intents_serialize_tagged() {
        let intent = CanvasIntent::Delete {
            id: AnnotationId::intern("ann-3"),
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert_eq!(json, r#"{"type":"delete","id":"ann-3"}"#);
    }
}
