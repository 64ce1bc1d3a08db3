//! Interaction controller.
//!
//! `CanvasController` is the only consumer of raw input. It owns the
//! viewport, the tool state machine, the optimistic local copy of the
//! annotations, selection, labels, display config, the luminance map and
//! the auto-pan task. Every completed gesture becomes a [`CanvasIntent`]:
//! it is applied to local state immediately and queued for the host, which
//! drains the queue with [`CanvasController::take_intents`].

use bm_core::config::CROSSHAIR_ARM_STEP;
use bm_core::{
    Annotation, AnnotationId, CanvasConfig, ColorMode, CrosshairConfig, DecodedImage, ImageError,
    LabelChoice, LuminanceMap, Point, Size,
};
use bm_render::{HANDLE_HIT_RADIUS_PX, Scene, SceneInput, build_scene, handle_at};

use crate::autopan::{AutoPan, AutoPanHandle, edge_pan_vector};
use crate::cursor::{CursorStyle, Hover, cursor_for};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{CanvasIntent, Interaction, Intents, ToolContext, ToolKind, ToolState};
use crate::viewport::Viewport;

/// Where and how to draw the draw-mode crosshair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crosshair {
    /// Screen position of the pointer.
    pub at: Point,
    pub config: CrosshairConfig,
}

pub struct CanvasController {
    viewport: Viewport,
    tool: ToolState,
    annotations: Vec<Annotation>,
    selected: Option<AnnotationId>,
    labels: Vec<String>,
    active_label: LabelChoice,
    config: CanvasConfig,
    luminance: Option<LuminanceMap>,
    auto_pan: AutoPan,
    /// Auto-pan run the host has not picked up yet.
    auto_pan_request: Option<AutoPanHandle>,
    /// Last known pointer position, screen space.
    pointer: Option<Point>,
    cursor: CursorStyle,
    intents: Vec<CanvasIntent>,
}

impl CanvasController {
    pub fn new(container: Size) -> Self {
        Self {
            viewport: Viewport::new(container),
            tool: ToolState::default(),
            annotations: Vec::new(),
            selected: None,
            labels: Vec::new(),
            active_label: LabelChoice::default(),
            config: CanvasConfig::default(),
            luminance: None,
            auto_pan: AutoPan::new(),
            auto_pan_request: None,
            pointer: None,
            cursor: CursorStyle::Default,
            intents: Vec::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn interaction(&self) -> &Interaction {
        self.tool.interaction()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn active_label(&self) -> &LabelChoice {
        &self.active_label
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn has_image(&self) -> bool {
        self.viewport.image().is_some()
    }

    pub fn is_auto_panning(&self) -> bool {
        self.auto_pan.is_active()
    }

    /// Crosshair overlay, shown in draw mode while the pointer is over the canvas.
    pub fn crosshair(&self) -> Option<Crosshair> {
        if self.tool.kind() != ToolKind::Draw || !self.has_image() {
            return None;
        }
        self.pointer.map(|at| Crosshair {
            at,
            config: self.config.crosshair,
        })
    }

    pub fn scene(&self) -> Scene {
        build_scene(&SceneInput {
            annotations: &self.annotations,
            image: self.viewport.image().unwrap_or_default(),
            mapping: self.viewport.mapping(),
            selected: self.selected,
            show_handles: self.tool.kind() == ToolKind::Select,
            preview: self.tool.preview(),
            drawing: self.tool.drawing_rect(),
            active_label: &self.active_label,
            config: &self.config,
            luminance: self.luminance.as_ref(),
        })
    }

    /// Drain the queued intents, oldest first.
    pub fn take_intents(&mut self) -> Vec<CanvasIntent> {
        std::mem::take(&mut self.intents)
    }

    /// Hand out a newly started auto-pan run. The host schedules frames for
    /// it and calls [`CanvasController::tick_auto_pan`] on each.
    pub fn take_auto_pan_request(&mut self) -> Option<AutoPanHandle> {
        self.auto_pan_request.take()
    }

    // ─── Host-driven state ───────────────────────────────────────────────

    pub fn set_container(&mut self, container: Size) {
        self.viewport.set_container(container);
    }

    /// Show a decoded image. Annotations and selection of the previous
    /// image are dropped; the host supplies the new ones.
    pub fn load_image(&mut self, image: &DecodedImage) {
        self.reset_for_image();
        self.luminance = match LuminanceMap::from_image(image) {
            Ok(map) => Some(map),
            Err(err) => {
                log::warn!("luminance map unavailable: {err}");
                None
            }
        };
        let info = image.info;
        self.viewport
            .set_image(Some(Size::new(info.width as f64, info.height as f64)));
        log::debug!("image loaded {}x{}", info.width, info.height);
    }

    /// Decode and show encoded image bytes. On failure the canvas is left
    /// empty.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), ImageError> {
        match DecodedImage::decode(bytes) {
            Ok(image) => {
                self.load_image(&image);
                Ok(())
            }
            Err(err) => {
                log::warn!("image rejected: {err}");
                self.clear_image();
                Err(err)
            }
        }
    }

    /// Back to the empty placeholder state.
    pub fn clear_image(&mut self) {
        self.reset_for_image();
        self.luminance = None;
        self.viewport.set_image(None);
    }

    fn reset_for_image(&mut self) {
        self.stop_auto_pan();
        self.tool.cancel();
        self.annotations.clear();
        self.selected = None;
    }

    /// Replace the local annotations with the store's copy.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        for annotation in &mut self.annotations {
            annotation.bbox = annotation.bbox.clamped();
        }
        if let Some(id) = self.selected
            && !self.contains(id)
        {
            self.selected = None;
        }
        let gesture_target = match self.tool.interaction() {
            Interaction::Dragging { id, .. } => Some(*id),
            Interaction::Resizing(session) => Some(session.id),
            _ => None,
        };
        if let Some(id) = gesture_target
            && !self.contains(id)
        {
            self.tool.cancel();
        }
    }

    fn contains(&self, id: AnnotationId) -> bool {
        self.annotations.iter().any(|a| a.id == id)
    }

    /// Rename an annotation, e.g. once the store acknowledged a provisional ID.
    pub fn replace_annotation_id(&mut self, old: AnnotationId, new: AnnotationId) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == old) else {
            return false;
        };
        annotation.id = new;
        if self.selected == Some(old) {
            self.selected = Some(new);
        }
        true
    }

    /// Set the ordered label list. The active label is kept when it is
    /// still listed, otherwise the first label becomes active.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
        let still_listed = self
            .labels
            .get(self.active_label.class_id as usize)
            .is_some_and(|l| *l == self.active_label.label);
        if !still_listed {
            self.active_label = LabelChoice::from_list(&self.labels, 0).unwrap_or_default();
        }
    }

    pub fn set_active_label(&mut self, label: LabelChoice) {
        self.active_label = label;
    }

    /// Activate the `index`-th label. Returns `false` for an index outside the list.
    pub fn pick_label(&mut self, index: usize) -> bool {
        match LabelChoice::from_list(&self.labels, index) {
            Some(choice) => {
                log::debug!("active label {:?}", choice.label);
                self.active_label = choice;
                true
            }
            None => false,
        }
    }

    /// Switch tools, dropping any gesture in progress.
    pub fn set_tool(&mut self, kind: ToolKind) {
        self.stop_auto_pan();
        self.tool.set_kind(kind);
        self.refresh_cursor();
    }

    /// Take a new display config and echo it back to the host.
    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config.sanitized();
        self.queue(CanvasIntent::ConfigChanged {
            config: self.config.clone(),
        });
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        let config = CanvasConfig {
            color_mode: mode,
            ..self.config.clone()
        };
        self.set_config(config);
    }

    pub fn set_crosshair(&mut self, crosshair: CrosshairConfig) {
        let config = CanvasConfig {
            crosshair,
            ..self.config.clone()
        };
        self.set_config(config);
    }

    /// Select a box (or nothing), emitting a select intent on change.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        let id = id.filter(|id| self.contains(*id));
        if id != self.selected {
            self.commit(CanvasIntent::Select { id });
        }
    }

    /// Delete the selected box. Ignored while a gesture is in progress.
    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) if self.tool.interaction().is_idle() => {
                self.commit(CanvasIntent::Delete { id });
                true
            }
            _ => false,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns `true` when the canvas needs repainting.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let redraw = match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(Point::new(*x, *y)),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { x, y, .. } => self.pointer_up(Point::new(*x, *y)),
            InputEvent::PointerCancel => {
                self.stop_auto_pan();
                self.tool.cancel()
            }
            InputEvent::Wheel { x, y, delta_y } => self.wheel(Point::new(*x, *y), *delta_y),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(
                key,
                modifiers.ctrl,
                modifiers.shift,
                modifiers.alt,
                modifiers.meta,
            ) {
                Some(action) => self.run_shortcut(action),
                None => false,
            },
        };
        self.refresh_cursor();
        redraw
    }

    /// The pointer left the canvas without a gesture.
    pub fn pointer_leave(&mut self) {
        if self.tool.interaction().is_idle() {
            self.pointer = None;
            self.refresh_cursor();
        }
    }

    fn pointer_down(&mut self, screen: Point) -> bool {
        self.pointer = Some(screen);
        let intents = self.with_tool(|tool, ctx| tool.pointer_down(screen, ctx));
        self.commit_all(intents);
        true
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        self.pointer = Some(screen);
        let redraw = self.with_tool(|tool, ctx| tool.pointer_move(screen, ctx));

        if matches!(self.tool.interaction(), Interaction::Drawing { .. }) {
            if edge_pan_vector(screen, self.viewport.container()).is_some() {
                if !self.auto_pan.is_active() {
                    self.auto_pan_request = Some(self.auto_pan.start());
                }
            } else {
                self.stop_auto_pan();
            }
        }
        redraw || self.tool.kind() == ToolKind::Draw
    }

    fn pointer_up(&mut self, screen: Point) -> bool {
        self.pointer = Some(screen);
        self.stop_auto_pan();
        if self.tool.interaction().is_idle() {
            return false;
        }
        let intents = self.with_tool(|tool, ctx| tool.pointer_up(screen, ctx));
        self.commit_all(intents);
        true
    }

    fn wheel(&mut self, screen: Point, delta_y: f64) -> bool {
        if !self.viewport.wheel_zoom(screen, delta_y) {
            return false;
        }
        self.follow_pointer();
        true
    }

    /// Advance the auto-pan run `handle` by one frame. Returns `false` once
    /// the run is over; the host stops scheduling frames for it.
    pub fn tick_auto_pan(&mut self, handle: AutoPanHandle) -> bool {
        if !self.auto_pan.accepts(handle) {
            return false;
        }
        let drawing = matches!(self.tool.interaction(), Interaction::Drawing { .. });
        let step = self
            .pointer
            .filter(|_| drawing)
            .and_then(|p| edge_pan_vector(p, self.viewport.container()).map(|v| (p, v)));
        let Some((pointer, (dx, dy))) = step else {
            self.stop_auto_pan();
            return false;
        };
        self.viewport.pan_by(dx, dy);
        // The pointer did not move but the image did: re-derive the free corner.
        self.with_tool(|tool, ctx| tool.pointer_move(pointer, ctx));
        log::trace!("auto-pan ({dx}, {dy})");
        true
    }

    fn stop_auto_pan(&mut self) {
        if self.auto_pan.is_active() {
            self.auto_pan.stop();
        }
        self.auto_pan_request = None;
    }

    fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::ToolSelect => self.set_tool(ToolKind::Select),
            ShortcutAction::ToolDraw => self.set_tool(ToolKind::Draw),
            ShortcutAction::ToolPan => self.set_tool(ToolKind::Pan),
            ShortcutAction::Escape => {
                if !self.tool.interaction().is_idle() {
                    self.stop_auto_pan();
                    self.tool.cancel();
                } else if self.selected.is_some() {
                    self.select(None);
                } else {
                    return false;
                }
            }
            ShortcutAction::DeleteSelected => return self.delete_selected(),
            ShortcutAction::PickLabel(index) => return self.pick_label(index),
            ShortcutAction::ZoomIn => return self.zoom_with(Viewport::zoom_in),
            ShortcutAction::ZoomOut => return self.zoom_with(Viewport::zoom_out),
            ShortcutAction::ResetView => {
                if !self.has_image() {
                    return false;
                }
                return self.zoom_with(|viewport| {
                    viewport.reset();
                    true
                });
            }
            ShortcutAction::CycleColorMode => self.set_color_mode(self.config.color_mode.next()),
            ShortcutAction::CrosshairShrink | ShortcutAction::CrosshairGrow => {
                let step = if action == ShortcutAction::CrosshairGrow {
                    CROSSHAIR_ARM_STEP
                } else {
                    -CROSSHAIR_ARM_STEP
                };
                let crosshair = CrosshairConfig {
                    arm_length: self.config.crosshair.arm_length + step,
                    ..self.config.crosshair
                };
                self.set_crosshair(crosshair);
            }
        }
        true
    }

    fn zoom_with(&mut self, zoom: fn(&mut Viewport) -> bool) -> bool {
        if !zoom(&mut self.viewport) {
            return false;
        }
        self.follow_pointer();
        true
    }

    /// Re-derive an in-progress gesture after the view moved under a
    /// stationary pointer.
    fn follow_pointer(&mut self) {
        if let Some(pointer) = self.pointer {
            self.with_tool(|tool, ctx| tool.pointer_move(pointer, ctx));
        }
    }

    // ─── Intents ─────────────────────────────────────────────────────────

    fn with_tool<R>(&mut self, f: impl FnOnce(&mut ToolState, &mut ToolContext<'_>) -> R) -> R {
        let mut ctx = ToolContext {
            annotations: &self.annotations,
            viewport: &mut self.viewport,
            selected: self.selected,
            active_label: &self.active_label,
        };
        f(&mut self.tool, &mut ctx)
    }

    fn commit_all(&mut self, intents: Intents) {
        for intent in intents {
            self.commit(intent);
        }
    }

    /// Apply an intent optimistically and queue it for the host.
    fn commit(&mut self, intent: CanvasIntent) {
        match &intent {
            CanvasIntent::Create {
                id,
                label,
                class_id,
                bbox,
            } => {
                self.annotations.push(Annotation::new(
                    *id,
                    label.clone(),
                    *class_id,
                    bbox.clamped(),
                ));
            }
            CanvasIntent::Update { id, patch } => {
                if let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == *id) {
                    annotation.apply(patch);
                }
            }
            CanvasIntent::Delete { id } => {
                self.annotations.retain(|a| a.id != *id);
                if self.selected == Some(*id) {
                    self.selected = None;
                }
            }
            CanvasIntent::Select { id } => self.selected = *id,
            CanvasIntent::ConfigChanged { .. } => {}
        }
        self.queue(intent);
    }

    fn queue(&mut self, intent: CanvasIntent) {
        log::debug!("intent {intent:?}");
        self.intents.push(intent);
    }

    fn refresh_cursor(&mut self) {
        let hover = self.hover();
        self.cursor = cursor_for(self.tool.kind(), self.tool.interaction(), hover);
    }

    fn hover(&self) -> Hover {
        if self.tool.kind() != ToolKind::Select {
            return Hover::Nothing;
        }
        let (Some(pointer), Some(id), Some(image)) =
            (self.pointer, self.selected, self.viewport.image())
        else {
            return Hover::Nothing;
        };
        let Some(annotation) = self.annotations.iter().find(|a| a.id == id) else {
            return Hover::Nothing;
        };
        let rect = annotation.rect(image);
        let p = self.viewport.screen_to_image(pointer);
        let radius = self.viewport.image_length(HANDLE_HIT_RADIUS_PX);
        if let Some(handle) = handle_at(&rect, p, radius) {
            Hover::Handle(handle.axis())
        } else if rect.contains(p) {
            Hover::SelectedBody
        } else {
            Hover::Nothing
        }
    }
}

impl Drop for CanvasController {
    fn drop(&mut self) {
        log::debug!("canvas controller dropped");
        self.stop_auto_pan();
    }
}
