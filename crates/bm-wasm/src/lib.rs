//! WASM bridge for BoxMark: exposes the annotation canvas to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM
//! events, the `<canvas>` element, the animation-frame loop and persistence;
//! everything else goes through [`BoxCanvas`].
//!
//! Host loop, roughly:
//!
//! ```text
//! on pointer/wheel/key  → handle_*(…) → if changed: render(ctx)
//!                        → take_auto_pan_token() → if some: schedule tick_auto_pan(token)
//!                        → take_intents_json() → send to the annotation API
//! ```

mod render2d;

use bm_core::{Annotation, AnnotationId, CanvasConfig, ColorMode, DecodedImage, LabelChoice, Size};
use bm_editor::{
    AutoPanHandle, CanvasController, InputEvent, Modifiers, ShortcutAction, ShortcutMap, ToolKind,
};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// The WASM-facing canvas.
#[wasm_bindgen]
pub struct BoxCanvas {
    controller: CanvasController,
    image: Option<HtmlImageElement>,
    dark_mode: bool,
}

#[wasm_bindgen]
impl BoxCanvas {
    /// Create a canvas for a container of the given CSS pixel size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self {
            controller: CanvasController::new(Size::new(width, height)),
            image: None,
            dark_mode: false,
        }
    }

    /// Render the current frame to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        render2d::render_frame(ctx, &self.controller, self.image.as_ref(), &theme);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// Container resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.controller.set_container(Size::new(width, height));
    }

    // ─── Image ───────────────────────────────────────────────────────────

    /// Show a loaded `<img>`. `pixels` is its RGBA data read back through
    /// an offscreen canvas (`getImageData`), used for `auto` color mode.
    /// Returns `false` and leaves the canvas empty if the pixels don't match.
    pub fn set_image(&mut self, img: HtmlImageElement, pixels: js_sys::Uint8ClampedArray) -> bool {
        let (width, height) = (img.natural_width(), img.natural_height());
        match DecodedImage::from_rgba(width, height, pixels.to_vec()) {
            Ok(decoded) => {
                self.controller.load_image(&decoded);
                self.image = Some(img);
                true
            }
            Err(err) => {
                log::warn!("image rejected: {err}");
                self.clear_image();
                false
            }
        }
    }

    /// Show an image from encoded bytes; `img` is the same image for painting.
    pub fn set_image_bytes(&mut self, img: HtmlImageElement, bytes: &[u8]) -> bool {
        if self.controller.load_image_bytes(bytes).is_ok() {
            self.image = Some(img);
            true
        } else {
            self.image = None;
            false
        }
    }

    /// The image failed to load (or was unset): show the placeholder.
    pub fn clear_image(&mut self) {
        self.controller.clear_image();
        self.image = None;
    }

    // ─── Annotations, labels, config ─────────────────────────────────────

    /// Replace annotations from the store's JSON list. Returns `false` on bad JSON.
    pub fn set_annotations_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<Annotation>>(json) {
            Ok(annotations) => {
                self.controller.set_annotations(annotations);
                true
            }
            Err(err) => {
                log::warn!("bad annotations JSON: {err}");
                false
            }
        }
    }

    pub fn get_annotations_json(&self) -> String {
        serde_json::to_string(self.controller.annotations()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rename an annotation once the store has assigned its real ID.
    pub fn confirm_annotation_id(&mut self, provisional: &str, id: &str) -> bool {
        self.controller
            .replace_annotation_id(AnnotationId::intern(provisional), AnnotationId::intern(id))
    }

    /// Set the ordered label list from a JSON array of strings.
    pub fn set_labels_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<String>>(json) {
            Ok(labels) => {
                self.controller.set_labels(labels);
                true
            }
            Err(err) => {
                log::warn!("bad labels JSON: {err}");
                false
            }
        }
    }

    pub fn set_active_label(&mut self, label: &str, class_id: u32) {
        self.controller.set_active_label(LabelChoice::new(label, class_id));
    }

    /// Returns `{"label":"…","classId":n}`.
    pub fn get_active_label_json(&self) -> String {
        serde_json::to_string(self.controller.active_label()).unwrap_or_default()
    }

    /// Apply a (possibly partial) config. The sanitized config is echoed
    /// back through the intent queue.
    pub fn set_config_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<CanvasConfig>(json) {
            Ok(config) => {
                self.controller.set_config(config);
                true
            }
            Err(err) => {
                log::warn!("bad config JSON: {err}");
                false
            }
        }
    }

    pub fn get_config_json(&self) -> String {
        serde_json::to_string(self.controller.config()).unwrap_or_default()
    }

    /// Set the color mode by name (`auto`, `label`, `custom`).
    pub fn set_color_mode(&mut self, name: &str) -> bool {
        match ColorMode::parse(name) {
            Some(mode) => {
                self.controller.set_color_mode(mode);
                true
            }
            None => false,
        }
    }

    // ─── Tools & selection ───────────────────────────────────────────────

    /// Switch tool by name (`select`, `draw`, `pan`). Unknown names are ignored.
    pub fn set_tool(&mut self, name: &str) {
        if let Some(kind) = ToolKind::parse(name) {
            self.controller.set_tool(kind);
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.controller.tool().as_str().to_string()
    }

    /// Selected annotation ID, or empty string.
    pub fn get_selected_id(&self) -> String {
        self.controller
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select by ID; an empty string clears the selection.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        let target = (!id.is_empty()).then(|| AnnotationId::intern(id));
        self.controller.select(target);
        self.controller.selected() == target
    }

    pub fn delete_selected(&mut self) -> bool {
        self.controller.delete_selected()
    }

    /// CSS cursor for the canvas element.
    pub fn get_cursor(&self) -> String {
        self.controller.cursor().css_name().to_string()
    }

    pub fn get_zoom(&self) -> f64 {
        self.controller.viewport().zoom()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns `true` if the canvas needs repainting.
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.controller.handle(&InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.controller.handle(&InputEvent::PointerMove { x, y, modifiers })
    }

    /// Call from a window-level listener so releases outside the canvas
    /// still finish the gesture.
    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.controller.handle(&InputEvent::PointerUp { x, y, modifiers })
    }

    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.controller.handle(&InputEvent::PointerCancel)
    }

    pub fn handle_pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.controller.handle(&InputEvent::Wheel { x, y, delta_y })
    }

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<action_name>","tool":"<tool_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta);
        let changed = action.is_some()
            && self.controller.handle(&InputEvent::Key {
                key: key.to_string(),
                modifiers: modifiers(shift, ctrl, alt, meta),
            });
        let action_name = action.map(action_to_name).unwrap_or("none");
        let tool_name = self.controller.tool().as_str();
        format!(r#"{{"changed":{changed},"action":"{action_name}","tool":"{tool_name}"}}"#)
    }

    // ─── Auto-pan ────────────────────────────────────────────────────────

    /// Token of a newly started auto-pan run, if any. The host then calls
    /// `tick_auto_pan(token)` once per animation frame until it returns `false`.
    pub fn take_auto_pan_token(&mut self) -> Option<f64> {
        self.controller
            .take_auto_pan_request()
            .map(|handle| handle.token() as f64)
    }

    pub fn tick_auto_pan(&mut self, token: f64) -> bool {
        if !token.is_finite() || token < 0.0 {
            return false;
        }
        self.controller
            .tick_auto_pan(AutoPanHandle::from_token(token as u64))
    }

    // ─── Intents ─────────────────────────────────────────────────────────

    /// Drain queued intents as a JSON array, oldest first.
    pub fn take_intents_json(&mut self) -> String {
        let intents = self.controller.take_intents();
        serde_json::to_string(&intents).unwrap_or_else(|err| {
            log::warn!("intent serialization failed: {err}");
            "[]".to_string()
        })
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::ToolSelect => "toolSelect",
        ShortcutAction::ToolDraw => "toolDraw",
        ShortcutAction::ToolPan => "toolPan",
        ShortcutAction::Escape => "escape",
        ShortcutAction::DeleteSelected => "deleteSelected",
        ShortcutAction::PickLabel(_) => "pickLabel",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ResetView => "resetView",
        ShortcutAction::CycleColorMode => "cycleColorMode",
        ShortcutAction::CrosshairShrink => "crosshairShrink",
        ShortcutAction::CrosshairGrow => "crosshairGrow",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("BoxMark WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no canvas needed) ───────────────────────────────

/// Convert a pixel rect to a normalized bbox. Returns JSON
/// `{"x":…,"y":…,"width":…,"height":…}`; zeros for an empty image.
#[wasm_bindgen]
pub fn rect_to_bbox_json(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    image_width: f64,
    image_height: f64,
) -> String {
    let rect = bm_core::Rect::new(x, y, width, height);
    let bbox = bm_core::rect_to_bbox(&rect, Size::new(image_width, image_height));
    serde_json::to_string(&bbox).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn action_names_are_camel_case() {
        assert_eq!(
            action_to_name(ShortcutAction::DeleteSelected),
            "deleteSelected"
        );
        assert_eq!(action_to_name(ShortcutAction::PickLabel(3)), "pickLabel");
    }

    #[test]
    fn bbox_helper_matches_core() {
        let json = rect_to_bbox_json(100.0, 100.0, 200.0, 150.0, 1000.0, 800.0);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["x"], 0.2);
        assert_eq!(value["y"], 0.21875);
        assert_eq!(value["width"], 0.2);
        assert_eq!(value["height"], 0.1875);
    }

    #[test]
    fn bbox_helper_handles_empty_image() {
        let json = rect_to_bbox_json(1.0, 1.0, 2.0, 2.0, 0.0, 0.0);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["width"], 0.0);
    }
}
