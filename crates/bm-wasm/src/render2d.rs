//! Canvas2D renderer.
//!
//! Paints one frame: the image at the viewport transform, every annotation
//! outline from the render scene, the selection halo and handles, the box
//! being drawn and the draw-mode crosshair. Everything arrives in screen
//! space already; this module only issues canvas calls.

use bm_core::{Color, Rect};
use bm_editor::{CanvasController, Crosshair};
use bm_render::{BoxVisual, DrawingVisual, HANDLE_RADIUS_PX, HandleVisual, Scene};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Theme-dependent colors for the canvas chrome.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub placeholder_text: &'static str,
    pub image_border: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            placeholder_text: "#86868B",
            image_border: "rgba(0, 0, 0, 0.12)",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            placeholder_text: "#98989D",
            image_border: "rgba(255, 255, 255, 0.10)",
        }
    }
}

/// Paint a full frame.
pub fn render_frame(
    ctx: &CanvasRenderingContext2d,
    controller: &CanvasController,
    image: Option<&HtmlImageElement>,
    theme: &CanvasTheme,
) {
    let viewport = controller.viewport();
    let container = viewport.container();

    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, container.width, container.height);

    let Some(size) = viewport.image() else {
        draw_placeholder(ctx, container.width, container.height, theme);
        return;
    };

    let origin = viewport.position();
    let scale = viewport.scale();
    if let Some(img) = image {
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            origin.x,
            origin.y,
            size.width * scale,
            size.height * scale,
        );
    }
    ctx.set_stroke_style_str(theme.image_border);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(origin.x, origin.y, size.width * scale, size.height * scale);

    let scene = controller.scene();
    draw_scene(ctx, &scene);

    if let Some(crosshair) = controller.crosshair() {
        draw_crosshair(ctx, &crosshair, &scene);
    }
}

fn draw_scene(ctx: &CanvasRenderingContext2d, scene: &Scene) {
    for b in &scene.boxes {
        draw_box(ctx, b);
    }
    for h in &scene.handles {
        if let Some(selected) = scene.selected() {
            draw_handle(ctx, h, selected.color);
        }
    }
    if let Some(drawing) = &scene.drawing {
        draw_drawing_rect(ctx, drawing);
    }
}

// ─── Boxes ───────────────────────────────────────────────────────────────

fn draw_box(ctx: &CanvasRenderingContext2d, b: &BoxVisual) {
    let r = b.screen;
    ctx.save();

    ctx.set_stroke_style_str(&b.color.to_css());
    ctx.set_line_width(b.stroke_width);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);

    if let Some(halo) = &b.halo {
        let h = halo.screen;
        ctx.set_line_width(1.0);
        // Two offset dash passes so the halo reads on any background.
        set_dash(ctx, halo.dash);
        ctx.set_stroke_style_str(&halo.secondary.to_css());
        ctx.set_line_dash_offset(0.0);
        ctx.stroke_rect(h.x, h.y, h.width, h.height);
        ctx.set_stroke_style_str(&halo.primary.to_css());
        ctx.set_line_dash_offset(halo.dash[0]);
        ctx.stroke_rect(h.x, h.y, h.width, h.height);
    }

    draw_label_tag(ctx, &r, &b.label, b.color);
    ctx.restore();
}

/// Label chip sitting on the top-left corner of a box.
fn draw_label_tag(ctx: &CanvasRenderingContext2d, r: &Rect, label: &str, color: Color) {
    if label.is_empty() {
        return;
    }
    let height = 16.0;
    let width = label.chars().count() as f64 * 6.5 + 8.0;
    let y = if r.y >= height { r.y - height } else { r.y };

    ctx.set_fill_style_str(&color.to_css());
    ctx.fill_rect(r.x, y, width, height);

    ctx.set_font("11px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(&bm_render::style::contrasting_ink(color).to_css());
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(label, r.x + 4.0, y + height / 2.0);
}

fn draw_handle(ctx: &CanvasRenderingContext2d, h: &HandleVisual, color: Color) {
    let c = h.screen_center;
    ctx.save();
    ctx.begin_path();
    let _ = ctx.arc(c.x, c.y, HANDLE_RADIUS_PX, 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill();
    ctx.set_stroke_style_str(&color.to_css());
    ctx.set_line_width(1.5);
    ctx.stroke();
    ctx.restore();
}

fn draw_drawing_rect(ctx: &CanvasRenderingContext2d, d: &DrawingVisual) {
    let r = d.screen;
    ctx.save();
    ctx.set_fill_style_str(&d.color.with_alpha(0.08).to_css());
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.set_stroke_style_str(&d.color.to_css());
    ctx.set_line_width(1.5);
    set_dash(ctx, [4.0, 4.0]);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);
    ctx.restore();
}

// ─── Overlays ────────────────────────────────────────────────────────────

fn draw_crosshair(ctx: &CanvasRenderingContext2d, crosshair: &Crosshair, scene: &Scene) {
    let Crosshair { at, config } = crosshair;
    let color = scene
        .drawing
        .map(|d| d.color.to_css())
        .unwrap_or_else(|| "#FFFFFF".to_string());
    let arm = config.arm_length;

    ctx.save();
    ctx.begin_path();
    ctx.move_to(at.x - arm, at.y);
    ctx.line_to(at.x + arm, at.y);
    ctx.move_to(at.x, at.y - arm);
    ctx.line_to(at.x, at.y + arm);
    // Dark underlay keeps the crosshair visible on light images.
    ctx.set_stroke_style_str("rgba(0, 0, 0, 0.6)");
    ctx.set_line_width(config.stroke_width + 2.0);
    ctx.stroke();
    ctx.set_stroke_style_str(&color);
    ctx.set_line_width(config.stroke_width);
    ctx.stroke();
    ctx.restore();
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &CanvasTheme) {
    ctx.save();
    ctx.set_font("13px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.placeholder_text);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("No image loaded", width / 2.0, height / 2.0);
    ctx.restore();
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: [f64; 2]) {
    let _ = ctx.set_line_dash(&js_sys::Array::of2(
        &JsValue::from_f64(dash[0]),
        &JsValue::from_f64(dash[1]),
    ));
}
