//! Integration tests: pointer gestures through the controller (bm-editor).
//!
//! Drives `CanvasController` with raw input events and checks the emitted
//! intents, the optimistic local state and the render scene.

use bm_core::{Annotation, AnnotationId, BoundingBox, DecodedImage, Point, Rect, Size};
use bm_editor::{CanvasController, CanvasIntent, InputEvent, Interaction, ToolKind};
use pretty_assertions::assert_eq;

const IMAGE: Size = Size::new(1000.0, 800.0);

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Controller whose container matches the image, so screen = image pixels.
fn make_controller() -> CanvasController {
    init_logs();
    let mut controller = CanvasController::new(IMAGE);
    let image = DecodedImage::from_rgba(1000, 800, vec![200; 1000 * 800 * 4]).unwrap();
    controller.load_image(&image);
    controller
}

fn ann(id: &str, rect: Rect) -> Annotation {
    let bbox = BoundingBox::from_rect(&rect, IMAGE);
    Annotation::new(AnnotationId::intern(id), "product", 0, bbox)
}

fn gesture(controller: &mut CanvasController, from: (f64, f64), to: (f64, f64)) {
    controller.handle(&InputEvent::pointer_down(from.0, from.1));
    controller.handle(&InputEvent::pointer_move(
        (from.0 + to.0) / 2.0,
        (from.1 + to.1) / 2.0,
    ));
    controller.handle(&InputEvent::pointer_move(to.0, to.1));
    controller.handle(&InputEvent::pointer_up(to.0, to.1));
}

fn assert_all_inside(controller: &CanvasController) {
    for a in controller.annotations() {
        assert!(
            a.bbox.is_within_unit(),
            "{:?} escaped the image: {:?}",
            a.id,
            a.bbox
        );
    }
}

// ─── Drawing ─────────────────────────────────────────────────────────────

#[test]
fn draw_emits_normalized_create() {
    let mut controller = make_controller();
    controller.set_tool(ToolKind::Draw);
    gesture(&mut controller, (100.0, 100.0), (300.0, 250.0));

    let intents = controller.take_intents();
    match intents.as_slice() {
        [CanvasIntent::Create { label, class_id, bbox, .. }] => {
            assert_eq!(label, "object");
            assert_eq!(*class_id, 0);
            assert!(
                bbox.approx_eq(&BoundingBox::new(0.2, 0.21875, 0.2, 0.1875), 1e-9),
                "{bbox:?}"
            );
        }
        other => panic!("expected one Create, got {other:?}"),
    }
    assert_eq!(controller.annotations().len(), 1);
}

#[test]
fn draw_below_minimum_size_creates_nothing() {
    let mut controller = make_controller();
    controller.set_tool(ToolKind::Draw);
    gesture(&mut controller, (100.0, 100.0), (105.0, 103.0));

    assert!(controller.take_intents().is_empty());
    assert!(controller.annotations().is_empty());
    assert!(controller.interaction().is_idle());
}

#[test]
fn draw_uses_active_label() {
    let mut controller = make_controller();
    controller.set_labels(vec!["product".into(), "price".into(), "promo".into()]);
    controller.handle(&InputEvent::key("3"));
    controller.handle(&InputEvent::key("b"));
    gesture(&mut controller, (10.0, 10.0), (60.0, 60.0));

    let a = &controller.annotations()[0];
    assert_eq!(a.label, "promo");
    assert_eq!(a.class_id, 2);
}

#[test]
fn escape_discards_drawing() {
    let mut controller = make_controller();
    controller.set_tool(ToolKind::Draw);
    controller.handle(&InputEvent::pointer_down(100.0, 100.0));
    controller.handle(&InputEvent::pointer_move(400.0, 400.0));
    assert!(controller.scene().drawing.is_some());

    controller.handle(&InputEvent::key("Escape"));
    assert!(controller.scene().drawing.is_none());

    controller.handle(&InputEvent::pointer_up(400.0, 400.0));
    assert!(controller.take_intents().is_empty());
}

#[test]
fn pointer_cancel_discards_drawing() {
    let mut controller = make_controller();
    controller.set_tool(ToolKind::Draw);
    controller.handle(&InputEvent::pointer_down(100.0, 100.0));
    controller.handle(&InputEvent::pointer_move(400.0, 400.0));
    controller.handle(&InputEvent::PointerCancel);
    assert!(controller.interaction().is_idle());
    assert!(controller.take_intents().is_empty());
}

#[test]
fn switching_tool_mid_draw_clears_gesture() {
    let mut controller = make_controller();
    controller.set_tool(ToolKind::Draw);
    controller.handle(&InputEvent::pointer_down(100.0, 100.0));
    controller.handle(&InputEvent::pointer_move(400.0, 400.0));

    controller.handle(&InputEvent::key("v"));
    assert_eq!(controller.tool(), ToolKind::Select);
    assert!(controller.interaction().is_idle());
    controller.handle(&InputEvent::pointer_up(400.0, 400.0));
    assert!(controller.annotations().is_empty());
}

// ─── Selection ───────────────────────────────────────────────────────────

#[test]
fn overlapping_click_selects_smaller_box() {
    let mut controller = make_controller();
    // 100×50 = 5000 px² inside 200×100 = 20000 px²
    let large = ann("large", Rect::new(100.0, 100.0, 200.0, 100.0));
    let small = ann("small", Rect::new(150.0, 120.0, 100.0, 50.0));
    controller.set_annotations(vec![small.clone(), large.clone()]);

    gesture(&mut controller, (180.0, 140.0), (180.0, 140.0));
    assert_eq!(controller.selected(), Some(small.id));
    assert_eq!(
        controller.take_intents(),
        vec![CanvasIntent::Select { id: Some(small.id) }]
    );
}

#[test]
fn click_inside_selected_box_reaches_nested_box() {
    let mut controller = make_controller();
    let outer = ann("outer", Rect::new(100.0, 100.0, 500.0, 400.0));
    let inner = ann("inner", Rect::new(300.0, 300.0, 40.0, 40.0));
    controller.set_annotations(vec![outer.clone(), inner.clone()]);
    controller.select(Some(outer.id));

    gesture(&mut controller, (320.0, 320.0), (321.0, 320.0));
    assert_eq!(controller.selected(), Some(inner.id));
}

#[test]
fn background_click_deselects() {
    let mut controller = make_controller();
    let a = ann("a", Rect::new(100.0, 100.0, 50.0, 50.0));
    controller.set_annotations(vec![a.clone()]);
    controller.select(Some(a.id));

    gesture(&mut controller, (800.0, 700.0), (800.0, 700.0));
    assert_eq!(controller.selected(), None);
}

// ─── Drag / resize ───────────────────────────────────────────────────────

#[test]
fn drag_previews_then_commits_update() {
    let mut controller = make_controller();
    let a = ann("drag", Rect::new(100.0, 100.0, 100.0, 100.0));
    controller.set_annotations(vec![a.clone()]);
    controller.select(Some(a.id));
    controller.take_intents();

    controller.handle(&InputEvent::pointer_down(150.0, 150.0));
    controller.handle(&InputEvent::pointer_move(250.0, 200.0));
    let preview = controller.scene().selected().map(|b| b.rect);
    assert_eq!(preview, Some(Rect::new(200.0, 150.0, 100.0, 100.0)));
    assert!(matches!(
        controller.interaction(),
        Interaction::Dragging { moved: true, .. }
    ));

    controller.handle(&InputEvent::pointer_up(250.0, 200.0));
    match controller.take_intents().as_slice() {
        [CanvasIntent::Update { id, patch }] => {
            assert_eq!(*id, a.id);
            let bbox = patch.bbox.unwrap();
            assert!(
                bbox.approx_eq(&BoundingBox::new(0.25, 0.25, 0.1, 0.125), 1e-9),
                "{bbox:?}"
            );
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn drag_and_resize_stay_inside_image() {
    let mut controller = make_controller();
    let a = ann("edge", Rect::new(850.0, 650.0, 100.0, 100.0));
    controller.set_annotations(vec![a.clone()]);
    controller.select(Some(a.id));

    // Drag far past the bottom-right corner.
    gesture(&mut controller, (900.0, 700.0), (1400.0, 1300.0));
    assert_all_inside(&controller);
    let rect = controller.annotations()[0].rect(IMAGE);
    assert!((rect.right() - 1000.0).abs() < 1e-6);
    assert!((rect.bottom() - 800.0).abs() < 1e-6);

    // Resize the NW handle past the top-left corner.
    gesture(&mut controller, (rect.x, rect.y), (-300.0, -300.0));
    assert_all_inside(&controller);
    let rect = controller.annotations()[0].rect(IMAGE);
    assert!(rect.x.abs() < 1e-6 && rect.y.abs() < 1e-6, "{rect:?}");
}

#[test]
fn resize_never_flips_below_minimum() {
    let mut controller = make_controller();
    let a = ann("flip", Rect::new(100.0, 100.0, 200.0, 100.0));
    controller.set_annotations(vec![a.clone()]);
    controller.select(Some(a.id));

    // Drag the E handle far to the left of the W edge.
    gesture(&mut controller, (300.0, 150.0), (20.0, 150.0));
    let rect = controller.annotations()[0].rect(IMAGE);
    assert!((rect.x - 100.0).abs() < 1e-6);
    assert!((rect.width - 10.0).abs() < 1e-6, "{rect:?}");
}

// ─── View ────────────────────────────────────────────────────────────────

#[test]
fn handle_radius_and_hit_margin_hold_in_screen_pixels_when_zoomed() {
    let mut controller = make_controller();
    for _ in 0..5 {
        controller.handle(&InputEvent::Wheel {
            x: 500.0,
            y: 400.0,
            delta_y: -100.0,
        });
    }
    assert!((controller.viewport().zoom() - 2.48832).abs() < 1e-9);

    let a = ann("zoomed", Rect::new(450.0, 350.0, 40.0, 40.0));
    controller.set_annotations(vec![a.clone()]);
    controller.select(Some(a.id));
    let corner = controller.viewport().image_to_screen(Point::new(450.0, 350.0));

    // 8 screen px from the corner is inside the 10 px handle radius.
    let near = corner.offset(8.0, 0.0);
    controller.handle(&InputEvent::pointer_down(near.x, near.y));
    assert!(matches!(controller.interaction(), Interaction::Resizing(_)));
    controller.handle(&InputEvent::PointerCancel);

    // 15 screen px outside is neither a handle nor a hit.
    let far = corner.offset(-15.0, 0.0);
    gesture(&mut controller, (far.x, far.y), (far.x, far.y));
    assert_eq!(controller.selected(), None);

    let right_edge = controller.viewport().image_to_screen(Point::new(490.0, 370.0));
    let beyond = right_edge.offset(6.0, 0.0);
    gesture(&mut controller, (beyond.x, beyond.y), (beyond.x, beyond.y));
    assert_eq!(controller.selected(), None);

    let within = right_edge.offset(3.0, 0.0);
    gesture(&mut controller, (within.x, within.y), (within.x, within.y));
    assert_eq!(controller.selected(), Some(a.id));
}

#[test]
fn wheel_zoom_keeps_image_point_under_pointer() {
    let mut controller = CanvasController::new(Size::new(800.0, 600.0));
    let image = DecodedImage::from_rgba(1000, 800, vec![0; 1000 * 800 * 4]).unwrap();
    controller.load_image(&image);

    let target = Point::new(50.0, 50.0);
    let screen = controller.viewport().image_to_screen(target);
    controller.handle(&InputEvent::Wheel {
        x: screen.x,
        y: screen.y,
        delta_y: -60.0,
    });

    assert!(controller.viewport().zoom() > 1.0);
    let after = controller.viewport().image_to_screen(target);
    assert!(
        (after.x - screen.x).abs() < 1e-6 && (after.y - screen.y).abs() < 1e-6
    );
}

#[test]
fn pan_tool_translates_view() {
    let mut controller = make_controller();
    controller.handle(&InputEvent::key("h"));
    let before = controller.viewport().position();
    gesture(&mut controller, (400.0, 400.0), (450.0, 380.0));
    assert_eq!(controller.viewport().position(), before.offset(50.0, -20.0));

    controller.handle(&InputEvent::key("0"));
    assert_eq!(controller.viewport().position(), before);
}
