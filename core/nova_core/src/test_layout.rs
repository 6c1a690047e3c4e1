use crate::coords::{from_pointer, to_pixels, ContainerRect, PercentPoint, Point};
use crate::invariants::{assert_center_on_card, assert_rect_visible};
use crate::layout::{Gesture, LayoutEditor, Overlay, RectField};
use crate::types::{CardDesign, Rect};

const EPS: f64 = 1e-9;

/// An 800x600 card whose top-left sits at (100, 50) in the viewport.
fn container() -> ContainerRect {
    ContainerRect::new(100.0, 50.0, 800.0, 600.0)
}

/// Viewport point at the given percent of `container()`.
fn at(x_pct: f64, y_pct: f64) -> Point {
    let c = container();
    Point::new(c.left + x_pct / 100.0 * c.width, c.top + y_pct / 100.0 * c.height)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ─────────────────────────────────────────────────────────
// Coordinate model
// ─────────────────────────────────────────────────────────

#[test]
fn to_pixels_anchors_at_top_left() {
    let px = to_pixels(&Rect::new(50.0, 50.0, 25.0, 8.0), 800.0, 600.0);
    assert!((px.width - 200.0).abs() < EPS);
    assert!((px.height - 48.0).abs() < EPS);
    assert!((px.left - 300.0).abs() < EPS);
    assert!((px.top - 276.0).abs() < EPS);
}

#[test]
fn pixel_center_round_trips_for_many_rects() {
    let sizes = [(1.0, 1.0), (320.0, 452.0), (1920.0, 1080.0), (3508.0, 2480.0)];
    for xi in 0..=10 {
        for yi in 0..=10 {
            let rect = Rect::new(xi as f64 * 10.0, yi as f64 * 10.0, 2.0 + xi as f64, 2.0 + yi as f64);
            for (w, h) in sizes {
                let center = to_pixels(&rect, w, h).center_percent(w, h).unwrap();
                assert!(close(center.x, rect.x), "x drift for {rect:?} at {w}x{h}");
                assert!(close(center.y, rect.y), "y drift for {rect:?} at {w}x{h}");
            }
        }
    }
}

#[test]
fn from_pointer_is_relative_to_container() {
    let p = from_pointer(Point::new(500.0, 350.0), &container()).unwrap();
    assert_eq!(p, PercentPoint { x: 50.0, y: 50.0 });

    let outside = from_pointer(Point::new(0.0, 0.0), &container()).unwrap();
    assert!(outside.x < 0.0 && outside.y < 0.0);
}

#[test]
fn from_pointer_defers_on_degenerate_container() {
    assert!(from_pointer(Point::new(1.0, 1.0), &ContainerRect::new(0.0, 0.0, 0.0, 100.0)).is_none());
    assert!(from_pointer(Point::new(1.0, 1.0), &ContainerRect::new(0.0, 0.0, 100.0, 0.0)).is_none());
    assert!(
        from_pointer(Point::new(1.0, 1.0), &ContainerRect::new(0.0, 0.0, f64::NAN, 10.0)).is_none()
    );
}

#[test]
fn pointer_then_pixels_is_stable() {
    let c = container();
    let p = from_pointer(Point::new(740.0, 230.0), &c).unwrap();
    let rect = Rect::new(p.x, p.y, 10.0, 10.0);
    let px = to_pixels(&rect, c.width, c.height);
    assert!(close(c.left + px.left + px.width / 2.0, 740.0));
    assert!(close(c.top + px.top + px.height / 2.0, 230.0));
}

// ─────────────────────────────────────────────────────────
// Drag
// ─────────────────────────────────────────────────────────

#[test]
fn editor_starts_idle_with_default_layout() {
    let editor = LayoutEditor::new();
    assert_eq!(editor.gesture(), Gesture::Idle);
    assert_eq!(editor.design(), &CardDesign::default());
}

#[test]
fn drag_preserves_grab_point() {
    let mut editor = LayoutEditor::new();
    // Name slot centered at (50, 50); grab it 5% right and 2% below center.
    editor.begin_drag(Overlay::Name, at(55.0, 52.0), &container());
    assert!(editor.move_to(at(65.0, 32.0), &container()));

    let r = editor.rect(Overlay::Name);
    assert!(close(r.x, 60.0));
    assert!(close(r.y, 30.0));
    assert_eq!((r.w, r.h), (25.0, 8.0));
    assert_eq!(editor.rect(Overlay::Qr), CardDesign::default().qr_position);
}

#[test]
fn drag_clamps_center_to_card() {
    let mut editor = LayoutEditor::new();
    editor.begin_drag(Overlay::Qr, at(50.0, 75.0), &container());
    editor.move_to(at(-40.0, 180.0), &container());

    let r = editor.rect(Overlay::Qr);
    assert_eq!((r.x, r.y), (0.0, 100.0));
    assert_center_on_card(&r);
}

#[test]
fn move_is_noop_when_idle() {
    let mut editor = LayoutEditor::new();
    assert!(!editor.move_to(at(10.0, 10.0), &container()));
    assert_eq!(editor.design(), &CardDesign::default());
}

#[test]
fn move_defers_on_degenerate_container() {
    let mut editor = LayoutEditor::new();
    let collapsed = ContainerRect::new(0.0, 0.0, 0.0, 0.0);
    editor.begin_drag(Overlay::Name, Point::new(5.0, 5.0), &collapsed);
    assert!(!editor.move_to(Point::new(10.0, 10.0), &collapsed));
    assert_eq!(editor.design(), &CardDesign::default());

    // Once laid out, the zero grab offset centers the overlay on the pointer.
    assert!(editor.move_to(at(20.0, 40.0), &container()));
    let r = editor.rect(Overlay::Name);
    assert!(close(r.x, 20.0) && close(r.y, 40.0));
}

#[test]
fn end_returns_to_idle_and_keeps_edits() {
    let mut editor = LayoutEditor::new();
    editor.begin_drag(Overlay::Name, at(50.0, 50.0), &container());
    editor.move_to(at(30.0, 20.0), &container());
    editor.end();
    assert_eq!(editor.gesture(), Gesture::Idle);

    assert!(!editor.move_to(at(90.0, 90.0), &container()));
    let r = editor.rect(Overlay::Name);
    assert!(close(r.x, 30.0) && close(r.y, 20.0));
}

// ─────────────────────────────────────────────────────────
// Resize
// ─────────────────────────────────────────────────────────

#[test]
fn resize_is_symmetric_around_center() {
    let mut editor = LayoutEditor::new();
    editor.begin_resize(Overlay::Qr);
    // QR centered at (50, 75); pointer up-left of center still grows it.
    assert!(editor.move_to(at(40.0, 70.0), &container()));

    let r = editor.rect(Overlay::Qr);
    assert!(close(r.w, 20.0));
    assert!(close(r.h, 10.0));
    assert_eq!((r.x, r.y), (50.0, 75.0));
}

#[test]
fn resize_never_collapses_below_minimum() {
    let mut editor = LayoutEditor::new();
    editor.begin_resize(Overlay::Name);

    // Exactly on the center.
    editor.move_to(at(50.0, 50.0), &container());
    let r = editor.rect(Overlay::Name);
    assert_eq!((r.w, r.h), (2.0, 2.0));

    for (x, y) in [(50.2, 49.9), (50.0, 0.0), (100.0, 50.5), (-300.0, 400.0)] {
        editor.move_to(at(x, y), &container());
        assert_rect_visible(&editor.rect(Overlay::Name));
    }
}

#[test]
fn new_gesture_replaces_active_one() {
    let mut editor = LayoutEditor::new();
    editor.begin_drag(Overlay::Name, at(50.0, 50.0), &container());
    editor.begin_resize(Overlay::Qr);
    assert_eq!(editor.gesture(), Gesture::Resizing { target: Overlay::Qr });

    editor.move_to(at(60.0, 80.0), &container());
    assert_eq!(editor.rect(Overlay::Name), CardDesign::default().name_position);
    assert!(close(editor.rect(Overlay::Qr).w, 20.0));
}

// ─────────────────────────────────────────────────────────
// Typed-in edits & persistence hand-off
// ─────────────────────────────────────────────────────────

#[test]
fn set_field_normalizes() {
    let mut editor = LayoutEditor::new();
    editor.set_field(Overlay::Name, RectField::W, 0.0);
    editor.set_field(Overlay::Name, RectField::X, 140.0);
    editor.set_field(Overlay::Name, RectField::Y, f64::INFINITY);

    let r = editor.rect(Overlay::Name);
    assert_eq!(r.w, 2.0);
    assert_eq!(r.x, 100.0);
    assert_eq!(r.y, 50.0);
}

#[test]
fn editor_resumes_saved_design() {
    let saved = CardDesign {
        background_image: Some("/uploads/card.png".into()),
        name_position: Rect::new(20.0, 30.0, 40.0, 10.0),
        qr_position: Rect::new(80.0, 80.0, 12.0, 12.0),
    };
    let mut editor = LayoutEditor::from_design(saved.clone());
    editor.begin_drag(Overlay::Qr, at(80.0, 80.0), &container());
    editor.move_to(at(70.0, 80.0), &container());
    editor.end();
    editor.set_background(Some("/uploads/other.png".into()));

    let design = editor.into_design();
    assert_eq!(design.name_position, saved.name_position);
    assert!(close(design.qr_position.x, 70.0));
    assert_eq!(design.background_image.as_deref(), Some("/uploads/other.png"));
}
