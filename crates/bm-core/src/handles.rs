//! Resize-handle geometry.
//!
//! A selected box exposes eight handles at the compass points of its rect.
//! Each handle owns a subset of the rect's edges; dragging the handle moves
//! only those edges, the opposite edges stay put.

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

/// The direction a handle resizes along; maps onto the platform's resize cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAxis {
    /// ↖↘
    NwSe,
    /// ↗↙
    NeSw,
    /// ↕
    Ns,
    /// ↔
    Ew,
}

impl ResizeHandle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    /// Position of this handle on `rect`.
    pub fn anchor(self, rect: &Rect) -> Point {
        let r = rect.normalized();
        let cx = r.x + r.width / 2.0;
        let cy = r.y + r.height / 2.0;
        match self {
            ResizeHandle::Nw => Point::new(r.x, r.y),
            ResizeHandle::N => Point::new(cx, r.y),
            ResizeHandle::Ne => Point::new(r.right(), r.y),
            ResizeHandle::E => Point::new(r.right(), cy),
            ResizeHandle::Se => Point::new(r.right(), r.bottom()),
            ResizeHandle::S => Point::new(cx, r.bottom()),
            ResizeHandle::Sw => Point::new(r.x, r.bottom()),
            ResizeHandle::W => Point::new(r.x, cy),
        }
    }

    pub fn axis(self) -> ResizeAxis {
        match self {
            ResizeHandle::Nw | ResizeHandle::Se => ResizeAxis::NwSe,
            ResizeHandle::Ne | ResizeHandle::Sw => ResizeAxis::NeSw,
            ResizeHandle::N | ResizeHandle::S => ResizeAxis::Ns,
            ResizeHandle::E | ResizeHandle::W => ResizeAxis::Ew,
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw)
    }

    fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se)
    }

    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::S | ResizeHandle::Se)
    }
}

/// Compute the rect produced by dragging `handle` of `start` to `pointer`.
///
/// All coordinates are image pixels. Moving edges follow the pointer but
/// never cross within `min_size` of the opposite edge (the box does not
/// flip), and never leave the image.
pub fn resize_rect(
    start: &Rect,
    handle: ResizeHandle,
    pointer: Point,
    image: Size,
    min_size: f64,
) -> Rect {
    let r = start.normalized();
    let p = image.clamp_point(pointer);
    let (mut left, mut top, mut right, mut bottom) = (r.x, r.y, r.right(), r.bottom());

    if handle.moves_left() {
        left = p.x.min(right - min_size).max(0.0);
    }
    if handle.moves_right() {
        right = p.x.max(left + min_size).min(image.width);
    }
    if handle.moves_top() {
        top = p.y.min(bottom - min_size).max(0.0);
    }
    if handle.moves_bottom() {
        bottom = p.y.max(top + min_size).min(image.height);
    }

    Rect::from_edges(left, top, right, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MIN_BOX_SIZE;

    const IMAGE: Size = Size::new(1000.0, 800.0);

    fn start() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 100.0)
    }

    fn resize(handle: ResizeHandle, pointer: Point) -> Rect {
        resize_rect(&start(), handle, pointer, IMAGE, MIN_BOX_SIZE)
    }

    #[test]
    fn anchors_sit_on_compass_points() {
        let r = start();
        assert_eq!(ResizeHandle::Nw.anchor(&r), Point::new(100.0, 100.0));
        assert_eq!(ResizeHandle::E.anchor(&r), Point::new(300.0, 150.0));
        assert_eq!(ResizeHandle::S.anchor(&r), Point::new(200.0, 200.0));
    }

    #[test]
    fn corner_handle_moves_two_edges() {
        let r = resize(ResizeHandle::Se, Point::new(400.0, 260.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 300.0, 160.0));
    }

    #[test]
    fn edge_handle_ignores_orthogonal_motion() {
        let r = resize(ResizeHandle::N, Point::new(999.0, 40.0));
        assert_eq!(r, Rect::new(100.0, 40.0, 200.0, 160.0));
    }

    #[test]
    fn cannot_shrink_below_minimum_or_flip() {
        let r = resize(ResizeHandle::W, Point::new(600.0, 150.0));
        assert_eq!(r.width, MIN_BOX_SIZE);
        assert_eq!(r.right(), 300.0);
    }

    #[test]
    fn stays_inside_image() {
        let r = resize(ResizeHandle::Nw, Point::new(-80.0, -30.0));
        assert_eq!(r, Rect::new(0.0, 0.0, 300.0, 200.0));
        let r = resize(ResizeHandle::Se, Point::new(5000.0, 5000.0));
        assert_eq!(r.right(), 1000.0);
        assert_eq!(r.bottom(), 800.0);
    }

    #[test]
    fn axes_match_cursor_directions() {
        assert_eq!(ResizeHandle::Nw.axis(), ResizeAxis::NwSe);
        assert_eq!(ResizeHandle::Sw.axis(), ResizeAxis::NeSw);
        assert_eq!(ResizeHandle::S.axis(), ResizeAxis::Ns);
        assert_eq!(ResizeHandle::W.axis(), ResizeAxis::Ew);
    }
}
