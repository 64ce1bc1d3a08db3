//! Geometry primitives shared by the canvas.
//!
//! Three coordinate spaces meet here:
//!
//! - **Screen space**: pixels of the rendering container.
//! - **Image space**: pixels of the source image at native resolution
//!   (`Point`, `Rect`).
//! - **Normalized space**: center-based fractions of the image size
//!   (`BoundingBox`), which is what the annotation store persists.
//!
//! Conversions between image and normalized space live here; screen ↔ image
//! conversion belongs to the viewport.

use serde::{Deserialize, Serialize};

/// Smallest edge (image pixels) a drawn or resized box may have.
pub const MIN_BOX_SIZE: f64 = 10.0;

/// Tolerance used when comparing normalized coordinates.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height of an image or container, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size with a non-positive (or non-finite) side cannot host any geometry.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0
            && self.height > 0.0
            && self.width.is_finite()
            && self.height.is_finite())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Clamp a point onto `[0, width] × [0, height]`.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.width.max(0.0)),
            p.y.clamp(0.0, self.height.max(0.0)),
        )
    }
}

/// A pixel-space rectangle (top-left origin).
///
/// Extents may be negative while a draw gesture is in flight: the origin is
/// the anchor and the extents follow the pointer. Call [`Rect::normalized`]
/// before treating it as a proper box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect spanning from `anchor` to `corner`, keeping the anchor as origin.
    pub fn from_anchor(anchor: Point, corner: Point) -> Self {
        Self::new(anchor.x, anchor.y, corner.x - anchor.x, corner.y - anchor.y)
    }

    /// Rect spanning the four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Flip negative extents so that width and height are non-negative.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        (self.width * self.height).abs()
    }

    pub fn contains(&self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.x && p.x <= r.right() && p.y >= r.y && p.y <= r.bottom()
    }

    /// Grow the rect by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Rect {
        let r = self.normalized();
        Rect::new(
            r.x - margin,
            r.y - margin,
            r.width + 2.0 * margin,
            r.height + 2.0 * margin,
        )
    }

    /// Intersect with the image bounds `[0, W] × [0, H]`.
    pub fn clamp_within(&self, image: Size) -> Rect {
        let r = self.normalized();
        let left = r.x.clamp(0.0, image.width);
        let top = r.y.clamp(0.0, image.height);
        let right = r.right().clamp(0.0, image.width);
        let bottom = r.bottom().clamp(0.0, image.height);
        Rect::from_edges(left, top, right, bottom)
    }

    /// Translate by `(dx, dy)` while keeping the whole rect inside the image.
    ///
    /// The size is preserved whenever it fits; a rect larger than the image
    /// is shrunk to the image first.
    pub fn translated_within(&self, dx: f64, dy: f64, image: Size) -> Rect {
        let r = self.normalized();
        let width = r.width.min(image.width);
        let height = r.height.min(image.height);
        let x = (r.x + dx).clamp(0.0, image.width - width);
        let y = (r.y + dy).clamp(0.0, image.height - height);
        Rect::new(x, y, width, height)
    }

    /// `true` when both extents are strictly larger than `min` pixels.
    pub fn exceeds(&self, min: f64) -> bool {
        self.width.abs() > min && self.height.abs() > min
    }
}

/// A center-based bounding box normalized to the image size.
///
/// Invariant (after [`BoundingBox::clamped`]): `0 ≤ x, y ≤ 1`,
/// `width, height ≥ 0`, and the box lies entirely inside `[0, 1]²`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert an image-pixel rect to a normalized box (see [`rect_to_bbox`]).
    pub fn from_rect(rect: &Rect, image: Size) -> Self {
        rect_to_bbox(rect, image)
    }

    /// Convert to an image-pixel rect (see [`bbox_to_rect`]).
    pub fn to_rect(&self, image: Size) -> Rect {
        bbox_to_rect(self, image)
    }

    /// Restore the bounds invariant: clamp extents to `[0, 1]`, then clamp
    /// the center so that `center ± half-extent` stays inside the unit square.
    pub fn clamped(&self) -> BoundingBox {
        let width = finite_or_zero(self.width).clamp(0.0, 1.0);
        let height = finite_or_zero(self.height).clamp(0.0, 1.0);
        let x = finite_or_zero(self.x).clamp(width / 2.0, 1.0 - width / 2.0);
        let y = finite_or_zero(self.y).clamp(height / 2.0, 1.0 - height / 2.0);
        BoundingBox::new(x, y, width, height)
    }

    /// Check the bounds invariant within [`EPSILON`].
    pub fn is_within_unit(&self) -> bool {
        self.width >= 0.0
            && self.height >= 0.0
            && self.x - self.width / 2.0 >= -EPSILON
            && self.y - self.height / 2.0 >= -EPSILON
            && self.x + self.width / 2.0 <= 1.0 + EPSILON
            && self.y + self.height / 2.0 <= 1.0 + EPSILON
    }

    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Pixel rect → normalized center box, clamped into the unit square.
///
/// Negative extents are normalized first. An empty image yields the zero box.
pub fn rect_to_bbox(rect: &Rect, image: Size) -> BoundingBox {
    if image.is_empty() {
        return BoundingBox::default();
    }
    let r = rect.normalized();
    BoundingBox::new(
        (r.x + r.width / 2.0) / image.width,
        (r.y + r.height / 2.0) / image.height,
        r.width / image.width,
        r.height / image.height,
    )
    .clamped()
}

/// Normalized center box → pixel rect:
/// `((x − w/2)·W, (y − h/2)·H, w·W, h·H)`.
///
/// Converting back with [`rect_to_bbox`] reproduces the box within
/// [`EPSILON`], not bit for bit. Repeated round trips do not drift.
pub fn bbox_to_rect(bbox: &BoundingBox, image: Size) -> Rect {
    Rect::new(
        (bbox.x - bbox.width / 2.0) * image.width,
        (bbox.y - bbox.height / 2.0) * image.height,
        bbox.width * image.width,
        bbox.height * image.height,
    )
}
