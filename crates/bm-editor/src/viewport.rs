//! Viewport transform: fit scale, zoom, and pan.
//!
//! `scale = base_scale × zoom`, where `base_scale` fits the image inside the
//! container without ever upscaling past 1:1. Screen and image space are
//! related by
//!
//! ```text
//! screen = image · scale + position
//! image  = (screen − position) / scale
//! ```

use bm_core::{Point, Size};
use bm_render::ScreenMapping;

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 5.0;
/// Keyboard zoom step.
pub const ZOOM_STEP: f64 = 1.2;
const WHEEL_ZOOM_RATE: f64 = 0.002;
const WHEEL_DELTA_CAP: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    container: Size,
    image: Option<Size>,
    base_scale: f64,
    zoom: f64,
    scale: f64,
    position: Point,
    /// Set when an image was loaded but not laid out yet.
    pending_fit: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::default())
    }
}

/// Largest scale ≤ 1 at which `image` fits inside `container`.
pub fn fit_scale(container: Size, image: Size) -> f64 {
    if container.is_empty() || image.is_empty() {
        return 1.0;
    }
    (container.width / image.width)
        .min(container.height / image.height)
        .min(1.0)
}

impl Viewport {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            image: None,
            base_scale: 1.0,
            zoom: 1.0,
            scale: 1.0,
            position: Point::ZERO,
            pending_fit: false,
        }
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn image(&self) -> Option<Size> {
        self.image
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// `true` once an image is loaded into a laid-out container.
    pub fn is_ready(&self) -> bool {
        self.image.is_some_and(|img| !img.is_empty())
            && !self.container.is_empty()
            && self.scale > 0.0
    }

    /// Load (or clear) the image. The view is re-fitted and centered on the
    /// first layout where the container has a size.
    pub fn set_image(&mut self, image: Option<Size>) {
        self.image = image.filter(|img| !img.is_empty());
        self.zoom = 1.0;
        self.position = Point::ZERO;
        self.pending_fit = self.image.is_some();
        self.recompute_scale();
        if self.pending_fit && !self.container.is_empty() {
            self.reset();
        }
    }

    /// Container resized. Pan and zoom are preserved, except on the first
    /// layout after an image load, which centers the image.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
        self.recompute_scale();
        if self.pending_fit && self.is_ready() {
            self.reset();
        }
        log::trace!(
            "viewport container {}x{} scale={:.4}",
            container.width,
            container.height,
            self.scale
        );
    }

    fn recompute_scale(&mut self) {
        self.base_scale = match self.image {
            Some(image) => fit_scale(self.container, image),
            None => 1.0,
        };
        self.scale = self.base_scale * self.zoom;
    }

    /// Zoom back to the fitted scale and center the image.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.recompute_scale();
        if let Some(image) = self.image {
            self.position = Point::new(
                (self.container.width - image.width * self.scale) / 2.0,
                (self.container.height - image.height * self.scale) / 2.0,
            );
        }
        self.pending_fit = false;
    }

    pub fn image_to_screen(&self, p: Point) -> Point {
        if !self.is_ready() {
            return Point::ZERO;
        }
        Point::new(
            p.x * self.scale + self.position.x,
            p.y * self.scale + self.position.y,
        )
    }

    pub fn screen_to_image(&self, p: Point) -> Point {
        if !self.is_ready() {
            return Point::ZERO;
        }
        Point::new(
            (p.x - self.position.x) / self.scale,
            (p.y - self.position.y) / self.scale,
        )
    }

    /// Screen-space length → image-space length.
    pub fn image_length(&self, screen_px: f64) -> f64 {
        if self.scale > 0.0 { screen_px / self.scale } else { 0.0 }
    }

    pub fn mapping(&self) -> ScreenMapping {
        ScreenMapping {
            scale: self.scale,
            offset: self.position,
        }
    }

    /// Set the zoom level, keeping the image point under `anchor` fixed.
    /// Returns `true` if the zoom changed.
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) -> bool {
        if !self.is_ready() {
            return false;
        }
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let fixed = self.screen_to_image(anchor);
        self.zoom = zoom;
        self.recompute_scale();
        self.position = Point::new(
            anchor.x - fixed.x * self.scale,
            anchor.y - fixed.y * self.scale,
        );
        true
    }

    /// Wheel zoom around the pointer. Negative `delta_y` zooms in.
    pub fn wheel_zoom(&mut self, anchor: Point, delta_y: f64) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let factor = 1.0 + delta_y.abs().min(WHEEL_DELTA_CAP) * WHEEL_ZOOM_RATE;
        let zoom = if delta_y < 0.0 {
            self.zoom * factor
        } else {
            self.zoom / factor
        };
        self.zoom_at(anchor, zoom)
    }

    fn container_center(&self) -> Point {
        Point::new(self.container.width / 2.0, self.container.height / 2.0)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.container_center(), self.zoom * ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.container_center(), self.zoom / ZOOM_STEP)
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.position = self.position.offset(dx, dy);
    }
}
