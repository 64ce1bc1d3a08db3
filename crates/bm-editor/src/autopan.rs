//! Edge auto-pan while drawing.
//!
//! Auto-pan is a cancellable task rather than a self-rescheduling callback.
//! `start` hands out an [`AutoPanHandle`]; the host schedules one animation
//! frame at a time and feeds the handle back through the controller. Every
//! `stop` bumps the generation, so a frame that was already queued with an
//! old handle does nothing.

use bm_core::{Point, Size};

/// Distance from a container edge that triggers auto-pan.
pub const EDGE_ZONE_PX: f64 = 15.0;
/// Extra top margin so the zone clears an overlaid toolbar.
pub const TOP_TOOLBAR_PX: f64 = 60.0;
/// Viewport translation per frame.
pub const PAN_SPEED_PX: f64 = 4.0;

/// Token for one auto-pan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutoPanHandle(u64);

impl AutoPanHandle {
    /// Raw token, for hosts that pass it through JS.
    pub fn token(self) -> u64 {
        self.0
    }

    pub fn from_token(token: u64) -> Self {
        Self(token)
    }
}

#[derive(Debug, Default)]
pub struct AutoPan {
    generation: u64,
    active: bool,
}

impl AutoPan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run, or return the handle of the run already in flight.
    pub fn start(&mut self) -> AutoPanHandle {
        if !self.active {
            self.generation += 1;
            self.active = true;
            log::debug!("auto-pan start #{}", self.generation);
        }
        AutoPanHandle(self.generation)
    }

    /// Cancel the current run. Outstanding handles become inert.
    pub fn stop(&mut self) {
        if self.active {
            log::debug!("auto-pan stop #{}", self.generation);
        }
        self.active = false;
        self.generation += 1;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` when `handle` belongs to the live run.
    pub fn accepts(&self, handle: AutoPanHandle) -> bool {
        self.active && handle.0 == self.generation
    }
}

/// Per-frame viewport delta for a pointer at `pointer` (screen space).
///
/// The view moves away from the edge the pointer is near: near the left
/// edge the image slides right, revealing what lies to the left. Returns
/// `None` outside every edge zone.
pub fn edge_pan_vector(pointer: Point, container: Size) -> Option<(f64, f64)> {
    if container.is_empty() {
        return None;
    }
    let dx = if pointer.x < EDGE_ZONE_PX {
        PAN_SPEED_PX
    } else if pointer.x > container.width - EDGE_ZONE_PX {
        -PAN_SPEED_PX
    } else {
        0.0
    };
    let dy = if pointer.y < EDGE_ZONE_PX + TOP_TOOLBAR_PX {
        PAN_SPEED_PX
    } else if pointer.y > container.height - EDGE_ZONE_PX {
        -PAN_SPEED_PX
    } else {
        0.0
    };
    (dx != 0.0 || dy != 0.0).then_some((dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size::new(800.0, 600.0);

    #[test]
    fn zones_push_away_from_edges() {
        assert_eq!(
            edge_pan_vector(Point::new(5.0, 300.0), CONTAINER),
            Some((4.0, 0.0))
        );
        assert_eq!(
            edge_pan_vector(Point::new(795.0, 300.0), CONTAINER),
            Some((-4.0, 0.0))
        );
        assert_eq!(
            edge_pan_vector(Point::new(400.0, 590.0), CONTAINER),
            Some((0.0, -4.0))
        );
        assert_eq!(
            edge_pan_vector(Point::new(5.0, 595.0), CONTAINER),
            Some((4.0, -4.0))
        );
    }

    #[test]
    fn top_zone_clears_toolbar() {
        assert_eq!(
            edge_pan_vector(Point::new(400.0, 70.0), CONTAINER),
            Some((0.0, 4.0))
        );
        assert_eq!(edge_pan_vector(Point::new(400.0, 80.0), CONTAINER), None);
    }

    #[test]
    fn center_and_empty_container_do_nothing() {
        assert_eq!(edge_pan_vector(Point::new(400.0, 300.0), CONTAINER), None);
        assert_eq!(edge_pan_vector(Point::new(1.0, 1.0), Size::default()), None);
    }

    #[test]
    fn stop_invalidates_handles() {
        let mut pan = AutoPan::new();
        let first = pan.start();
        assert!(pan.accepts(first));
        assert_eq!(pan.start(), first);

        pan.stop();
        assert!(!pan.is_active());
        assert!(!pan.accepts(first));

        let second = pan.start();
        assert_ne!(first, second);
        assert!(!pan.accepts(first));
        assert!(pan.accepts(second));
    }
}
