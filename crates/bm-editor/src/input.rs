//! Input abstraction layer.
//!
//! Normalizes mouse / pen / touch pointer events, wheel events and key
//! presses into a unified `InputEvent` consumed by the controller. All
//! positions are screen-space, relative to the canvas container.

/// Keyboard modifier state at the time of an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed over the canvas.
    PointerDown {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer moved (over the canvas or, during a gesture, anywhere).
    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer released. Delivered even when the release happens outside
    /// the canvas so gestures always complete.
    PointerUp {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer capture lost (window blur, touch cancel).
    PointerCancel,

    /// Mouse wheel / trackpad scroll at a pointer position.
    Wheel { x: f64, y: f64, delta_y: f64 },

    /// Key press; `key` is the `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }}
