//! Pointer cursor derived from tool, gesture and hover state.

use bm_core::ResizeAxis;

use crate::tools::{Interaction, ToolKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Draw mode. The painter draws the crosshair itself, so the system
    /// cursor is hidden.
    Crosshair,
    Grab,
    Grabbing,
    Move,
    Resize(ResizeAxis),
}

impl CursorStyle {
    /// CSS `cursor` value.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Crosshair => "none",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::Move => "move",
            CursorStyle::Resize(ResizeAxis::NwSe) => "nwse-resize",
            CursorStyle::Resize(ResizeAxis::NeSw) => "nesw-resize",
            CursorStyle::Resize(ResizeAxis::Ns) => "ns-resize",
            CursorStyle::Resize(ResizeAxis::Ew) => "ew-resize",
        }
    }
}

/// What the idle pointer is over in select mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    Nothing,
    SelectedBody,
    Handle(ResizeAxis),
}

pub fn cursor_for(tool: ToolKind, interaction: &Interaction, hover: Hover) -> CursorStyle {
    match (tool, interaction) {
        (ToolKind::Pan, Interaction::Panning { .. }) => CursorStyle::Grabbing,
        (ToolKind::Pan, _) => CursorStyle::Grab,
        (ToolKind::Draw, _) => CursorStyle::Crosshair,
        (ToolKind::Select, Interaction::Resizing(session)) => {
            CursorStyle::Resize(session.handle.axis())
        }
        (ToolKind::Select, Interaction::Dragging { moved: true, .. }) => CursorStyle::Move,
        (ToolKind::Select, _) => match hover {
            Hover::Handle(axis) => CursorStyle::Resize(axis),
            Hover::SelectedBody => CursorStyle::Move,
            Hover::Nothing => CursorStyle::Default,
        },
    }
}
