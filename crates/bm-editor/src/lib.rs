pub mod autopan;
pub mod controller;
pub mod cursor;
pub mod input;
pub mod shortcuts;
pub mod sync;
pub mod tools;
pub mod viewport;

pub use autopan::{AutoPan, AutoPanHandle, edge_pan_vector};
pub use controller::{CanvasController, Crosshair};
pub use cursor::CursorStyle;
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{FlushReport, SyncEngine};
pub use tools::{CanvasIntent, Interaction, ToolKind};
pub use viewport::Viewport;
