//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Shortcuts are
//! single keys; anything held with ⌘/Ctrl or Alt is left to the host (browser
//! zoom, copy, etc.).

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolDraw,
    ToolPan,

    // ── Edit ──
    /// Cancel the box being drawn, or clear the selection.
    Escape,
    DeleteSelected,
    /// Make the n-th label (0-based) active for new boxes.
    PickLabel(usize),

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,

    // ── Appearance ──
    CycleColorMode,
    CrosshairShrink,
    CrosshairGrow,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"b"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        if ctrl || meta || alt {
            return None;
        }

        match key {
            "v" | "V" | "s" | "S" => Some(ShortcutAction::ToolSelect),
            "b" | "B" | "d" | "D" => Some(ShortcutAction::ToolDraw),
            "h" | "H" => Some(ShortcutAction::ToolPan),
            "Escape" => Some(ShortcutAction::Escape),
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            // `+` is Shift+= on most layouts.
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" | "_" => Some(ShortcutAction::ZoomOut),
            "0" => Some(ShortcutAction::ResetView),
            "c" | "C" => Some(ShortcutAction::CycleColorMode),
            "[" => Some(ShortcutAction::CrosshairShrink),
            "]" => Some(ShortcutAction::CrosshairGrow),
            _ => digit(key).map(ShortcutAction::PickLabel),
        }
    }
}

/// `"1"`..=`"9"` → 0..=8.
fn digit(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c {
        '1'..='9' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("v", false, false, false, false),
            Some(ShortcutAction::ToolSelect)
        );
        assert_eq!(
            ShortcutMap::resolve("s", false, false, false, false),
            Some(ShortcutAction::ToolSelect)
        );
        assert_eq!(
            ShortcutMap::resolve("b", false, false, false, false),
            Some(ShortcutAction::ToolDraw)
        );
        assert_eq!(
            ShortcutMap::resolve("D", false, true, false, false),
            Some(ShortcutAction::ToolDraw)
        );
        assert_eq!(
            ShortcutMap::resolve("h", false, false, false, false),
            Some(ShortcutAction::ToolPan)
        );
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
    }

    #[test]
    fn resolve_view() {
        assert_eq!(
            ShortcutMap::resolve("+", false, true, false, false),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("=", false, false, false, false),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", false, false, false, false),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", false, false, false, false),
            Some(ShortcutAction::ResetView)
        );
    }

    #[test]
    fn resolve_label_digits() {
        assert_eq!(
            ShortcutMap::resolve("1", false, false, false, false),
            Some(ShortcutAction::PickLabel(0))
        );
        assert_eq!(
            ShortcutMap::resolve("9", false, false, false, false),
            Some(ShortcutAction::PickLabel(8))
        );
        assert_eq!(ShortcutMap::resolve("10", false, false, false, false), None);
    }

    #[test]
    fn command_combos_are_left_to_host() {
        // Ctrl+C is copy, ⌘+ is browser zoom.
        assert_eq!(ShortcutMap::resolve("c", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("+", false, false, false, true), None);
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(
            ShortcutMap::resolve("Tab", false, false, false, false),
            None
        );
    }
}
