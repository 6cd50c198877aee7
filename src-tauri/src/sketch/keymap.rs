//! Keyboard shortcuts.
//!
//! The webview forwards raw `KeyboardEvent.key` values; this module decides
//! what they mean so the bindings live in one place.

use super::mode::Mode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "mode", rename_all = "camelCase")]
pub enum Action {
    ToggleDrawing,
    TogglePanel,
    Clear,
    Undo,
    Save,
    Quit,
    SetMode(Mode),
}

/// Resolves a key press to an action.
///
/// Ctrl combinations are checked first, so Ctrl+C clears instead of picking
/// the circle tool. Letter keys are case-insensitive.
pub fn resolve(key: &str, ctrl: bool) -> Option<Action> {
    if key == "Escape" {
        return Some(Action::Quit);
    }

    let mut chars = key.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => return None,
    };

    if ctrl {
        return match letter {
            'd' => Some(Action::ToggleDrawing),
            'c' => Some(Action::Clear),
            'z' => Some(Action::Undo),
            's' => Some(Action::Save),
            _ => None,
        };
    }

    match letter {
        'h' => Some(Action::TogglePanel),
        'f' => Some(Action::SetMode(Mode::Freehand)),
        'l' => Some(Action::SetMode(Mode::Highlighter)),
        'n' => Some(Action::SetMode(Mode::Line)),
        'r' => Some(Action::SetMode(Mode::Rectangle)),
        'c' => Some(Action::SetMode(Mode::Circle)),
        'e' => Some(Action::SetMode(Mode::Eraser)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_letters_select_modes() {
        let cases = [
            ("f", Mode::Freehand),
            ("l", Mode::Highlighter),
            ("n", Mode::Line),
            ("r", Mode::Rectangle),
            ("c", Mode::Circle),
            ("e", Mode::Eraser),
        ];
        for (key, mode) in cases {
            assert_eq!(resolve(key, false), Some(Action::SetMode(mode)), "{key}");
            assert_eq!(resolve(&key.to_uppercase(), false), Some(Action::SetMode(mode)));
        }
    }

    #[test]
    fn ctrl_bindings_take_precedence() {
        assert_eq!(resolve("c", true), Some(Action::Clear));
        assert_eq!(resolve("d", true), Some(Action::ToggleDrawing));
        assert_eq!(resolve("Z", true), Some(Action::Undo));
        assert_eq!(resolve("s", true), Some(Action::Save));
    }

    #[test]
    fn ctrl_with_tool_letter_does_nothing() {
        assert_eq!(resolve("f", true), None);
        assert_eq!(resolve("h", true), None);
    }

    #[test]
    fn escape_quits_with_or_without_ctrl() {
        assert_eq!(resolve("Escape", false), Some(Action::Quit));
        assert_eq!(resolve("Escape", true), Some(Action::Quit));
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        for key in ["x", "Enter", "", "ArrowLeft", "1"] {
            assert_eq!(resolve(key, false), None, "{key}");
        }
    }

    #[test]
    fn panel_toggle_is_h() {
        assert_eq!(resolve("H", false), Some(Action::TogglePanel));
    }
}
