//! Raw key presses to normalized wizard input.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pipegate_types::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Wizard(InputEvent),
    Quit,
}

/// Map a key press. `manual` is true while the screen collects typed text, in
/// which case printable keys are characters rather than shortcuts.
pub fn map_key(key: KeyEvent, manual: bool) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(KeyAction::Quit),
            _ => None,
        };
    }

    let event = match key.code {
        KeyCode::Esc => InputEvent::Cancel,
        KeyCode::Enter => InputEvent::Confirm,
        KeyCode::Up => InputEvent::NavigateUp,
        KeyCode::Down => InputEvent::NavigateDown,
        KeyCode::Tab | KeyCode::BackTab => InputEvent::ToggleMode,
        KeyCode::Backspace => InputEvent::Backspace,
        KeyCode::Left => InputEvent::CursorLeft,
        KeyCode::Right => InputEvent::CursorRight,
        KeyCode::Char(c) if manual => InputEvent::Character(c),
        KeyCode::Char('k') => InputEvent::NavigateUp,
        KeyCode::Char('j') => InputEvent::NavigateDown,
        KeyCode::Char('q') => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Wizard(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_are_shortcuts_only_in_select_mode() {
        assert_eq!(map_key(key(KeyCode::Char('j')), false), Some(KeyAction::Wizard(InputEvent::NavigateDown)));
        assert_eq!(map_key(key(KeyCode::Char('q')), false), Some(KeyAction::Quit));
        assert_eq!(map_key(key(KeyCode::Char('q')), true), Some(KeyAction::Wizard(InputEvent::Character('q'))));
        assert_eq!(map_key(key(KeyCode::Char('x')), false), None);
    }

    #[test]
    fn control_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, true), Some(KeyAction::Quit));
        assert_eq!(map_key(ctrl_c, false), Some(KeyAction::Quit));
    }

    #[test]
    fn navigation_keys_map_in_both_modes() {
        for manual in [false, true] {
            assert_eq!(map_key(key(KeyCode::Esc), manual), Some(KeyAction::Wizard(InputEvent::Cancel)));
            assert_eq!(map_key(key(KeyCode::Enter), manual), Some(KeyAction::Wizard(InputEvent::Confirm)));
            assert_eq!(map_key(key(KeyCode::Tab), manual), Some(KeyAction::Wizard(InputEvent::ToggleMode)));
        }
    }

    #[test]
    fn arrow_keys_move_the_text_cursor() {
        assert_eq!(map_key(key(KeyCode::Left), true), Some(KeyAction::Wizard(InputEvent::CursorLeft)));
        assert_eq!(map_key(key(KeyCode::Right), true), Some(KeyAction::Wizard(InputEvent::CursorRight)));
    }
}
