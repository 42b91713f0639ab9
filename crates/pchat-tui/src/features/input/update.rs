//! Composer key handling.
//!
//! Only editing keys live here; global shortcuts are matched first by the
//! main reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::InputState;
use super::text_buffer::{CursorMove, TextBuffer};
use crate::common::sanitize_for_display;

/// What a key press did to the composer.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Enter with the current text.
    Submit(String),
    Edited,
    Ignored,
}

/// Handles a key in the composer. A disabled composer only reports `Ignored`.
pub fn handle_main_key(input: &mut InputState, key: KeyEvent) -> InputAction {
    if input.disabled {
        return InputAction::Ignored;
    }
    if key.code == KeyCode::Enter && key.modifiers.is_empty() && key.kind != KeyEventKind::Release {
        return InputAction::Submit(input.get_text());
    }
    if edit_buffer(&mut input.textarea, key) {
        InputAction::Edited
    } else {
        InputAction::Ignored
    }
}

/// Applies an editing key to any buffer (composer or overlay field).
///
/// `Shift+Enter` and `Alt+Enter` insert a newline. Returns false for keys
/// that are not editing keys.
pub fn edit_buffer(buf: &mut TextBuffer, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Enter if shift || alt => buf.insert_newline(),
        KeyCode::Char('j') if ctrl => buf.insert_newline(),
        KeyCode::Char('a') if ctrl => buf.move_cursor(CursorMove::LineStart),
        KeyCode::Char('e') if ctrl => buf.move_cursor(CursorMove::LineEnd),
        KeyCode::Char('u') if ctrl => buf.delete_to_line_start(),
        KeyCode::Char('k') if ctrl => buf.delete_to_line_end(),
        KeyCode::Char('w') if ctrl => buf.delete_word_left(),
        KeyCode::Backspace if alt || ctrl => buf.delete_word_left(),
        KeyCode::Backspace => buf.delete_prev_char(),
        KeyCode::Delete => buf.delete_next_char(),
        KeyCode::Left if alt || ctrl => buf.move_cursor(CursorMove::WordLeft),
        KeyCode::Right if alt || ctrl => buf.move_cursor(CursorMove::WordRight),
        KeyCode::Left => buf.move_cursor(CursorMove::Left),
        KeyCode::Right => buf.move_cursor(CursorMove::Right),
        KeyCode::Up if !alt => buf.move_cursor(CursorMove::Up),
        KeyCode::Down if !alt => buf.move_cursor(CursorMove::Down),
        KeyCode::Home => buf.move_cursor(CursorMove::LineStart),
        KeyCode::End => buf.move_cursor(CursorMove::LineEnd),
        KeyCode::Char(c) if !ctrl && !alt => buf.insert_char(c),
        _ => return false,
    }
    true
}

/// Inserts pasted text with escapes stripped.
pub fn handle_paste(input: &mut InputState, text: &str) {
    if input.disabled {
        return;
    }
    input.textarea.insert_str(&sanitize_for_display(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_enter_submits_text() {
        let mut input = InputState::new();
        input.textarea.set_text("你好");
        let action = handle_main_key(&mut input, key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, InputAction::Submit("你好".to_string()));
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut input = InputState::new();
        input.textarea.set_text("a");
        handle_main_key(&mut input, key(KeyCode::Enter, KeyModifiers::SHIFT));
        handle_main_key(&mut input, key(KeyCode::Char('b'), KeyModifiers::NONE));
        assert_eq!(input.get_text(), "a\nb");
    }

    #[test]
    fn test_disabled_input_ignores_keys() {
        let mut input = InputState::new();
        input.disabled = true;
        let action = handle_main_key(&mut input, key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(action, InputAction::Ignored);
        handle_paste(&mut input, "pasted");
        assert_eq!(input.get_text(), "");
    }

    #[test]
    fn test_paste_strips_escapes() {
        let mut input = InputState::new();
        handle_paste(&mut input, "\x1b[1mhi\x1b[0m\r\nthere");
        assert_eq!(input.get_text(), "hi\nthere");
    }
}
