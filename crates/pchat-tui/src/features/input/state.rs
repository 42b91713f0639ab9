use super::text_buffer::TextBuffer;
use crate::mutations::InputMutation;

/// Composer state.
#[derive(Debug, Default)]
pub struct InputState {
    pub textarea: TextBuffer,
    /// Set while the current session is terminated.
    pub disabled: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_text(&self) -> String {
        self.textarea.text().to_string()
    }

    pub fn apply(&mut self, mutation: InputMutation) {
        match mutation {
            InputMutation::Clear => self.textarea.clear(),
            InputMutation::SetText(text) => self.textarea.set_text(&text),
            InputMutation::SetDisabled(disabled) => self.disabled = disabled,
        }
    }
}
