//! Composer feature: edit buffer, key handling, view.

mod render;
mod state;
mod text_buffer;
mod update;

pub use render::{calculate_input_height, render_input};
pub use state::InputState;
pub use text_buffer::{CursorMove, TextBuffer};
pub use update::{InputAction, edit_buffer, handle_main_key, handle_paste};
