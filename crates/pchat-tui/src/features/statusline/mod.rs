//! Status line feature slice.
//!
//! One row under the composer: backend URL, current session, a spinner while
//! requests run, the last reply's timing and token usage, and transient
//! notices.
//!
//! ## Module Structure
//!
//! - `state.rs`: StatusLineState (notices with expiry, last reply stats)
//! - `render.rs`: status line rendering

mod render;
mod state;

pub use render::render_status_line;
pub use state::{Notice, NoticeLevel, StatusLineState};
