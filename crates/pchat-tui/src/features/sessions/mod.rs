//! Sessions feature: the cached list, switching, lifecycle results and the
//! sidebar.
//!
//! ## Module Structure
//!
//! - `state.rs`: SessionsState and the post-reload `ListFollowUp`
//! - `update.rs`: reducer for session events, switching and reloads
//! - `render.rs`: sidebar rendering

mod render;
mod state;
mod update;

pub use render::{SIDEBAR_WIDTH, render_sidebar};
pub use state::{ListFollowUp, SessionsState};
pub use update::{
    apply_list, cells_from_messages, create, handle_session_event, reload, start_rename_poll,
    switch_relative, switch_to,
};
