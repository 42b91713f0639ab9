//! Feature slices: each owns its state and reducer, and its view where it
//! draws one.

pub mod chat;
pub mod header;
pub mod input;
pub mod personas;
pub mod sessions;
pub mod statusline;
pub mod transcript;
