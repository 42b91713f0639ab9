//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod personas;
pub mod send;
pub mod sessions;
