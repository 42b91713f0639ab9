//! Core library for pchat: configuration, logging, the backend client and
//! transcript export.

pub mod api;
pub mod config;
pub mod export;
pub mod logging;

pub use pchat_types as types;
