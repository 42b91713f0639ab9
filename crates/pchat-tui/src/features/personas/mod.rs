//! Personas feature: the cached persona list and persona results.
//!
//! The panel, editor and detail views live in `overlays`.

mod state;
mod update;

pub use state::PersonasState;
pub use update::{handle_persona_event, reload};
