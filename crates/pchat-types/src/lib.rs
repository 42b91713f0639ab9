//! Wire types shared by the pchat client crates.
//!
//! These mirror the JSON bodies exchanged with the chat backend. Every
//! record decodes leniently: missing fields fall back to empty values so a
//! partially filled response still renders.

mod chat;
mod de;
mod message;
mod persona;
mod session;

pub use chat::{
    ChatReply, ChatRequest, ChatResponse, RenameRequest, ResultResponse, SessionIdRequest,
    SetupRequest, SetupResponse, UploadResponse, UsePersonaRequest, Usage,
};
pub use message::{Message, Role};
pub use persona::{Persona, PersonaDraft};
pub use session::{DEFAULT_SESSION_NAME, Session};
