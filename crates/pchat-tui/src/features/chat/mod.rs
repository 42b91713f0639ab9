//! Chat feature: submitting a message and applying the reply.

mod update;

pub use update::{SUMMARY_META, handle_chat_event, submit};
