//! Cross-slice state mutations.
//!
//! Overlays and feature reducers that cannot reach another slice describe
//! the change as a `StateMutation`; the main reducer applies it.

use pchat_core::api::{ApiError, ApiErrorKind};
use pchat_types::Usage;

use crate::transcript::HistoryCell;

#[derive(Debug)]
pub enum StateMutation {
    Transcript(TranscriptMutation),
    Input(InputMutation),
    Status(StatusMutation),
}

#[derive(Debug)]
pub enum TranscriptMutation {
    Append(HistoryCell),
    ReplaceAll(Vec<HistoryCell>),
    /// Drops the last pending-reply bubble.
    RemoveThinking,
    Clear,
    ScrollToBottom,
    PageUp,
    PageDown,
    /// Mouse wheel; negative scrolls up.
    ScrollLines(i32),
}

#[derive(Debug)]
pub enum InputMutation {
    Clear,
    SetText(String),
    SetDisabled(bool),
}

#[derive(Debug)]
pub enum StatusMutation {
    Info(String),
    Error(String),
    ReplyStats {
        elapsed: String,
        usage: Option<Usage>,
    },
    ClearStats,
}

impl StatusMutation {
    /// Error notice for a failed backend call.
    pub fn failure(fallback: &str, error: &ApiError) -> Self {
        Self::Error(failure_text(fallback, error))
    }
}

/// User-facing text for a failed backend call.
///
/// A backend refusal or a local validation error already carries the
/// message to show; other failures are prefixed with `fallback`.
pub fn failure_text(fallback: &str, error: &ApiError) -> String {
    match error.kind {
        ApiErrorKind::Backend | ApiErrorKind::Validation => error.message.clone(),
        _ => format!("{fallback} {}", error.message),
    }
}
