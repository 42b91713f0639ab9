//! UI event types.
//!
//! This module defines the unified event enum for the TUI. Terminal input,
//! timer ticks and backend results are all converted to `UiEvent` before the
//! reducer sees them.
//!
//! ## Inbox Pattern
//!
//! Async handlers send their results to the runtime's inbox. Results arrive
//! as separate events and never touch state directly.
//!
//! ## Task Lifecycle Events
//!
//! - The runtime emits `UiEvent::TaskStarted` once a task is spawned
//! - The runtime emits `UiEvent::TaskCompleted` wrapping the result event
//! - The reducer is the only place that mutates `TaskState`, and it drops
//!   completions whose id no longer owns the slot
//!
//! ## Cancellation Convention
//!
//! The rename poll is the one cancelable task. `TaskStarted` carries its
//! `CancellationToken`; `UiEffect::CancelTask` cancels it.

use crossterm::event::Event as CrosstermEvent;
use pchat_core::api::ApiError;
use pchat_types::{ChatReply, Message, Persona, Session};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};
use crate::sessions::ListFollowUp;

/// Session list and lifecycle results.
#[derive(Debug)]
pub enum SessionUiEvent {
    ListLoaded {
        sessions: Vec<Session>,
        follow_up: ListFollowUp,
    },
    ListFailed {
        error: ApiError,
    },
    MessagesLoaded {
        session_id: String,
        messages: Vec<Message>,
    },
    MessagesFailed {
        session_id: String,
        error: ApiError,
    },
    Created {
        session_id: String,
    },
    CreateFailed {
        error: ApiError,
    },
    Renamed {
        session_id: String,
    },
    RenameFailed {
        error: ApiError,
    },
    Terminated {
        session_id: String,
        new_title: Option<String>,
    },
    TerminateFailed {
        error: ApiError,
    },
    Deleted {
        session_id: String,
    },
    DeleteFailed {
        error: ApiError,
    },
}

/// Chat call results.
#[derive(Debug)]
pub enum ChatUiEvent {
    Replied {
        session_id: String,
        reply: ChatReply,
    },
    Failed {
        session_id: String,
        error: ApiError,
    },
}

/// Persona results.
#[derive(Debug)]
pub enum PersonaUiEvent {
    ListLoaded { personas: Vec<Persona> },
    ListFailed { error: ApiError },
    Saved { persona: Option<Persona> },
    SaveFailed { error: ApiError },
    Deleted { id: u64 },
    DeleteFailed { error: ApiError },
    Fetched { persona: Persona },
    FetchFailed { id: u64, error: ApiError },
    AvatarUploaded { url: String },
    UploadFailed { error: ApiError },
    Applied { session_id: String },
    ApplyFailed { error: ApiError },
}

/// Rename poll progress.
#[derive(Debug)]
pub enum PollUiEvent {
    /// One poll cycle fetched the list.
    Cycle {
        session_id: String,
        attempt: u32,
        sessions: Vec<Session>,
    },
    /// The loop ended (renamed, cap reached or cancelled).
    Finished { session_id: String, renamed: bool },
}

#[derive(Debug)]
pub enum UiEvent {
    Tick,
    /// Emitted at the start of each frame with the terminal size.
    Frame {
        width: u16,
        height: u16,
    },
    Terminal(CrosstermEvent),
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
    Session(SessionUiEvent),
    Chat(ChatUiEvent),
    Persona(PersonaUiEvent),
    Poll(PollUiEvent),
}
