//! UI effects emitted by the reducer and executed by the runtime.
//!
//! Every backend call is one effect carrying the task id the reducer
//! allocated for it.

use std::path::PathBuf;

use pchat_types::PersonaDraft;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};
use crate::sessions::ListFollowUp;

#[derive(Debug)]
pub enum UiEffect {
    Quit,
    LoadSessions {
        task: TaskId,
        follow_up: ListFollowUp,
    },
    LoadMessages {
        task: TaskId,
        session_id: String,
    },
    SendMessage {
        task: TaskId,
        session_id: String,
        text: String,
    },
    CreateSession {
        task: TaskId,
    },
    RenameSession {
        task: TaskId,
        session_id: String,
        name: String,
    },
    TerminateSession {
        task: TaskId,
        session_id: String,
    },
    DeleteSession {
        task: TaskId,
        session_id: String,
    },
    LoadPersonas {
        task: TaskId,
    },
    SavePersona {
        task: TaskId,
        draft: PersonaDraft,
    },
    DeletePersona {
        task: TaskId,
        id: u64,
    },
    FetchPersona {
        task: TaskId,
        id: u64,
    },
    UploadAvatar {
        task: TaskId,
        path: PathBuf,
    },
    UsePersona {
        task: TaskId,
        session_id: String,
        persona_id: u64,
    },
    StartRenamePoll {
        task: TaskId,
        session_id: String,
    },
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
    /// Write `ui.sidebar_collapsed` to the config file.
    PersistSidebar {
        collapsed: bool,
    },
}
