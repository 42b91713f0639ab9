//! Application state composition.
//!
//! ## State Hierarchy
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── sessions: SessionsState   (cached list, current id)
//! │   ├── transcript: TranscriptState (cells, scroll, wrap cache)
//! │   ├── input: InputState         (composer buffer, disabled flag)
//! │   ├── personas: PersonasState   (cached persona list)
//! │   ├── header: HeaderState       (AI name, avatar, title)
//! │   ├── status_line: StatusLineState (notice, last reply stats)
//! │   ├── task_seq: TaskSeq         (async task id generator)
//! │   └── tasks: Tasks              (task lifecycle slots)
//! └── overlay: Option<Overlay>      (modal overlays)
//! ```
//!
//! Overlays live outside `TuiState` so an overlay handler can hold
//! `&mut Overlay` and `&TuiState` at the same time.

use pchat_core::config::Config;

use crate::common::{TaskId, TaskKind, TaskSeq, Tasks};
use crate::header::HeaderState;
use crate::input::InputState;
use crate::overlays::Overlay;
use crate::personas::PersonasState;
use crate::sessions::SessionsState;
use crate::statusline::StatusLineState;
use crate::transcript::TranscriptState;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, base_url: String) -> Self {
        Self {
            tui: TuiState::new(config, base_url),
            overlay: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub config: Config,
    /// Resolved backend URL, shown in the status line.
    pub base_url: String,
    pub sessions: SessionsState,
    pub transcript: TranscriptState,
    pub input: InputState,
    pub personas: PersonasState,
    pub header: HeaderState,
    pub status_line: StatusLineState,
    /// Task id sequence for async operations.
    pub task_seq: TaskSeq,
    /// Task lifecycle state for async operations.
    pub tasks: Tasks,
    pub sidebar_collapsed: bool,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config, base_url: String) -> Self {
        let sidebar_collapsed = config.ui.sidebar_collapsed;
        Self {
            should_quit: false,
            config,
            base_url,
            sessions: SessionsState::default(),
            transcript: TranscriptState::default(),
            input: InputState::new(),
            personas: PersonasState::default(),
            header: HeaderState::default(),
            status_line: StatusLineState::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            sidebar_collapsed,
            spinner_frame: 0,
        }
    }

    /// Allocates a task id and claims the `kind` slot for it.
    pub fn reserve_task(&mut self, kind: TaskKind) -> TaskId {
        let id = self.task_seq.next_id();
        self.tasks.state_mut(kind).reserve(id);
        id
    }

    /// True while a chat call is in flight.
    pub fn is_sending(&self) -> bool {
        self.tasks.send.is_running()
    }

    pub fn syntax_theme(&self) -> &str {
        &self.config.ui.syntax_theme
    }
}
