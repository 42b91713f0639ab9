//! Event loop and effect executor.
//!
//! The reducer in `update.rs` never performs I/O. It returns `UiEffect`s and
//! this module turns each one into a spawned backend call whose result comes
//! back through the inbox as a `UiEvent`.
//!
//! Every spawned call is bracketed by `TaskStarted` / `TaskCompleted` so the
//! reducer can track the slot and drop results of superseded calls. The rename
//! poll additionally pushes one `PollUiEvent::Cycle` per fetch straight into
//! the inbox.
//!
//! - `inbox.rs`: channel aliases
//! - `handlers/`: one async fn per backend call

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use pchat_core::api::ApiClient;
use pchat_core::config::Config;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskMeta, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::ChatTerminal;
use crate::{render, terminal, update};

/// Tick cadence while a request is in flight or the user is typing.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Owns the terminal, the state and the backend client.
///
/// Dropping it restores the terminal.
pub struct TuiRuntime {
    terminal: ChatTerminal,
    pub state: AppState,
    client: ApiClient,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_input: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and builds the initial state.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(config: Config, client: ApiClient) -> Result<Self> {
        // The hook must be in place before raw mode is entered
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(config, client.base_url().to_string());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_input: now,
        })
    }

    /// Loads the session list and runs until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let startup = update::startup_effects(&mut self.state);
        self.execute_effects(startup);

        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut needs_draw = true;

        while !self.state.tui.should_quit {
            let batch = self.collect_events()?;

            // Layout first, so scroll keys in this batch see the current size
            let size = self.terminal.size()?;
            self.dispatch_event(UiEvent::Frame {
                width: size.width,
                height: size.height,
            });

            for event in batch {
                match &event {
                    UiEvent::Terminal(_) => self.last_input = Instant::now(),
                    // Drawing is paced by ticks
                    UiEvent::Tick => needs_draw = true,
                    _ => {}
                }
                self.dispatch_event(event);
            }

            if needs_draw {
                let state = &self.state;
                self.terminal.draw(|frame| render::render(state, frame))?;
                needs_draw = false;
            }
        }

        Ok(())
    }

    /// Drains the inbox, waits for terminal input up to the next tick, and
    /// appends a `Tick` when one is due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let busy = self.state.tui.tasks.is_any_running()
            || self.last_input.elapsed() < IDLE_POLL_DURATION;
        let tick_every = if busy {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        let mut events = Vec::new();
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let mut timeout = if events.is_empty() {
            tick_every.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };
        while event::poll(timeout)? {
            events.push(UiEvent::Terminal(event::read()?));
            timeout = Duration::ZERO;
        }

        if self.last_tick.elapsed() >= tick_every {
            self.last_tick = Instant::now();
            events.push(UiEvent::Tick);
        }

        Ok(events)
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Reports `TaskStarted`, runs `f` on the tokio runtime, then reports
    /// `TaskCompleted` with its result. A cancelable task gets a fresh token.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, meta: TaskMeta, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        debug!(?kind, id = id.0, "spawning task");
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted {
                id,
                cancel: cancel.clone(),
                meta,
            },
        });
        tokio::spawn(async move {
            let result = Box::new(f(cancel).await);
            let _ = tx.send(UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted { id, result },
            });
        });
    }

    /// Spawns a call that is not tied to a session.
    fn spawn_call<Fut>(&self, kind: TaskKind, id: TaskId, call: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        self.spawn_task(kind, id, TaskMeta::None, false, move |_| call);
    }

    /// Spawns a call made on behalf of `session_id`.
    fn spawn_session_call<Fut>(&self, kind: TaskKind, id: TaskId, session_id: String, call: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let meta = TaskMeta::Session { session_id };
        self.spawn_task(kind, id, meta, false, move |_| call);
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let client = self.client.clone();
        match effect {
            UiEffect::Quit => self.state.tui.should_quit = true,
            UiEffect::CancelTask { kind, token } => {
                debug!(?kind, "cancelling task");
                if let Some(token) = token {
                    token.cancel();
                }
            }
            UiEffect::PersistSidebar { collapsed } => {
                if let Err(error) = Config::save_sidebar_collapsed(collapsed) {
                    warn!("Failed to persist sidebar state: {error:#}");
                }
            }

            UiEffect::LoadSessions { task, follow_up } => self.spawn_call(
                TaskKind::SessionList,
                task,
                handlers::session_list_load(client, follow_up),
            ),
            UiEffect::LoadMessages { task, session_id } => self.spawn_session_call(
                TaskKind::MessageLoad,
                task,
                session_id.clone(),
                handlers::message_list_load(client, session_id),
            ),
            UiEffect::CreateSession { task } => {
                let request = self.state.tui.config.new_session.setup_request();
                self.spawn_call(
                    TaskKind::SessionCreate,
                    task,
                    handlers::session_create(client, request),
                );
            }
            UiEffect::RenameSession {
                task,
                session_id,
                name,
            } => self.spawn_session_call(
                TaskKind::SessionRename,
                task,
                session_id.clone(),
                handlers::session_rename(client, session_id, name),
            ),
            UiEffect::TerminateSession { task, session_id } => self.spawn_session_call(
                TaskKind::SessionTerminate,
                task,
                session_id.clone(),
                handlers::session_terminate(client, session_id),
            ),
            UiEffect::DeleteSession { task, session_id } => self.spawn_session_call(
                TaskKind::SessionDelete,
                task,
                session_id.clone(),
                handlers::session_delete(client, session_id),
            ),

            UiEffect::SendMessage {
                task,
                session_id,
                text,
            } => self.spawn_session_call(
                TaskKind::Send,
                task,
                session_id.clone(),
                handlers::send_message(client, session_id, text),
            ),
            UiEffect::StartRenamePoll { task, session_id } => {
                let interval = self.state.tui.config.polling.interval();
                let max_attempts = self.state.tui.config.polling.max_attempts;
                let tx = self.inbox_tx.clone();
                let meta = TaskMeta::Session {
                    session_id: session_id.clone(),
                };
                self.spawn_task(TaskKind::RenamePoll, task, meta, true, move |cancel| {
                    handlers::rename_poll(client, session_id, interval, max_attempts, cancel, tx)
                });
            }

            UiEffect::LoadPersonas { task } => self.spawn_call(
                TaskKind::PersonaList,
                task,
                handlers::persona_list_load(client),
            ),
            UiEffect::SavePersona { task, draft } => self.spawn_call(
                TaskKind::PersonaSave,
                task,
                handlers::persona_save(client, draft),
            ),
            UiEffect::DeletePersona { task, id } => self.spawn_call(
                TaskKind::PersonaDelete,
                task,
                handlers::persona_delete(client, id),
            ),
            UiEffect::FetchPersona { task, id } => self.spawn_call(
                TaskKind::PersonaFetch,
                task,
                handlers::persona_fetch(client, id),
            ),
            UiEffect::UploadAvatar { task, path } => self.spawn_call(
                TaskKind::AvatarUpload,
                task,
                handlers::avatar_upload(client, path),
            ),
            UiEffect::UsePersona {
                task,
                session_id,
                persona_id,
            } => self.spawn_session_call(
                TaskKind::PersonaUse,
                task,
                session_id.clone(),
                handlers::persona_use(client, session_id, persona_id),
            ),
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
