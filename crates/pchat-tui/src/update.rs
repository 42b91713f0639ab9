//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tracing::debug;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::{PollUiEvent, UiEvent};
use crate::input::InputAction;
use crate::mutations::{StateMutation, StatusMutation, TranscriptMutation};
use crate::overlays::{self, ConfirmAction, Overlay, OverlayRequest};
use crate::sessions::ListFollowUp;
use crate::state::{AppState, TuiState};
use crate::{chat, input, personas, render, sessions};

/// Lines per mouse wheel notch.
const WHEEL_LINES: i32 = 3;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            // Advance spinner animation
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.status_line.expire(Instant::now());
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(&mut app.tui, width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                debug!(?kind, id = completed.id.0, "dropping superseded task result");
                vec![]
            }
        }
        UiEvent::Session(event) => {
            let (effects, mutations) = sessions::handle_session_event(&mut app.tui, event);
            apply_mutations(&mut app.tui, mutations);
            effects
        }
        UiEvent::Chat(event) => {
            let (effects, mutations) = chat::handle_chat_event(&mut app.tui, event);
            apply_mutations(&mut app.tui, mutations);
            effects
        }
        UiEvent::Persona(event) => {
            let (effects, mutations) =
                personas::handle_persona_event(&mut app.tui, &mut app.overlay, event);
            apply_mutations(&mut app.tui, mutations);
            effects
        }
        UiEvent::Poll(event) => handle_poll_event(&mut app.tui, event),
    }
}

/// Effects to run once at startup.
pub fn startup_effects(app: &mut AppState) -> Vec<UiEffect> {
    vec![sessions::reload(&mut app.tui, ListFollowUp::Keep)]
}

// ============================================================================
// StateMutation Dispatcher
// ============================================================================

fn apply_mutations(tui: &mut TuiState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::Transcript(mutation) => tui.transcript.apply(mutation),
            StateMutation::Input(mutation) => tui.input.apply(mutation),
            StateMutation::Status(mutation) => tui.status_line.apply(mutation),
        }
    }
}

fn notice(tui: &mut TuiState, text: &str) {
    tui.status_line.apply(StatusMutation::Info(text.to_string()));
}

// ============================================================================
// Overlays
// ============================================================================

fn apply_overlay_update(app: &mut AppState, update: overlays::OverlayUpdate) -> Vec<UiEffect> {
    let mut effects = update.effects;
    match update.transition {
        overlays::OverlayTransition::Stay => {}
        overlays::OverlayTransition::Close => app.overlay = None,
        overlays::OverlayTransition::Open(request) => {
            effects.extend(open_overlay_request(app, request));
        }
    }
    effects
}

fn open_overlay_request(app: &mut AppState, request: OverlayRequest) -> Vec<UiEffect> {
    match request {
        OverlayRequest::Rename => {
            let Some(session) = app.tui.sessions.current() else {
                app.overlay = None;
                return vec![];
            };
            let state = overlays::RenameState::open(session.id.clone(), session.display_name());
            app.overlay = Some(Overlay::Rename(state));
            vec![]
        }
        OverlayRequest::Confirm(action) => {
            app.overlay = Some(Overlay::Confirm(overlays::ConfirmState::open(action)));
            vec![]
        }
        OverlayRequest::PersonaPanel => {
            let (mut state, effects) = overlays::PersonaPanelState::open(&mut app.tui);
            state.clamp(app.tui.personas.len());
            app.overlay = Some(Overlay::PersonaPanel(state));
            effects
        }
        OverlayRequest::PersonaEditor { persona_id } => {
            let persona = persona_id.and_then(|id| app.tui.personas.find(id));
            let editor = overlays::PersonaEditorState::open(
                persona,
                &app.tui.config.new_session.ai_avatar,
            );
            app.overlay = Some(Overlay::PersonaEditor(editor));
            vec![]
        }
        OverlayRequest::PersonaDetail { id, from_panel } => {
            let (state, effects) = overlays::PersonaDetailState::open(&mut app.tui, id, from_panel);
            app.overlay = Some(Overlay::PersonaDetail(state));
            effects
        }
    }
}

// ============================================================================
// Frame Handler
// ============================================================================

/// Per-frame housekeeping: transcript viewport and line count, so scroll
/// keys clamp against what is on screen.
fn handle_frame(tui: &mut TuiState, width: u16, height: u16) {
    let area = render::calculate_transcript_area(tui, width, height);
    tui.transcript.viewport_height = area.height as usize;
    tui.transcript.scroll.cached_line_count = render::calculate_line_count(tui, area.width);
}

// ============================================================================
// Rename Poll
// ============================================================================

fn handle_poll_event(tui: &mut TuiState, event: PollUiEvent) -> Vec<UiEffect> {
    match event {
        PollUiEvent::Cycle {
            session_id,
            attempt,
            sessions,
        } => {
            if !tui.tasks.rename_poll.is_running() {
                return vec![];
            }
            debug!(session_id, attempt, "rename poll cycle");
            let (effects, mutations) = sessions::apply_list(tui, sessions, &ListFollowUp::Keep);
            apply_mutations(tui, mutations);
            effects
        }
        PollUiEvent::Finished {
            session_id,
            renamed,
        } => {
            debug!(session_id, renamed, "rename poll finished");
            vec![]
        }
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => {
            if app.overlay.is_some() {
                return vec![];
            }
            let delta = match mouse.kind {
                MouseEventKind::ScrollUp => -WHEEL_LINES,
                MouseEventKind::ScrollDown => WHEEL_LINES,
                _ => return vec![],
            };
            app.tui
                .transcript
                .apply(TranscriptMutation::ScrollLines(delta));
            vec![]
        }
        Event::Paste(text) => {
            match app.overlay.as_mut() {
                Some(overlay) => overlay.handle_paste(&text),
                None => input::handle_paste(&mut app.tui.input, &text),
            }
            vec![]
        }
        Event::Resize(_, _) => {
            // Line wrapping depends on width
            app.tui.transcript.wrap_cache.clear();
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    // Try to dispatch to the active overlay
    if let Some(mut update) = overlays::handle_overlay_key(&mut app.tui, &mut app.overlay, key) {
        apply_mutations(&mut app.tui, std::mem::take(&mut update.mutations));
        return apply_overlay_update(app, update);
    }

    if let Some(effects) = handle_global_key(app, key) {
        return effects;
    }

    // No shortcut matched - delegate to the composer
    match input::handle_main_key(&mut app.tui.input, key) {
        InputAction::Submit(text) => {
            let (effects, mutations) = chat::submit(&mut app.tui, &text);
            apply_mutations(&mut app.tui, mutations);
            effects
        }
        InputAction::Edited | InputAction::Ignored => vec![],
    }
}

/// Application shortcuts. `None` when `key` is not one of them.
fn handle_global_key(app: &mut AppState, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let tui = &mut app.tui;

    let effects = match key.code {
        KeyCode::Char('c') if ctrl => quit(tui),
        KeyCode::Char('n') if ctrl => sessions::create(tui).into_iter().collect(),
        KeyCode::Char('r') if ctrl => {
            if tui.sessions.current().is_none() {
                notice(tui, "请先选择会话");
                return Some(vec![]);
            }
            open_overlay_request(app, OverlayRequest::Rename)
        }
        KeyCode::Char('t') if ctrl => {
            let Some(session) = tui.sessions.current() else {
                notice(tui, "请先选择会话");
                return Some(vec![]);
            };
            if session.terminated {
                notice(tui, "会话已结束");
                return Some(vec![]);
            }
            let action = ConfirmAction::TerminateSession {
                session_id: session.id.clone(),
            };
            open_overlay_request(app, OverlayRequest::Confirm(action))
        }
        KeyCode::Char('d') if ctrl => {
            let Some(session) = tui.sessions.current() else {
                notice(tui, "请先选择会话");
                return Some(vec![]);
            };
            let action = ConfirmAction::DeleteSession {
                session_id: session.id.clone(),
                name: session.display_name().to_string(),
            };
            open_overlay_request(app, OverlayRequest::Confirm(action))
        }
        KeyCode::Char('b') if ctrl => {
            tui.sidebar_collapsed = !tui.sidebar_collapsed;
            vec![UiEffect::PersistSidebar {
                collapsed: tui.sidebar_collapsed,
            }]
        }
        KeyCode::Char('p') if ctrl => open_overlay_request(app, OverlayRequest::PersonaPanel),
        KeyCode::Char('g') if ctrl => {
            let Some(session) = tui.sessions.current() else {
                notice(tui, "请先选择会话");
                return Some(vec![]);
            };
            let Some(id) = session.persona_id else {
                notice(tui, "当前会话未使用人格");
                return Some(vec![]);
            };
            open_overlay_request(
                app,
                OverlayRequest::PersonaDetail {
                    id,
                    from_panel: false,
                },
            )
        }
        KeyCode::Char('l') if ctrl => {
            let mut effects = vec![sessions::reload(tui, ListFollowUp::Keep)];
            effects.extend(personas::reload(tui));
            effects
        }
        KeyCode::Up if alt => switch_relative(tui, -1),
        KeyCode::Down if alt => switch_relative(tui, 1),
        KeyCode::PageUp => {
            tui.transcript.apply(TranscriptMutation::PageUp);
            vec![]
        }
        KeyCode::PageDown => {
            tui.transcript.apply(TranscriptMutation::PageDown);
            vec![]
        }
        _ => return None,
    };
    Some(effects)
}

fn switch_relative(tui: &mut TuiState, step: isize) -> Vec<UiEffect> {
    let (effects, mutations) = sessions::switch_relative(tui, step);
    if !effects.is_empty() {
        // The old session's cells stay until the new messages arrive.
        tui.transcript.apply(TranscriptMutation::Clear);
    }
    apply_mutations(tui, mutations);
    effects
}

/// Cancels the rename poll and stops the event loop.
fn quit(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.should_quit = true;
    let mut effects = Vec::new();
    if tui.tasks.rename_poll.is_running() {
        effects.push(UiEffect::CancelTask {
            kind: TaskKind::RenamePoll,
            token: tui.tasks.rename_poll.cancel.clone(),
        });
    }
    effects.push(UiEffect::Quit);
    effects
}

#[cfg(test)]
mod tests {
    use pchat_core::api::ApiError;
    use pchat_core::config::Config;
    use pchat_types::{ChatReply, Message, Role, Session};

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskMeta, TaskStarted};
    use crate::events::{ChatUiEvent, SessionUiEvent};
    use crate::transcript::{END_BANNER, HistoryCell, ScrollMode, THINKING_TEXT};

    fn app() -> AppState {
        AppState::new(Config::default(), "http://localhost:8888".to_string())
    }

    fn session(id: &str, name: &str) -> Session {
        Session {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, key(KeyCode::Char(c)));
        }
    }

    /// Loads `sessions` as the first list, making the first one current.
    fn load(app: &mut AppState, sessions: Vec<Session>) {
        update(
            app,
            UiEvent::Session(SessionUiEvent::ListLoaded {
                sessions,
                follow_up: ListFollowUp::Keep,
            }),
        );
    }

    fn complete(kind: TaskKind, id: TaskId, result: UiEvent) -> UiEvent {
        UiEvent::TaskCompleted {
            kind,
            completed: TaskCompleted {
                id,
                result: Box::new(result),
            },
        }
    }

    fn send_task(effects: &[UiEffect]) -> Option<TaskId> {
        effects.iter().find_map(|e| match e {
            UiEffect::SendMessage { task, .. } => Some(*task),
            _ => None,
        })
    }

    fn send(app: &mut AppState, text: &str) -> Vec<UiEffect> {
        type_text(app, text);
        update(app, key(KeyCode::Enter))
    }

    #[test]
    fn test_send_while_sending_is_noop() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);

        let first = send(&mut app, "你好");
        assert!(send_task(&first).is_some());
        assert!(app.tui.is_sending());

        let second = send(&mut app, "还在吗");
        assert!(send_task(&second).is_none());
        // Only the first exchange reached the transcript.
        assert_eq!(app.tui.transcript.cells().len(), 2);
    }

    #[test]
    fn test_blank_message_is_not_sent() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        let effects = send(&mut app, "   ");
        assert!(effects.is_empty());
        assert!(app.tui.transcript.cells().is_empty());
    }

    #[test]
    fn test_normal_reply_replaces_thinking() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        let effects = send(&mut app, "你好");
        let task = send_task(&effects).expect("send effect");
        assert_eq!(app.tui.transcript.cells()[1].text(), THINKING_TEXT);

        update(
            &mut app,
            complete(
                TaskKind::Send,
                task,
                UiEvent::Chat(ChatUiEvent::Replied {
                    session_id: "s1".to_string(),
                    reply: ChatReply::Message {
                        text: "Hello".to_string(),
                        elapsed_time: "1.2s".to_string(),
                        usage: None,
                        ai_name: Some("Bot".to_string()),
                        ai_avatar: Some("/x.png".to_string()),
                    },
                }),
            ),
        );

        let cells = app.tui.transcript.cells();
        assert_eq!(cells.len(), 2);
        assert!(!cells.iter().any(|c| c.text() == THINKING_TEXT));
        assert_eq!(cells[1].text(), "Hello");
        assert_eq!(cells[1].meta(), Some("响应时间: 1.2s"));
        assert_eq!(app.tui.header.ai_name, "Bot");
        assert_eq!(app.tui.header.ai_avatar, "/x.png");
        assert!(!app.tui.is_sending());
    }

    #[test]
    fn test_termination_reply_disables_session() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        let task = send_task(&send(&mut app, "再见")).expect("send effect");

        let effects = update(
            &mut app,
            complete(
                TaskKind::Send,
                task,
                UiEvent::Chat(ChatUiEvent::Replied {
                    session_id: "s1".to_string(),
                    reply: ChatReply::Terminated {
                        summary: "S".to_string(),
                        end_message: Some("E".to_string()),
                        new_title: Some("T".to_string()),
                    },
                }),
            ),
        );

        let cells = app.tui.transcript.cells();
        assert!(cells.iter().any(|c| matches!(c, HistoryCell::Assistant { .. }) && c.text().contains('S')));
        assert!(cells.iter().any(|c| matches!(c, HistoryCell::Banner { .. }) && c.text().contains('E')));
        assert!(app.tui.input.disabled);
        assert_eq!(app.tui.header.title, "T");
        assert!(app.tui.header.terminated);
        assert!(effects.iter().any(|e| matches!(e, UiEffect::LoadSessions { .. })));

        // Terminate is refused for an ended session, and sending is blocked.
        update(&mut app, ctrl('t'));
        assert!(app.overlay.is_none());
        assert!(send_task(&send(&mut app, "还在吗")).is_none());
    }

    #[test]
    fn test_send_failure_shows_error_and_clears_busy() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        let task = send_task(&send(&mut app, "你好")).expect("send effect");

        update(
            &mut app,
            complete(
                TaskKind::Send,
                task,
                UiEvent::Chat(ChatUiEvent::Failed {
                    session_id: "s1".to_string(),
                    error: ApiError::network("connection refused"),
                }),
            ),
        );

        let last = app.tui.transcript.cells().last().expect("error cell");
        assert_eq!(last.text(), "网络错误: connection refused");
        assert!(!app.tui.is_sending());
    }

    #[test]
    fn test_reply_on_default_name_starts_rename_poll() {
        let mut app = app();
        load(&mut app, vec![session("s1", "新对话")]);
        let task = send_task(&send(&mut app, "你好")).expect("send effect");

        let effects = update(
            &mut app,
            complete(
                TaskKind::Send,
                task,
                UiEvent::Chat(ChatUiEvent::Replied {
                    session_id: "s1".to_string(),
                    reply: ChatReply::Message {
                        text: "Hi".to_string(),
                        elapsed_time: "0.3s".to_string(),
                        usage: None,
                        ai_name: None,
                        ai_avatar: None,
                    },
                }),
            ),
        );
        assert!(effects.iter().any(
            |e| matches!(e, UiEffect::StartRenamePoll { session_id, .. } if session_id == "s1")
        ));
    }

    #[test]
    fn test_poll_cycle_updates_sidebar_name() {
        let mut app = app();
        load(&mut app, vec![session("s1", "新对话")]);
        app.tui.reserve_task(TaskKind::RenamePoll);

        update(
            &mut app,
            UiEvent::Poll(PollUiEvent::Cycle {
                session_id: "s1".to_string(),
                attempt: 2,
                sessions: vec![session("s1", "东京旅行计划")],
            }),
        );
        assert_eq!(app.tui.sessions.sessions()[0].name, "东京旅行计划");
        assert_eq!(app.tui.header.title, "东京旅行计划");
    }

    #[test]
    fn test_deleting_only_session_clears_everything() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        app.tui.transcript.push_cell(HistoryCell::user("你好"));

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Deleted {
                session_id: "s1".to_string(),
            }),
        );
        assert_eq!(app.tui.sessions.current_id(), None);
        assert!(app.tui.transcript.cells().is_empty());
        let Some(UiEffect::LoadSessions { task, follow_up }) = effects.last() else {
            panic!("expected a reload");
        };
        assert_eq!(*follow_up, ListFollowUp::First);

        let effects = update(
            &mut app,
            complete(
                TaskKind::SessionList,
                *task,
                UiEvent::Session(SessionUiEvent::ListLoaded {
                    sessions: vec![],
                    follow_up: ListFollowUp::First,
                }),
            ),
        );
        assert_eq!(app.tui.sessions.current_id(), None);
        assert!(app.tui.transcript.cells().is_empty());
        assert_eq!(app.tui.header.title, "");
        assert!(effects.iter().any(|e| matches!(e, UiEffect::CreateSession { .. })));
    }

    #[test]
    fn test_superseded_completion_is_dropped() {
        let mut app = app();
        let stale = sessions::reload(&mut app.tui, ListFollowUp::Keep);
        let fresh = sessions::reload(&mut app.tui, ListFollowUp::Keep);
        let (UiEffect::LoadSessions { task: stale, .. }, UiEffect::LoadSessions { task: fresh, .. }) =
            (stale, fresh)
        else {
            panic!("expected reloads");
        };

        update(
            &mut app,
            complete(
                TaskKind::SessionList,
                stale,
                UiEvent::Session(SessionUiEvent::ListLoaded {
                    sessions: vec![session("old", "旧")],
                    follow_up: ListFollowUp::Keep,
                }),
            ),
        );
        assert!(app.tui.sessions.is_empty());

        update(
            &mut app,
            complete(
                TaskKind::SessionList,
                fresh,
                UiEvent::Session(SessionUiEvent::ListLoaded {
                    sessions: vec![session("new", "新")],
                    follow_up: ListFollowUp::Keep,
                }),
            ),
        );
        assert_eq!(app.tui.sessions.current_id(), Some("new"));
    }

    #[test]
    fn test_create_switch_survives_newer_reload() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::Created {
                session_id: "new".to_string(),
            }),
        );
        let Some(UiEffect::LoadSessions { task: created, .. }) = effects.first() else {
            panic!("expected a reload");
        };
        let created = *created;

        let effects = update(&mut app, ctrl('l'));
        let refreshed = effects
            .iter()
            .find_map(|e| match e {
                UiEffect::LoadSessions { task, .. } => Some(*task),
                _ => None,
            })
            .expect("ctrl+l reload");

        let list = || vec![session("s1", "旅行"), session("new", "新对话")];
        update(
            &mut app,
            complete(
                TaskKind::SessionList,
                created,
                UiEvent::Session(SessionUiEvent::ListLoaded {
                    sessions: list(),
                    follow_up: ListFollowUp::SwitchTo("new".to_string()),
                }),
            ),
        );
        assert_eq!(app.tui.sessions.current_id(), Some("s1"));

        update(
            &mut app,
            complete(
                TaskKind::SessionList,
                refreshed,
                UiEvent::Session(SessionUiEvent::ListLoaded {
                    sessions: list(),
                    follow_up: ListFollowUp::Keep,
                }),
            ),
        );
        assert_eq!(app.tui.sessions.current_id(), Some("new"));
    }

    #[test]
    fn test_reply_after_mid_send_reload_keeps_stored_messages() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        let task = send_task(&send(&mut app, "hi")).expect("send effect");

        let stored = |role, content: &str| Message {
            role,
            content: content.to_string(),
            ..Default::default()
        };
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::MessagesLoaded {
                session_id: "s1".to_string(),
                messages: vec![stored(Role::User, "我正在思考人生"), stored(Role::Assistant, "嗯")],
            }),
        );
        update(
            &mut app,
            complete(
                TaskKind::Send,
                task,
                UiEvent::Chat(ChatUiEvent::Replied {
                    session_id: "s1".to_string(),
                    reply: ChatReply::Message {
                        text: "Hello".to_string(),
                        elapsed_time: "0.5s".to_string(),
                        usage: None,
                        ai_name: None,
                        ai_avatar: None,
                    },
                }),
            ),
        );

        let texts: Vec<&str> = app.tui.transcript.cells().iter().map(HistoryCell::text).collect();
        assert_eq!(texts, ["我正在思考人生", "嗯", "Hello"]);
    }

    #[test]
    fn test_ctrl_c_cancels_poll_and_quits() {
        let mut app = app();
        let id = app.tui.reserve_task(TaskKind::RenamePoll);
        let token = tokio_util::sync::CancellationToken::new();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::RenamePoll,
                started: TaskStarted {
                    id,
                    cancel: Some(token.clone()),
                    meta: TaskMeta::Session {
                        session_id: "s1".to_string(),
                    },
                },
            },
        );

        let effects = update(&mut app, ctrl('c'));
        assert!(app.tui.should_quit);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask { kind: TaskKind::RenamePoll, token: Some(_) }, UiEffect::Quit]
        ));
    }

    #[test]
    fn test_rename_overlay_flow() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);

        update(&mut app, ctrl('r'));
        assert!(matches!(app.overlay, Some(Overlay::Rename(_))));
        // Clear the pre-filled name and submit empty.
        update(&mut app, ctrl('u'));
        update(&mut app, key(KeyCode::Enter));
        let Some(Overlay::Rename(rename)) = &app.overlay else {
            panic!("rename stays open on empty name");
        };
        assert_eq!(rename.error.as_deref(), Some("名称不能为空"));

        type_text(&mut app, "东京");
        let effects = update(&mut app, key(KeyCode::Enter));
        assert!(app.overlay.is_none());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::RenameSession { name, .. }] if name == "东京"
        ));
    }

    #[test]
    fn test_delete_confirm_declined_makes_no_call() {
        let mut app = app();
        load(&mut app, vec![session("s1", "旅行")]);
        update(&mut app, ctrl('d'));
        assert!(matches!(app.overlay, Some(Overlay::Confirm(_))));
        let effects = update(&mut app, key(KeyCode::Esc));
        assert!(effects.is_empty());
        assert!(app.overlay.is_none());
    }

    #[test]
    fn test_use_persona_without_session() {
        let mut app = app();
        app.tui.personas.replace(vec![pchat_types::Persona {
            id: 1,
            name: "小雪".to_string(),
            ..Default::default()
        }]);
        update(&mut app, ctrl('p'));
        let effects = update(&mut app, key(KeyCode::Char('u')));
        assert!(effects.is_empty());
        let Some(Overlay::PersonaPanel(panel)) = &app.overlay else {
            panic!("panel stays open");
        };
        assert_eq!(panel.error.as_deref(), Some("请先选择会话"));
    }

    #[test]
    fn test_sidebar_toggle_persists() {
        let mut app = app();
        let effects = update(&mut app, ctrl('b'));
        assert!(app.tui.sidebar_collapsed);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::PersistSidebar { collapsed: true }]
        ));
    }

    #[test]
    fn test_page_up_anchors_scroll() {
        let mut app = app();
        app.tui.transcript.scroll.cached_line_count = 100;
        app.tui.transcript.viewport_height = 20;
        update(&mut app, key(KeyCode::PageUp));
        assert_eq!(
            app.tui.transcript.scroll.mode,
            ScrollMode::Anchored { offset: 62 }
        );
    }

    #[test]
    fn test_terminated_session_renders_banner_on_load() {
        let mut app = app();
        let mut ended = session("s1", "旅行");
        ended.terminated = true;
        load(&mut app, vec![ended]);
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::MessagesLoaded {
                session_id: "s1".to_string(),
                messages: vec![],
            }),
        );
        assert!(app.tui.input.disabled);
        assert_eq!(
            app.tui.transcript.cells().last().map(HistoryCell::text),
            Some(END_BANNER)
        );
    }
}
