//! Session feature reducer.
//!
//! Handles list reloads, switching, and the results of create, rename,
//! terminate and delete. Every mutation ends with a full list reload; the
//! reload's `ListFollowUp` decides where the current session lands.

use pchat_types::Message;
use tracing::debug;

use super::state::ListFollowUp;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::SessionUiEvent;
use crate::header::HeaderState;
use crate::mutations::{InputMutation, StateMutation, StatusMutation, TranscriptMutation};
use crate::state::TuiState;
use crate::transcript::{END_BANNER, HistoryCell};

/// Reloads the session list. The follow-up is also queued on the store,
/// since a newer reload supersedes this one's result.
pub fn reload(tui: &mut TuiState, follow_up: ListFollowUp) -> UiEffect {
    tui.sessions.queue_follow_up(follow_up.clone());
    UiEffect::LoadSessions {
        task: tui.reserve_task(TaskKind::SessionList),
        follow_up,
    }
}

/// Creates a session with the configured defaults. `None` while a create
/// is already in flight.
pub fn create(tui: &mut TuiState) -> Option<UiEffect> {
    if tui.tasks.session_create.is_running() {
        return None;
    }
    Some(UiEffect::CreateSession {
        task: tui.reserve_task(TaskKind::SessionCreate),
    })
}

/// Makes `id` current and reloads its messages.
pub fn switch_to(tui: &mut TuiState, id: &str) -> (Vec<UiEffect>, Vec<StateMutation>) {
    if !tui.sessions.select(id) {
        return (vec![], vec![]);
    }
    let Some(session) = tui.sessions.current() else {
        return (vec![], vec![]);
    };
    tui.header = HeaderState::from_session(session);
    let terminated = session.terminated;
    let session_id = session.id.clone();

    let mutations = vec![
        StateMutation::Input(InputMutation::SetDisabled(terminated)),
        StateMutation::Status(StatusMutation::ClearStats),
    ];
    let effects = vec![UiEffect::LoadMessages {
        task: tui.reserve_task(TaskKind::MessageLoad),
        session_id,
    }];
    (effects, mutations)
}

/// Moves `step` rows up or down the sidebar.
pub fn switch_relative(tui: &mut TuiState, step: isize) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let Some(target) = tui.sessions.neighbor(step).map(|s| s.id.clone()) else {
        return (vec![], vec![]);
    };
    if tui.sessions.is_current(&target) {
        return (vec![], vec![]);
    }
    switch_to(tui, &target)
}

/// Starts the rename poll for `session_id` unless one is already running.
pub fn start_rename_poll(tui: &mut TuiState, session_id: &str) -> Option<UiEffect> {
    if tui.tasks.rename_poll.is_running() {
        return None;
    }
    Some(UiEffect::StartRenamePoll {
        task: tui.reserve_task(TaskKind::RenamePoll),
        session_id: session_id.to_string(),
    })
}

/// Replaces the cached list and settles the current session.
///
/// - empty list: clear current, transcript and header, then auto-create;
/// - current still present (and no explicit switch): refresh the header;
/// - otherwise switch to the resolved session and reload its messages.
pub fn apply_list(
    tui: &mut TuiState,
    sessions: Vec<pchat_types::Session>,
    follow_up: &ListFollowUp,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let previous = tui.sessions.current_id().map(str::to_string);
    tui.sessions.replace(sessions);

    let Some(target) = tui.sessions.resolve(follow_up).cloned() else {
        tui.sessions.clear_current();
        tui.header.clear();
        let mutations = vec![
            StateMutation::Transcript(TranscriptMutation::Clear),
            StateMutation::Input(InputMutation::SetDisabled(false)),
        ];
        return (create(tui).into_iter().collect(), mutations);
    };

    let unchanged = previous.as_deref() == Some(target.id.as_str());
    if unchanged && *follow_up == ListFollowUp::Keep {
        tui.header = HeaderState::from_session(&target);
        let mutations = vec![StateMutation::Input(InputMutation::SetDisabled(
            target.terminated,
        ))];
        return (vec![], mutations);
    }
    switch_to(tui, &target.id)
}

/// Rebuilds transcript cells from stored messages.
pub fn cells_from_messages(messages: &[Message], terminated: bool) -> Vec<HistoryCell> {
    let mut cells: Vec<HistoryCell> = messages
        .iter()
        .filter(|m| !m.is_hidden())
        .map(|m| {
            if m.is_assistant() {
                HistoryCell::assistant(&m.content, m.meta().map(str::to_string))
            } else {
                HistoryCell::user(&m.content)
            }
        })
        .collect();
    if terminated {
        cells.push(HistoryCell::banner(END_BANNER));
    }
    cells
}

pub fn handle_session_event(
    tui: &mut TuiState,
    event: SessionUiEvent,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match event {
        SessionUiEvent::ListLoaded {
            sessions,
            follow_up,
        } => {
            let follow_up = tui.sessions.take_follow_up(follow_up);
            apply_list(tui, sessions, &follow_up)
        }
        SessionUiEvent::ListFailed { error } => {
            tui.sessions.take_follow_up(ListFollowUp::Keep);
            let notice = StatusMutation::failure("加载会话失败:", &error);
            (vec![], vec![StateMutation::Status(notice)])
        }
        SessionUiEvent::MessagesLoaded {
            session_id,
            messages,
        } => {
            let Some(session) = tui.sessions.current().filter(|s| s.id == session_id) else {
                debug!(session_id, "dropping messages for a session that is no longer current");
                return (vec![], vec![]);
            };
            let terminated = session.terminated;
            let mutations = vec![
                StateMutation::Transcript(TranscriptMutation::ReplaceAll(cells_from_messages(
                    &messages, terminated,
                ))),
                StateMutation::Input(InputMutation::SetDisabled(terminated)),
                StateMutation::Transcript(TranscriptMutation::ScrollToBottom),
            ];
            (vec![], mutations)
        }
        SessionUiEvent::MessagesFailed { session_id, error } => {
            if !tui.sessions.is_current(&session_id) {
                return (vec![], vec![]);
            }
            (
                vec![],
                vec![StateMutation::Status(StatusMutation::failure(
                    "加载消息失败:",
                    &error,
                ))],
            )
        }
        SessionUiEvent::Created { session_id } => {
            (vec![reload(tui, ListFollowUp::SwitchTo(session_id))], vec![])
        }
        SessionUiEvent::CreateFailed { error } => (
            vec![],
            vec![StateMutation::Status(StatusMutation::failure(
                "创建会话失败:",
                &error,
            ))],
        ),
        SessionUiEvent::Renamed { session_id } => (
            vec![reload(tui, ListFollowUp::SwitchTo(session_id))],
            vec![StateMutation::Status(StatusMutation::Info(
                "已重命名".to_string(),
            ))],
        ),
        SessionUiEvent::RenameFailed { error } => (
            vec![],
            vec![StateMutation::Status(StatusMutation::failure(
                "重命名失败！",
                &error,
            ))],
        ),
        SessionUiEvent::Terminated {
            session_id,
            new_title,
        } => {
            if let Some(session) = tui.sessions.find_mut(&session_id) {
                session.terminated = true;
            }
            if tui.sessions.is_current(&session_id) {
                tui.header.terminated = true;
                if let Some(title) = new_title {
                    tui.header.title = title;
                }
            }
            (
                vec![reload(tui, ListFollowUp::ReloadMessages)],
                vec![StateMutation::Input(InputMutation::SetDisabled(
                    tui.header.terminated,
                ))],
            )
        }
        SessionUiEvent::TerminateFailed { error } => (
            vec![],
            vec![StateMutation::Status(StatusMutation::failure(
                "终止失败！",
                &error,
            ))],
        ),
        SessionUiEvent::Deleted { session_id } => {
            let mut effects = Vec::new();
            let mut mutations = Vec::new();
            if tui.tasks.rename_poll.meta.session_id() == Some(session_id.as_str()) {
                effects.push(UiEffect::CancelTask {
                    kind: TaskKind::RenamePoll,
                    token: tui.tasks.rename_poll.cancel.clone(),
                });
            }
            if tui.sessions.is_current(&session_id) {
                tui.sessions.clear_current();
                tui.header.clear();
                mutations.push(StateMutation::Transcript(TranscriptMutation::Clear));
            }
            effects.push(reload(tui, ListFollowUp::First));
            (effects, mutations)
        }
        SessionUiEvent::DeleteFailed { error } => (
            vec![],
            vec![StateMutation::Status(StatusMutation::failure(
                "删除失败！",
                &error,
            ))],
        ),
    }
}
