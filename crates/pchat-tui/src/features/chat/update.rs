//! Send-message flow.
//!
//! `Idle → Sending → Idle`, or `Idle → Sending → Terminated` when the
//! backend ends the session in its reply. The send slot doubles as the busy
//! flag: it is claimed when the effect is emitted and released when the
//! completion arrives, success or not.

use pchat_core::api::ApiError;
use pchat_types::ChatReply;
use tracing::debug;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::ChatUiEvent;
use crate::mutations::{InputMutation, StateMutation, StatusMutation, TranscriptMutation};
use crate::sessions::{self, ListFollowUp};
use crate::state::TuiState;
use crate::transcript::{END_BANNER, HistoryCell};

/// Meta line under a summary bubble.
pub const SUMMARY_META: &str = "对话总结";

/// Sends the composer text to the current session.
///
/// No-op while a send is in flight, without a current session, on a
/// terminated session, or for blank input.
pub fn submit(tui: &mut TuiState, text: &str) -> (Vec<UiEffect>, Vec<StateMutation>) {
    if tui.is_sending() || tui.input.disabled {
        return (vec![], vec![]);
    }
    let Some(session) = tui.sessions.current() else {
        return (vec![], vec![]);
    };
    if session.terminated {
        return (vec![], vec![]);
    }
    let message = text.trim();
    if message.is_empty() {
        return (vec![], vec![]);
    }
    let session_id = session.id.clone();

    let mutations = vec![
        StateMutation::Transcript(TranscriptMutation::Append(HistoryCell::user(message))),
        StateMutation::Transcript(TranscriptMutation::Append(HistoryCell::thinking())),
        StateMutation::Input(InputMutation::Clear),
    ];
    let effects = vec![UiEffect::SendMessage {
        task: tui.reserve_task(TaskKind::Send),
        session_id,
        text: message.to_string(),
    }];
    (effects, mutations)
}

pub fn handle_chat_event(
    tui: &mut TuiState,
    event: ChatUiEvent,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match event {
        ChatUiEvent::Replied { session_id, reply } => handle_reply(tui, &session_id, reply),
        ChatUiEvent::Failed { session_id, error } => {
            if !tui.sessions.is_current(&session_id) {
                debug!(session_id, "send failed for a session that is no longer current");
                return (vec![], vec![]);
            }
            (
                vec![],
                vec![
                    StateMutation::Transcript(TranscriptMutation::RemoveThinking),
                    StateMutation::Transcript(TranscriptMutation::Append(HistoryCell::error(
                        failure_text(&error),
                    ))),
                ],
            )
        }
    }
}

fn failure_text(error: &ApiError) -> String {
    if error.is_network() {
        format!("网络错误: {}", error.message)
    } else {
        format!("发送失败: {}", error.message)
    }
}

fn handle_reply(
    tui: &mut TuiState,
    session_id: &str,
    reply: ChatReply,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let is_current = tui.sessions.is_current(session_id);
    let mut effects = Vec::new();
    let mut mutations = Vec::new();
    if is_current {
        mutations.push(StateMutation::Transcript(TranscriptMutation::RemoveThinking));
    }

    match reply {
        ChatReply::Terminated {
            summary,
            end_message,
            new_title,
        } => {
            if let Some(session) = tui.sessions.find_mut(session_id) {
                session.terminated = true;
            }
            if is_current {
                let banner = end_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| END_BANNER.to_string());
                mutations.extend([
                    StateMutation::Transcript(TranscriptMutation::Append(HistoryCell::assistant(
                        summary,
                        Some(SUMMARY_META.to_string()),
                    ))),
                    StateMutation::Transcript(TranscriptMutation::Append(HistoryCell::banner(
                        banner,
                    ))),
                    StateMutation::Input(InputMutation::SetDisabled(true)),
                ]);
                tui.header.terminated = true;
                if let Some(title) = new_title {
                    tui.header.title = title;
                }
            }
            effects.push(sessions::reload(tui, ListFollowUp::Keep));
        }
        ChatReply::Message {
            text,
            elapsed_time,
            usage,
            ai_name,
            ai_avatar,
        } => {
            if !is_current {
                return (effects, mutations);
            }
            mutations.push(StateMutation::Transcript(TranscriptMutation::Append(
                HistoryCell::assistant(text, Some(format!("响应时间: {elapsed_time}"))),
            )));
            mutations.push(StateMutation::Status(StatusMutation::ReplyStats {
                elapsed: elapsed_time,
                usage,
            }));
            if let Some(name) = ai_name.filter(|n| !n.is_empty()) {
                tui.header.ai_name = name;
            }
            if let Some(avatar) = ai_avatar.filter(|a| !a.is_empty()) {
                tui.header.ai_avatar = avatar;
            }
            let needs_title = tui
                .sessions
                .current()
                .is_some_and(pchat_types::Session::has_default_name);
            if needs_title && let Some(effect) = sessions::start_rename_poll(tui, session_id) {
                effects.push(effect);
            }
        }
    }
    (effects, mutations)
}
