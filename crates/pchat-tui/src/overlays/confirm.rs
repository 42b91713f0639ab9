//! Yes/no confirmation for destructive actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{OverlayRequest, OverlayUpdate};
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::mutations::{StateMutation, StatusMutation};
use crate::state::TuiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    TerminateSession { session_id: String },
    DeleteSession { session_id: String, name: String },
    DeletePersona { id: u64, name: String },
}

impl ConfirmAction {
    fn title(&self) -> &'static str {
        match self {
            ConfirmAction::TerminateSession { .. } => "终止会话",
            ConfirmAction::DeleteSession { .. } => "删除会话",
            ConfirmAction::DeletePersona { .. } => "删除人格",
        }
    }

    fn prompt(&self) -> String {
        match self {
            ConfirmAction::TerminateSession { .. } => "确定要终止本次会话吗？".to_string(),
            ConfirmAction::DeleteSession { name, .. } => {
                format!("确定要删除「{name}」及所有消息吗？此操作不可恢复！")
            }
            ConfirmAction::DeletePersona { name, .. } => format!("确定要删除人格「{name}」吗？"),
        }
    }

    /// Where Esc and confirm go afterwards.
    fn after(&self) -> OverlayUpdate {
        match self {
            ConfirmAction::DeletePersona { .. } => OverlayUpdate::open(OverlayRequest::PersonaPanel),
            _ => OverlayUpdate::close(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub action: ConfirmAction,
}

impl ConfirmState {
    pub fn open(action: ConfirmAction) -> Self {
        Self { action }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_confirm(frame, self, area);
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                let effect = match &self.action {
                    ConfirmAction::TerminateSession { session_id } => UiEffect::TerminateSession {
                        task: tui.reserve_task(TaskKind::SessionTerminate),
                        session_id: session_id.clone(),
                    },
                    ConfirmAction::DeleteSession { session_id, .. } => UiEffect::DeleteSession {
                        task: tui.reserve_task(TaskKind::SessionDelete),
                        session_id: session_id.clone(),
                    },
                    ConfirmAction::DeletePersona { id, .. } => UiEffect::DeletePersona {
                        task: tui.reserve_task(TaskKind::PersonaDelete),
                        id: *id,
                    },
                };
                let progress = match &self.action {
                    ConfirmAction::TerminateSession { .. } => "正在终止会话…",
                    ConfirmAction::DeleteSession { .. } => "正在删除会话…",
                    ConfirmAction::DeletePersona { .. } => "正在删除人格…",
                };
                self.action
                    .after()
                    .with_ui_effects(vec![effect])
                    .with_mutations(vec![StateMutation::Status(StatusMutation::Info(
                        progress.to_string(),
                    ))])
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.action.after(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }
}

fn render_confirm(frame: &mut Frame, state: &ConfirmState, area: Rect) {
    use super::render_utils::{InputHint, OverlayConfig, render_overlay};

    let hints = [InputHint::new("y", "确定"), InputHint::new("n/Esc", "取消")];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: state.action.title(),
            border_color: Color::Red,
            width: 52,
            height: 7,
            hints: &hints,
        },
    );
    let prompt = Paragraph::new(Line::from(Span::styled(
        state.action.prompt(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(prompt, layout.body);
}
