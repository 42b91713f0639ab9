//! Rename overlay for the current session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::OverlayUpdate;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct RenameState {
    pub input: String,
    pub session_id: String,
    pub error: Option<String>,
}

impl RenameState {
    /// Opens pre-filled with the session's current name.
    pub fn open(session_id: String, current_name: &str) -> Self {
        Self {
            input: current_name.to_string(),
            session_id,
            error: None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_rename_overlay(frame, self, area);
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Enter => {
                let name = self.input.trim();
                if name.is_empty() {
                    self.error = Some("名称不能为空".to_string());
                    OverlayUpdate::stay()
                } else if tui.tasks.session_rename.is_running() {
                    self.error = Some("正在重命名…".to_string());
                    OverlayUpdate::stay()
                } else {
                    let effect = UiEffect::RenameSession {
                        task: tui.reserve_task(TaskKind::SessionRename),
                        session_id: self.session_id.clone(),
                        name: name.to_string(),
                    };
                    OverlayUpdate::close().with_ui_effects(vec![effect])
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.input
            .extend(text.chars().filter(|c| !c.is_control()));
    }
}

fn render_rename_overlay(frame: &mut Frame, state: &RenameState, area: Rect) {
    use super::render_utils::{
        InputHint, InputLine, OverlayConfig, render_input_line, render_message, render_overlay,
        render_separator,
    };

    let hints = [InputHint::new("Enter", "保存"), InputHint::new("Esc", "取消")];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "重命名会话",
            border_color: Color::Yellow,
            width: 50,
            height: 7,
            hints: &hints,
        },
    );

    render_input_line(
        frame,
        Rect::new(layout.body.x, layout.body.y, layout.body.width, 1),
        &InputLine {
            label: "名称",
            value: &state.input,
            placeholder: "输入新的会话名称",
            focused: true,
            accent: Color::Yellow,
        },
    );
    render_separator(frame, layout.body, 1);

    let message_area = Rect::new(layout.body.x, layout.body.y + 2, layout.body.width, 1);
    match &state.error {
        Some(error) => render_message(frame, message_area, error, Color::Red),
        None => render_message(frame, message_area, "为当前会话输入新名称", Color::DarkGray),
    }
}
