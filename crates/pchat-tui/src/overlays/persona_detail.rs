//! Read-only view of one persona.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pchat_types::Persona;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{OverlayRequest, OverlayUpdate};
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct PersonaDetailState {
    pub id: u64,
    pub persona: Option<Persona>,
    pub error: Option<String>,
    /// Esc goes back to the panel instead of closing.
    pub from_panel: bool,
}

impl PersonaDetailState {
    /// Shows the cached persona, or fetches it when the cache misses.
    pub fn open(tui: &mut TuiState, id: u64, from_panel: bool) -> (Self, Vec<UiEffect>) {
        let persona = tui.personas.find(id).cloned();
        let effects = if persona.is_none() {
            vec![UiEffect::FetchPersona {
                task: tui.reserve_task(TaskKind::PersonaFetch),
                id,
            }]
        } else {
            vec![]
        };
        (
            Self {
                id,
                persona,
                error: None,
                from_panel,
            },
            effects,
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_persona_detail(frame, self, area);
    }

    pub fn handle_key(&mut self, _tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            // Only once loaded; a fetched persona is cached by then.
            KeyCode::Char('e') if self.persona.is_some() => {
                OverlayUpdate::open(OverlayRequest::PersonaEditor {
                    persona_id: Some(self.id),
                })
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                if self.from_panel {
                    OverlayUpdate::open(OverlayRequest::PersonaPanel)
                } else {
                    OverlayUpdate::close()
                }
            }
            _ => OverlayUpdate::stay(),
        }
    }
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    let value = if value.is_empty() { "—" } else { value };
    Line::from(vec![
        Span::styled(
            format!("{label}  "),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.to_string()),
    ])
}

fn render_persona_detail(frame: &mut Frame, state: &PersonaDetailState, area: Rect) {
    use super::render_utils::{InputHint, OverlayConfig, render_message, render_overlay};

    let hints = [InputHint::new("e", "编辑"), InputHint::new("Esc", "返回")];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "人格详情",
            border_color: Color::Magenta,
            width: 64,
            height: 16,
            hints: &hints,
        },
    );

    let Some(persona) = &state.persona else {
        match &state.error {
            Some(error) => render_message(frame, layout.body, error, Color::Red),
            None => render_message(frame, layout.body, "加载中…", Color::DarkGray),
        }
        return;
    };

    let mut lines = vec![
        field_line("名称", &persona.name),
        field_line("头像", &persona.avatar),
        field_line("身份", &persona.identity),
        field_line("外貌", &persona.appearance),
        field_line("性格", &persona.personality),
    ];
    if let Some(created) = &persona.created_at {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("创建于 {created}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(updated) = &persona.updated_at {
        lines.push(Line::from(Span::styled(
            format!("更新于 {updated}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        layout.body,
    );
}
