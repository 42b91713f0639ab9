//! Persona list: create, edit, delete, inspect, and apply to the current
//! session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::confirm::ConfirmAction;
use super::{OverlayRequest, OverlayUpdate};
use crate::common::{TaskKind, truncate_with_ellipsis};
use crate::effects::UiEffect;
use crate::state::TuiState;

const PANEL_WIDTH: u16 = 60;
const MAX_VISIBLE: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct PersonaPanelState {
    pub selected: usize,
    pub offset: usize,
    /// Failure of the last panel action, shown above the hints.
    pub error: Option<String>,
}

impl PersonaPanelState {
    /// Opens the panel and refreshes the persona list.
    pub fn open(tui: &mut TuiState) -> (Self, Vec<UiEffect>) {
        let effects = if tui.tasks.persona_list.is_running() {
            vec![]
        } else {
            vec![UiEffect::LoadPersonas {
                task: tui.reserve_task(TaskKind::PersonaList),
            }]
        };
        (Self::default(), effects)
    }

    /// Keeps the selection inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        self.selected = self.selected.min(len - 1);
        self.offset = self.offset.min(self.selected);
        if self.selected >= self.offset + MAX_VISIBLE {
            self.offset = self.selected + 1 - MAX_VISIBLE;
        }
    }

    fn move_selection(&mut self, up: bool, len: usize) {
        if up {
            self.selected = self.selected.saturating_sub(1);
        } else {
            self.selected += 1;
        }
        self.clamp(len);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        render_persona_panel(frame, self, area, tui);
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let len = tui.personas.len();
        let selected = tui.personas.get(self.selected).cloned();

        if !matches!(key.code, KeyCode::Up | KeyCode::Down) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(true, len);
                OverlayUpdate::stay()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(false, len);
                OverlayUpdate::stay()
            }
            KeyCode::Char('n') => {
                OverlayUpdate::open(OverlayRequest::PersonaEditor { persona_id: None })
            }
            KeyCode::Char('e') => match selected {
                Some(persona) => OverlayUpdate::open(OverlayRequest::PersonaEditor {
                    persona_id: Some(persona.id),
                }),
                None => OverlayUpdate::stay(),
            },
            KeyCode::Char('d') => match selected {
                Some(persona) => OverlayUpdate::open(OverlayRequest::Confirm(
                    ConfirmAction::DeletePersona {
                        id: persona.id,
                        name: persona.name,
                    },
                )),
                None => OverlayUpdate::stay(),
            },
            KeyCode::Enter => match selected {
                Some(persona) => OverlayUpdate::open(OverlayRequest::PersonaDetail {
                    id: persona.id,
                    from_panel: true,
                }),
                None => OverlayUpdate::stay(),
            },
            KeyCode::Char('u') => {
                let Some(persona) = selected else {
                    return OverlayUpdate::stay();
                };
                let Some(session_id) = tui.sessions.current_id().map(str::to_string) else {
                    self.error = Some("请先选择会话".to_string());
                    return OverlayUpdate::stay();
                };
                if tui.tasks.persona_use.is_running() {
                    return OverlayUpdate::stay();
                }
                OverlayUpdate::stay().with_ui_effects(vec![UiEffect::UsePersona {
                    task: tui.reserve_task(TaskKind::PersonaUse),
                    session_id,
                    persona_id: persona.id,
                }])
            }
            KeyCode::Char('r') if !tui.tasks.persona_list.is_running() => OverlayUpdate::stay()
                .with_ui_effects(vec![UiEffect::LoadPersonas {
                    task: tui.reserve_task(TaskKind::PersonaList),
                }]),
            _ => OverlayUpdate::stay(),
        }
    }
}

fn render_persona_panel(frame: &mut Frame, panel: &PersonaPanelState, area: Rect, tui: &TuiState) {
    use super::render_utils::{InputHint, OverlayConfig, render_message, render_overlay};

    let visible = tui.personas.len().clamp(1, MAX_VISIBLE) as u16;
    let hints = [
        InputHint::new("n", "新建"),
        InputHint::new("e", "编辑"),
        InputHint::new("d", "删除"),
        InputHint::new("u", "应用"),
        InputHint::new("Enter", "详情"),
        InputHint::new("Esc", "关闭"),
    ];
    let title = format!("人格 ({})", tui.personas.len());
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: &title,
            border_color: Color::Magenta,
            width: PANEL_WIDTH,
            height: visible + 5,
            hints: &hints,
        },
    );

    let list_height = layout.body.height.saturating_sub(2);
    let list_area = Rect::new(layout.body.x, layout.body.y, layout.body.width, list_height);
    let message_area = Rect::new(
        layout.body.x,
        layout.body.y + list_height + 1,
        layout.body.width,
        1,
    );

    if tui.personas.is_empty() {
        let text = if tui.personas.loaded {
            "暂无人格，按 n 新建"
        } else {
            "加载中…"
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            list_area,
        );
    } else {
        let current_persona = tui.sessions.current().and_then(|s| s.persona_id);
        let name_width = (layout.body.width as usize).saturating_sub(4);
        let items: Vec<ListItem> = tui
            .personas
            .personas()
            .iter()
            .skip(panel.offset)
            .take(list_height as usize)
            .map(|persona| {
                let marker = if current_persona == Some(persona.id) {
                    "● "
                } else {
                    "  "
                };
                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::raw(truncate_with_ellipsis(&persona.name, name_width / 2)),
                ];
                if !persona.identity.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", truncate_with_ellipsis(&persona.identity, name_width / 2)),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::Magenta)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶");
        let mut list_state = ListState::default();
        list_state.select(Some(panel.selected.saturating_sub(panel.offset)));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    if let Some(error) = &panel.error {
        render_message(frame, message_area, error, Color::Red);
    } else if tui.tasks.persona_use.is_running() {
        render_message(frame, message_area, "正在应用人格…", Color::DarkGray);
    }
}
