//! Create/edit form for a persona.
//!
//! One form serves both: an `id` means update, none means create. The
//! avatar field holds either a URL or, before upload, a local file path;
//! `Ctrl+U` uploads that path and swaps in the returned URL.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pchat_core::api::validate_avatar_path;
use pchat_types::{Persona, PersonaDraft};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::{OverlayRequest, OverlayUpdate};
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::input::{TextBuffer, edit_buffer};
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Avatar,
    Identity,
    Appearance,
    Personality,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Avatar,
        Field::Identity,
        Field::Appearance,
        Field::Personality,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Name => "名称",
            Field::Avatar => "头像",
            Field::Identity => "身份",
            Field::Appearance => "外貌",
            Field::Personality => "性格",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "必填",
            Field::Avatar => "URL，或本地图片路径后按 Ctrl+U 上传",
            Field::Identity => "例如：旅行博主",
            Field::Appearance => "外貌描述",
            Field::Personality => "性格描述",
        }
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct PersonaEditorState {
    pub id: Option<u64>,
    fields: [TextBuffer; 5],
    pub focus: Field,
    pub error: Option<String>,
}

impl PersonaEditorState {
    /// Opens pre-filled from the cache, or blank for a new persona with only
    /// the avatar seeded from `default_avatar`.
    pub fn open(persona: Option<&Persona>, default_avatar: &str) -> Self {
        let draft = persona.map_or_else(
            || PersonaDraft {
                avatar: default_avatar.to_string(),
                ..PersonaDraft::default()
            },
            Persona::to_draft,
        );
        Self {
            id: draft.id,
            fields: [
                TextBuffer::from_text(&draft.name),
                TextBuffer::from_text(&draft.avatar),
                TextBuffer::from_text(&draft.identity),
                TextBuffer::from_text(&draft.appearance),
                TextBuffer::from_text(&draft.personality),
            ],
            focus: Field::Name,
            error: None,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields[field.index()].text()
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        self.fields[field.index()].set_text(value);
    }

    /// Trimmed form contents.
    pub fn draft(&self) -> PersonaDraft {
        PersonaDraft {
            id: self.id,
            name: self.field(Field::Name).trim().to_string(),
            avatar: self.field(Field::Avatar).trim().to_string(),
            identity: self.field(Field::Identity).trim().to_string(),
            appearance: self.field(Field::Appearance).trim().to_string(),
            personality: self.field(Field::Personality).trim().to_string(),
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let len = Field::ALL.len();
        let index = self.focus.index();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.focus = Field::ALL[next];
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        render_persona_editor(frame, self, area, tui);
    }

    pub fn handle_key(&mut self, tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let plain_enter = key.code == KeyCode::Enter && key.modifiers.is_empty();

        match key.code {
            KeyCode::Esc => return OverlayUpdate::open(OverlayRequest::PersonaPanel),
            KeyCode::Char('c') if ctrl => return OverlayUpdate::close(),
            KeyCode::Tab => {
                self.cycle_focus(true);
                return OverlayUpdate::stay();
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return OverlayUpdate::stay();
            }
            KeyCode::Char('s') if ctrl => return self.save(tui),
            KeyCode::Char('u') if ctrl => return self.upload(tui),
            KeyCode::Enter if plain_enter => {
                if self.focus == Field::Personality {
                    return self.save(tui);
                }
                self.cycle_focus(true);
                return OverlayUpdate::stay();
            }
            _ => {}
        }

        let index = self.focus.index();
        if edit_buffer(&mut self.fields[index], key) {
            self.error = None;
        }
        OverlayUpdate::stay()
    }

    pub fn handle_paste(&mut self, text: &str) {
        let index = self.focus.index();
        self.fields[index].insert_str(text);
    }

    fn save(&mut self, tui: &mut TuiState) -> OverlayUpdate {
        let draft = self.draft();
        if draft.name.is_empty() {
            self.error = Some("名称不能为空".to_string());
            self.focus = Field::Name;
            return OverlayUpdate::stay();
        }
        if tui.tasks.persona_save.is_running() {
            return OverlayUpdate::stay();
        }
        self.error = None;
        OverlayUpdate::stay().with_ui_effects(vec![UiEffect::SavePersona {
            task: tui.reserve_task(TaskKind::PersonaSave),
            draft,
        }])
    }

    fn upload(&mut self, tui: &mut TuiState) -> OverlayUpdate {
        let raw = self.field(Field::Avatar).trim();
        if raw.is_empty() {
            self.error = Some("请在头像栏输入图片路径".to_string());
            self.focus = Field::Avatar;
            return OverlayUpdate::stay();
        }
        let path = PathBuf::from(raw);
        if let Err(error) = validate_avatar_path(&path) {
            self.error = Some(error.message);
            return OverlayUpdate::stay();
        }
        if tui.tasks.avatar_upload.is_running() {
            return OverlayUpdate::stay();
        }
        self.error = None;
        OverlayUpdate::stay().with_ui_effects(vec![UiEffect::UploadAvatar {
            task: tui.reserve_task(TaskKind::AvatarUpload),
            path,
        }])
    }
}

fn render_persona_editor(frame: &mut Frame, editor: &PersonaEditorState, area: Rect, tui: &TuiState) {
    use super::render_utils::{
        InputHint, InputLine, OverlayConfig, render_input_line, render_message, render_overlay,
        render_separator,
    };

    let hints = [
        InputHint::new("Tab", "切换"),
        InputHint::new("Ctrl+U", "上传头像"),
        InputHint::new("Ctrl+S", "保存"),
        InputHint::new("Esc", "返回"),
    ];
    let title = if editor.id.is_some() {
        "编辑人格"
    } else {
        "新建人格"
    };
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title,
            border_color: Color::Magenta,
            width: 64,
            height: Field::ALL.len() as u16 + 6,
            hints: &hints,
        },
    );

    for (row, field) in Field::ALL.iter().enumerate() {
        render_input_line(
            frame,
            Rect::new(layout.body.x, layout.body.y + row as u16, layout.body.width, 1),
            &InputLine {
                label: field.label(),
                value: editor.field(*field),
                placeholder: field.placeholder(),
                focused: editor.focus == *field,
                accent: Color::Magenta,
            },
        );
    }
    let rows = Field::ALL.len() as u16;
    render_separator(frame, layout.body, rows);

    let message_area = Rect::new(layout.body.x, layout.body.y + rows + 1, layout.body.width, 2);
    if let Some(error) = &editor.error {
        render_message(frame, message_area, error, Color::Red);
    } else if tui.tasks.avatar_upload.is_running() {
        render_message(frame, message_area, "正在上传头像…", Color::DarkGray);
    } else if tui.tasks.persona_save.is_running() {
        render_message(frame, message_area, "正在保存…", Color::DarkGray);
    }
}
