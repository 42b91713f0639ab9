//! Chat header: AI name, avatar URL, session title, end marker.

use pchat_types::Session;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::truncate_with_ellipsis;

/// Name shown when a session has no AI name.
pub const DEFAULT_AI_NAME: &str = "AI助手";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderState {
    pub ai_name: String,
    pub ai_avatar: String,
    pub title: String,
    pub terminated: bool,
}

impl HeaderState {
    pub fn from_session(session: &Session) -> Self {
        Self {
            ai_name: session.ai_name.clone(),
            ai_avatar: session.ai_avatar.clone(),
            title: session.display_name().to_string(),
            terminated: session.terminated,
        }
    }

    pub fn display_ai_name(&self) -> &str {
        if self.ai_name.trim().is_empty() {
            DEFAULT_AI_NAME
        } else {
            &self.ai_name
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn render_header(header: &HeaderState, frame: &mut ratatui::Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", header.display_ai_name()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if !header.ai_avatar.is_empty() {
        spans.push(Span::styled(
            truncate_with_ellipsis(&header.ai_avatar, 32),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ));
    }
    if !header.title.is_empty() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            header.title.clone(),
            Style::default().fg(Color::White),
        ));
    }
    if header.terminated {
        spans.push(Span::styled(
            "  [已结束]",
            Style::default().fg(Color::Red),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
