//! Session sidebar view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::state::SessionsState;
use crate::common::truncate_with_ellipsis;

/// Sidebar width in columns, border included.
pub const SIDEBAR_WIDTH: u16 = 28;

const TERMINATED_MARK: &str = " ✓";

pub fn render_sidebar(sessions: &SessionsState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" 会话 ({}) ", sessions.sessions().len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if sessions.is_empty() {
        frame.render_widget(
            Paragraph::new("暂无会话")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    // Room for the highlight symbol.
    let name_width = (inner.width as usize).saturating_sub(2 + TERMINATED_MARK.len());
    let items: Vec<ListItem> = sessions
        .sessions()
        .iter()
        .map(|session| {
            let mut style = Style::default();
            if session.terminated {
                style = style.fg(Color::DarkGray);
            }
            let mut spans = vec![Span::styled(
                truncate_with_ellipsis(session.display_name(), name_width),
                style,
            )];
            if session.terminated {
                spans.push(Span::styled(
                    TERMINATED_MARK,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let selected = sessions
        .current_id()
        .and_then(|id| sessions.sessions().iter().position(|s| s.id == id));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(selected);
    frame.render_stateful_widget(list, inner, &mut list_state);
}
