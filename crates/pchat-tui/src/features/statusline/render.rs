use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::NoticeLevel;
use crate::common::truncate_with_ellipsis;
use crate::state::TuiState;
use crate::transcript::SPINNER_SPEED_DIVISOR;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

pub fn render_status_line(state: &TuiState, frame: &mut ratatui::Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();

    if state.tasks.is_any_running() {
        let idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
        spans.push(Span::styled(
            format!("{} ", SPINNER_FRAMES[idx]),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(notice) = &state.status_line.notice {
        let style = match notice.level {
            NoticeLevel::Info => Style::default().fg(Color::Green),
            NoticeLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(notice.text.clone(), style));
        spans.push(Span::styled("  ", dim));
    }

    spans.push(Span::styled(state.base_url.clone(), dim));
    if let Some(id) = state.sessions.current_id() {
        spans.push(Span::styled(" · ", dim));
        spans.push(Span::styled(truncate_with_ellipsis(id, 24), dim));
    }
    if let Some(elapsed) = &state.status_line.last_elapsed {
        spans.push(Span::styled(format!(" · {elapsed}"), dim));
    }
    if let Some(usage) = state.status_line.last_usage {
        spans.push(Span::styled(
            format!(
                " · {}↑ {}↓ {} tokens",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ),
            dim,
        ));
    }

    spans.push(Span::styled("  Ctrl+C", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(" 退出", dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
