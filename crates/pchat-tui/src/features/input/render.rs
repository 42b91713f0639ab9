//! Composer view.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::text_buffer::TextBuffer;
use crate::state::TuiState;

/// Minimum composer height, borders included.
const INPUT_HEIGHT_MIN: u16 = 4;

/// Largest share of the terminal the composer may take.
const INPUT_HEIGHT_MAX_PERCENT: f32 = 0.4;

struct WrappedBuffer {
    lines: Vec<Line<'static>>,
    cursor_row: usize,
    cursor_col: usize,
}

/// Wraps buffer rows at `width` display columns, tracking where the cursor
/// lands after wrapping.
fn wrap_buffer(buf: &TextBuffer, width: usize) -> WrappedBuffer {
    let width = width.max(1);
    let (cursor_line, cursor_char) = buf.cursor();
    let mut lines = Vec::new();
    let mut cursor_row = 0;
    let mut cursor_col = 0;

    for (row, text) in buf.lines().into_iter().enumerate() {
        let mut current = String::new();
        let mut used = 0;
        for (i, ch) in text.chars().enumerate() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            if row == cursor_line && i == cursor_char {
                cursor_row = lines.len();
                cursor_col = used;
            }
            current.push(ch);
            used += w;
        }
        if row == cursor_line && cursor_char >= text.chars().count() {
            if used >= width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            cursor_row = lines.len();
            cursor_col = used;
        }
        lines.push(Line::from(current));
    }

    WrappedBuffer {
        lines,
        cursor_row,
        cursor_col,
    }
}

/// Composer height for the current text: grows past three rows, capped at
/// 40% of the terminal.
pub fn calculate_input_height(state: &TuiState, terminal_height: u16) -> u16 {
    let rows = state.input.textarea.lines().len() as u16;
    if rows <= 2 {
        return INPUT_HEIGHT_MIN;
    }
    let max_height = (f32::from(terminal_height) * INPUT_HEIGHT_MAX_PERCENT) as u16;
    (rows + 2).min(max_height).max(INPUT_HEIGHT_MIN)
}

/// Renders the composer. The terminal cursor is placed only when
/// `show_cursor` is set (no overlay has focus).
pub fn render_input(state: &TuiState, frame: &mut ratatui::Frame, area: Rect, show_cursor: bool) {
    let dim = Style::default().fg(Color::DarkGray);
    let (title, border) = if state.input.disabled {
        (" 会话已结束 ", Style::default().fg(Color::Red))
    } else if state.tasks.send.is_running() {
        (" 发送中 ", Style::default().fg(Color::Yellow))
    } else {
        (" 消息 ", dim)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, border))
        .title_bottom(
            Line::from(Span::styled(" Enter 发送 · Shift+Enter 换行 ", dim))
                .alignment(Alignment::Right),
        );
    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        frame.render_widget(block, area);
        return;
    }

    if state.input.disabled {
        let notice = Paragraph::new(Line::from(Span::styled("本次会话已结束，请新建会话 (Ctrl+N)", dim)))
            .block(block);
        frame.render_widget(notice, area);
        return;
    }

    let wrapped = wrap_buffer(&state.input.textarea, inner.width as usize);
    let viewport = inner.height as usize;
    let scroll = (wrapped.cursor_row + 1).saturating_sub(viewport);
    let visible: Vec<Line> = wrapped
        .lines
        .into_iter()
        .skip(scroll)
        .take(viewport)
        .collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);

    let cursor_x = inner.x + wrapped.cursor_col as u16;
    let cursor_y = inner.y + (wrapped.cursor_row - scroll) as u16;
    if show_cursor && cursor_x < inner.right() && cursor_y < inner.bottom() {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_tracks_cursor_on_wide_chars() {
        let buf = TextBuffer::from_text("你好世界");
        let wrapped = wrap_buffer(&buf, 5);
        let rows: Vec<String> = wrapped.lines.iter().map(text_of).collect();
        assert_eq!(rows, vec!["你好", "世界"]);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (1, 4));
    }

    #[test]
    fn test_cursor_at_full_row_moves_to_next_row() {
        let buf = TextBuffer::from_text("abcd");
        let wrapped = wrap_buffer(&buf, 4);
        assert_eq!(wrapped.lines.len(), 2);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (1, 0));
    }

    #[test]
    fn test_empty_buffer_has_one_row() {
        let wrapped = wrap_buffer(&TextBuffer::default(), 10);
        assert_eq!(wrapped.lines.len(), 1);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (0, 0));
    }
}
