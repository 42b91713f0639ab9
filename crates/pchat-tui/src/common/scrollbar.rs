//! Transcript scrollbar.
//!
//! The thumb length is fixed for a given content size so it does not
//! flicker while scrolling, and it sits flush with the bottom when the view
//! is at the end.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const THUMB: &str = "┃";
const TRACK: &str = "│";

#[derive(Debug, Clone, Copy)]
pub struct Scrollbar {
    total_lines: usize,
    viewport_height: usize,
    scroll_offset: usize,
}

impl Scrollbar {
    pub fn new(total_lines: usize, viewport_height: usize, scroll_offset: usize) -> Self {
        Self {
            total_lines,
            viewport_height,
            scroll_offset,
        }
    }

    fn is_needed(&self) -> bool {
        self.total_lines > self.viewport_height
    }

    /// Returns `(thumb_start, thumb_len)` for a track of `track_len` cells.
    fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_scroll = self.total_lines.saturating_sub(self.viewport_height);
        if !self.is_needed() || track_len == 0 || max_scroll == 0 {
            return None;
        }

        let visible = self.viewport_height.min(track_len) as u64;
        let total = self.total_lines as u64;
        let track = track_len as u64;
        let len = ((track * visible + total / 2) / total).clamp(1, track) as usize;

        let room = (track_len - len) as u64;
        let offset = self.scroll_offset.min(max_scroll) as u64;
        let start = (offset * room / max_scroll as u64) as usize;
        Some((start, len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((start, len)) = self.thumb(area.height as usize) else {
            return;
        };

        let x = area.right().saturating_sub(1);
        let track_style = Style::default().fg(Color::DarkGray);
        let thumb_style = Style::default().fg(Color::Gray);
        for (row, y) in (area.top()..area.bottom()).enumerate() {
            if (start..start + len).contains(&row) {
                buf.set_string(x, y, THUMB, thumb_style);
            } else {
                buf.set_string(x, y, TRACK, track_style);
            }
        }
    }
}
