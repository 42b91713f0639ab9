//! Multi-line edit buffer for the composer and overlay fields.
//!
//! Text lives in one `String` with a byte cursor that always sits on a
//! grapheme boundary. Rows and columns are derived on demand for rendering.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replaces the content and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Takes the content out, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Cursor as `(row, col)`; `col` counts chars within the row.
    pub fn cursor(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (row, before[line_start..].chars().count())
    }

    fn line_bounds(&self, at: usize) -> (usize, usize) {
        let start = self.text[..at].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[at..].find('\n').map_or(self.text.len(), |i| at + i);
        (start, end)
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.cursor, |g| self.cursor + g.len())
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_prev_char(&mut self) {
        let start = self.prev_boundary();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn delete_next_char(&mut self) {
        let end = self.next_boundary();
        self.text.replace_range(self.cursor..end, "");
    }

    /// Ctrl+W: deletes back to the start of the previous word.
    pub fn delete_word_left(&mut self) {
        let start = self.word_left();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Ctrl+U: deletes from the line start to the cursor.
    pub fn delete_to_line_start(&mut self) {
        let (start, _) = self.line_bounds(self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Ctrl+K: deletes from the cursor to the line end.
    pub fn delete_to_line_end(&mut self) {
        let (_, end) = self.line_bounds(self.cursor);
        if end == self.cursor {
            self.delete_next_char();
        } else {
            self.text.replace_range(self.cursor..end, "");
        }
    }

    fn word_left(&self) -> usize {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        trimmed
            .split_word_bound_indices()
            .rev()
            .find(|(_, w)| !w.trim().is_empty())
            .map_or(0, |(i, _)| i)
    }

    fn word_right(&self) -> usize {
        let after = &self.text[self.cursor..];
        let mut seen_word = false;
        for (i, w) in after.split_word_bound_indices() {
            let is_space = w.trim().is_empty();
            if seen_word && is_space {
                return self.cursor + i;
            }
            seen_word |= !is_space;
        }
        self.text.len()
    }

    fn move_vertical(&mut self, down: bool) {
        let (start, end) = self.line_bounds(self.cursor);
        let col = self.text[start..self.cursor].chars().count();
        let target = if down {
            if end == self.text.len() {
                return;
            }
            self.line_bounds(end + 1)
        } else {
            if start == 0 {
                return;
            }
            self.line_bounds(start - 1)
        };
        let line = &self.text[target.0..target.1];
        let offset = line
            .char_indices()
            .nth(col)
            .map_or(line.len(), |(i, _)| i);
        self.cursor = target.0 + offset;
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        match movement {
            CursorMove::Left => self.cursor = self.prev_boundary(),
            CursorMove::Right => self.cursor = self.next_boundary(),
            CursorMove::Up => self.move_vertical(false),
            CursorMove::Down => self.move_vertical(true),
            CursorMove::LineStart => self.cursor = self.line_bounds(self.cursor).0,
            CursorMove::LineEnd => self.cursor = self.line_bounds(self.cursor).1,
            CursorMove::WordLeft => self.cursor = self.word_left(),
            CursorMove::WordRight => self.cursor = self.word_right(),
            CursorMove::Top => self.cursor = 0,
            CursorMove::Bottom => self.cursor = self.text.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor_rows() {
        let mut buf = TextBuffer::default();
        buf.insert_str("你好");
        buf.insert_newline();
        buf.insert_char('x');
        assert_eq!(buf.text(), "你好\nx");
        assert_eq!(buf.cursor(), (1, 1));
        assert_eq!(buf.lines(), vec!["你好", "x"]);
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut buf = TextBuffer::from_text("ae\u{301}");
        buf.delete_prev_char();
        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn test_vertical_move_keeps_column() {
        let mut buf = TextBuffer::from_text("abcdef\nxy");
        buf.move_cursor(CursorMove::Up);
        assert_eq!(buf.cursor(), (0, 2));
        buf.move_cursor(CursorMove::LineEnd);
        buf.move_cursor(CursorMove::Down);
        assert_eq!(buf.cursor(), (1, 2));
    }

    #[test]
    fn test_word_motion_and_delete() {
        let mut buf = TextBuffer::from_text("hello big world");
        buf.delete_word_left();
        assert_eq!(buf.text(), "hello big ");
        buf.move_cursor(CursorMove::WordLeft);
        assert_eq!(buf.cursor(), (0, 6));
        buf.move_cursor(CursorMove::Top);
        buf.move_cursor(CursorMove::WordRight);
        assert_eq!(buf.cursor(), (0, 5));
    }

    #[test]
    fn test_line_kills() {
        let mut buf = TextBuffer::from_text("one\ntwo three");
        buf.move_cursor(CursorMove::WordLeft);
        buf.delete_to_line_start();
        assert_eq!(buf.text(), "one\nthree");
        buf.delete_to_line_end();
        assert_eq!(buf.text(), "one\n");
    }

    #[test]
    fn test_take_empties_buffer() {
        let mut buf = TextBuffer::from_text("  msg ");
        assert!(!buf.is_blank());
        assert_eq!(buf.take(), "  msg ");
        assert!(buf.is_blank());
        assert_eq!(buf.cursor(), (0, 0));
    }
}
