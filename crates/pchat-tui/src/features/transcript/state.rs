//! Transcript display state.
//!
//! Holds the cells, scroll position and wrap cache for the transcript pane.

use super::cell::HistoryCell;
use super::wrap::WrapCache;
use crate::mutations::TranscriptMutation;

/// Scroll mode for the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Stick to the newest line.
    FollowLatest,
    /// User scrolled; `offset` is the first visible line.
    Anchored { offset: usize },
}

#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Line count from the last render.
    pub cached_line_count: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            cached_line_count: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::FollowLatest
    }

    /// First visible line for a viewport of `viewport_height` lines.
    pub fn get_offset(&self, viewport_height: usize) -> usize {
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        match self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => offset.min(max_offset),
        }
    }

    pub fn scroll_up(&mut self, lines: usize, viewport_height: usize) {
        let offset = self.get_offset(viewport_height).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down; reaching the bottom resumes following.
    pub fn scroll_down(&mut self, lines: usize, viewport_height: usize) {
        if self.is_following() {
            return;
        }
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        let offset = (self.get_offset(viewport_height) + lines).min(max_offset);
        self.mode = if offset >= max_offset {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn follow(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }
}

#[derive(Debug)]
pub struct TranscriptState {
    cells: Vec<HistoryCell>,
    pub scroll: ScrollState,
    pub wrap_cache: WrapCache,
    /// Transcript rows on screen, updated every frame.
    pub viewport_height: usize,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            scroll: ScrollState::default(),
            wrap_cache: WrapCache::new(),
            viewport_height: 20,
        }
    }
}

impl TranscriptState {
    pub fn cells(&self) -> &[HistoryCell] {
        &self.cells
    }

    pub fn push_cell(&mut self, cell: HistoryCell) {
        self.cells.push(cell);
    }

    /// Drops every cell and returns to follow mode.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.scroll = ScrollState::default();
        self.wrap_cache.clear();
    }

    /// Pops the trailing placeholder bubble, if the last cell is one.
    pub fn remove_thinking(&mut self) -> bool {
        if matches!(self.cells.last(), Some(HistoryCell::Thinking { .. })) {
            self.cells.pop();
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, mutation: TranscriptMutation) {
        match mutation {
            TranscriptMutation::Append(cell) => {
                self.push_cell(cell);
                self.scroll.follow();
            }
            TranscriptMutation::ReplaceAll(cells) => {
                self.reset();
                self.cells = cells;
            }
            TranscriptMutation::RemoveThinking => {
                self.remove_thinking();
            }
            TranscriptMutation::Clear => self.reset(),
            TranscriptMutation::ScrollToBottom => self.scroll.follow(),
            TranscriptMutation::PageUp => {
                let page = self.viewport_height.saturating_sub(2).max(1);
                self.scroll.scroll_up(page, self.viewport_height);
            }
            TranscriptMutation::PageDown => {
                let page = self.viewport_height.saturating_sub(2).max(1);
                self.scroll.scroll_down(page, self.viewport_height);
            }
            TranscriptMutation::ScrollLines(delta) => {
                let lines = delta.unsigned_abs() as usize;
                if delta < 0 {
                    self.scroll.scroll_up(lines, self.viewport_height);
                } else {
                    self.scroll.scroll_down(lines, self.viewport_height);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_thinking_pops_trailing_placeholder_only() {
        let mut transcript = TranscriptState::default();
        transcript.push_cell(HistoryCell::user("你正在思考什么"));
        transcript.push_cell(HistoryCell::thinking());
        assert!(transcript.remove_thinking());
        assert_eq!(transcript.cells().len(), 1);
        // Stored text that mentions the marker is not a placeholder.
        assert!(!transcript.remove_thinking());
        assert_eq!(transcript.cells()[0].text(), "你正在思考什么");
    }

    #[test]
    fn test_scroll_up_then_back_down_follows() {
        let mut scroll = ScrollState {
            cached_line_count: 100,
            ..Default::default()
        };
        scroll.scroll_up(10, 20);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 70 });
        scroll.scroll_down(5, 20);
        assert_eq!(scroll.get_offset(20), 75);
        scroll.scroll_down(50, 20);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_replace_all_resets_scroll() {
        let mut transcript = TranscriptState::default();
        transcript.scroll.mode = ScrollMode::Anchored { offset: 3 };
        transcript.apply(TranscriptMutation::ReplaceAll(vec![HistoryCell::user("a")]));
        assert!(transcript.scroll.is_following());
        assert_eq!(transcript.cells().len(), 1);
    }
}
