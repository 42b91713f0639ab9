use std::sync::atomic::{AtomicU64, Ordering};

use unicode_width::UnicodeWidthStr;

use super::markdown::render_markdown;
use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{WrapCache, WrapOptions, wrap_spans};
use crate::common::sanitize_for_display;

/// Text of the pending-reply bubble.
pub const THINKING_TEXT: &str = "正在思考中...";

/// Substring that identifies the pending-reply bubble.
pub const THINKING_MARKER: &str = "正在思考";

/// Fallback text for the end-of-session banner.
pub use pchat_core::export::END_BANNER;

static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique transcript cell id (wrap cache key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub u64);

impl CellId {
    pub fn new() -> Self {
        Self(CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

/// One bubble in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCell {
    User {
        id: CellId,
        content: String,
    },
    Assistant {
        id: CellId,
        content: String,
        /// Line under the bubble (`响应时间: …`, `对话总结`).
        meta: Option<String>,
    },
    /// Pending reply while a send is in flight.
    Thinking { id: CellId },
    /// Inline failure such as `网络错误: …`.
    Error { id: CellId, content: String },
    /// End-of-session banner.
    Banner { id: CellId, content: String },
}

impl HistoryCell {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            id: CellId::new(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>, meta: Option<String>) -> Self {
        Self::Assistant {
            id: CellId::new(),
            content: content.into(),
            meta: meta.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn thinking() -> Self {
        Self::Thinking { id: CellId::new() }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            id: CellId::new(),
            content: content.into(),
        }
    }

    pub fn banner(content: impl Into<String>) -> Self {
        Self::Banner {
            id: CellId::new(),
            content: content.into(),
        }
    }

    pub fn id(&self) -> CellId {
        match self {
            Self::User { id, .. }
            | Self::Assistant { id, .. }
            | Self::Thinking { id }
            | Self::Error { id, .. }
            | Self::Banner { id, .. } => *id,
        }
    }

    /// Visible text of the bubble, without meta.
    pub fn text(&self) -> &str {
        match self {
            Self::User { content, .. }
            | Self::Assistant { content, .. }
            | Self::Error { content, .. }
            | Self::Banner { content, .. } => content,
            Self::Thinking { .. } => THINKING_TEXT,
        }
    }

    pub fn meta(&self) -> Option<&str> {
        match self {
            Self::Assistant { meta, .. } => meta.as_deref(),
            _ => None,
        }
    }

    /// Only Markdown output is worth caching.
    fn is_cacheable(&self) -> bool {
        matches!(self, Self::Assistant { .. })
    }

    fn revision(&self) -> usize {
        self.text().len() + self.meta().map_or(0, str::len)
    }

    /// Lines for this cell, reusing `cache` for assistant bubbles.
    pub fn display_lines_cached(
        &self,
        width: usize,
        theme: &str,
        spinner_frame: usize,
        cache: &WrapCache,
    ) -> Vec<StyledLine> {
        if !self.is_cacheable() {
            return self.display_lines(width, theme, spinner_frame);
        }
        let key = (self.id(), width, self.revision());
        if let Some(lines) = cache.get(key) {
            return lines;
        }
        let lines = self.display_lines(width, theme, spinner_frame);
        cache.insert(key, lines.clone());
        lines
    }

    pub fn display_lines(&self, width: usize, theme: &str, spinner_frame: usize) -> Vec<StyledLine> {
        let width = width.max(12);
        match self {
            Self::User { content, .. } => prefixed(
                "│ ",
                Style::UserPrefix,
                &sanitize_for_display(content),
                Style::User,
                width,
            ),
            Self::Assistant { content, meta, .. } => {
                let body = render_markdown(&sanitize_for_display(content), width - 2, theme);
                let mut lines: Vec<StyledLine> = body
                    .into_iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let gutter = if i == 0 { "● " } else { "  " };
                        let mut spans = vec![StyledSpan::new(gutter, Style::AssistantPrefix)];
                        spans.extend(line.spans);
                        StyledLine { spans }
                    })
                    .collect();
                if let Some(meta) = meta {
                    lines.extend(prefixed("  ", Style::Plain, meta, Style::Meta, width));
                }
                lines
            }
            Self::Thinking { .. } => {
                const DOTS: [&str; 4] = ["   ", ".  ", ".. ", "..."];
                let dots = DOTS[(spinner_frame / 4) % DOTS.len()];
                vec![StyledLine {
                    spans: vec![
                        StyledSpan::new("● ", Style::AssistantPrefix),
                        StyledSpan::new(format!("{THINKING_MARKER}中{dots}"), Style::Placeholder),
                    ],
                }]
            }
            Self::Error { content, .. } => prefixed(
                "✗ ",
                Style::Error,
                &sanitize_for_display(content),
                Style::Error,
                width,
            ),
            Self::Banner { content, .. } => {
                let text = format!(" {} ", sanitize_for_display(content));
                let side = width.saturating_sub(text.width()) / 2;
                vec![StyledLine::from_span(
                    format!("{}{text}{}", "─".repeat(side), "─".repeat(side)),
                    Style::Banner,
                )]
            }
        }
    }
}

/// Wraps plain `content` behind `prefix`, repeating the prefix on every line.
fn prefixed(
    prefix: &str,
    prefix_style: Style,
    content: &str,
    content_style: Style,
    width: usize,
) -> Vec<StyledLine> {
    let gutter = vec![StyledSpan::new(prefix, prefix_style)];
    let opts = WrapOptions::with_prefixes(width, gutter.clone(), gutter);
    wrap_spans(&[StyledSpan::new(content, content_style)], &opts)
}
