//! Width-aware wrapping of styled spans.
//!
//! Text is split into words, spaces and hard breaks. Words move to the next
//! line when they do not fit. Wide (CJK) characters count as words of their
//! own so Chinese prose breaks between any two characters. A word wider than
//! a whole line is cut by display width.

use std::cell::RefCell;
use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::cell::CellId;
use super::style::{Style, StyledLine, StyledSpan};

/// Prefixes and width for one wrapped block.
#[derive(Debug, Clone)]
pub struct WrapOptions {
    pub width: usize,
    /// Spans placed before the first line.
    pub first_prefix: Vec<StyledSpan>,
    /// Spans placed before every continuation line.
    pub rest_prefix: Vec<StyledSpan>,
}

impl WrapOptions {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            first_prefix: Vec::new(),
            rest_prefix: Vec::new(),
        }
    }

    /// Hanging indent: `first` on line one, `rest` after.
    pub fn with_prefixes(width: usize, first: Vec<StyledSpan>, rest: Vec<StyledSpan>) -> Self {
        Self {
            width,
            first_prefix: first,
            rest_prefix: rest,
        }
    }
}

fn spans_width(spans: &[StyledSpan]) -> usize {
    spans.iter().map(|s| s.text.width()).sum()
}

enum Token<'a> {
    Word(&'a str, Style),
    Space(&'a str, Style),
    Break,
}

fn tokenize(spans: &[StyledSpan]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for span in spans {
        for (i, segment) in span.text.split('\n').enumerate() {
            if i > 0 {
                tokens.push(Token::Break);
            }
            for piece in segment.split_word_bounds() {
                if piece.chars().all(char::is_whitespace) {
                    tokens.push(Token::Space(piece, span.style));
                } else if piece.chars().count() > 1 && piece.width() >= 2 * piece.chars().count() {
                    for g in piece.graphemes(true) {
                        tokens.push(Token::Word(g, span.style));
                    }
                } else {
                    tokens.push(Token::Word(piece, span.style));
                }
            }
        }
    }
    tokens
}

struct LineBuilder<'o> {
    opts: &'o WrapOptions,
    lines: Vec<StyledLine>,
    spans: Vec<StyledSpan>,
    used: usize,
    has_content: bool,
    pending_space: Option<(String, Style)>,
}

impl<'o> LineBuilder<'o> {
    fn new(opts: &'o WrapOptions) -> Self {
        let mut builder = Self {
            opts,
            lines: Vec::new(),
            spans: Vec::new(),
            used: 0,
            has_content: false,
            pending_space: None,
        };
        builder.start_line();
        builder
    }

    fn start_line(&mut self) {
        let prefix = if self.lines.is_empty() {
            &self.opts.first_prefix
        } else {
            &self.opts.rest_prefix
        };
        self.spans = prefix.clone();
        self.used = spans_width(prefix);
        self.has_content = false;
        self.pending_space = None;
    }

    fn avail(&self) -> usize {
        self.opts.width.saturating_sub(self.used)
    }

    /// Room for content on a fresh continuation line.
    fn fresh_avail(&self) -> usize {
        self.opts
            .width
            .saturating_sub(spans_width(&self.opts.rest_prefix))
            .max(1)
    }

    fn push_raw(&mut self, text: &str, style: Style) {
        self.used += text.width();
        match self.spans.last_mut() {
            Some(last) if last.style == style && self.has_content => last.text.push_str(text),
            _ => self.spans.push(StyledSpan::new(text, style)),
        }
        self.has_content = true;
    }

    fn end_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(StyledLine { spans });
        self.start_line();
    }

    fn space(&mut self, text: &str, style: Style) {
        if self.has_content {
            self.pending_space = Some((text.to_string(), style));
        }
    }

    fn word(&mut self, word: &str, style: Style) {
        let word_width = word.width();
        let space_width = self
            .pending_space
            .as_ref()
            .map_or(0, |(s, _)| s.width());

        if self.has_content && space_width + word_width > self.avail() {
            self.end_line();
        }
        if let Some((space, space_style)) = self.pending_space.take() {
            self.push_raw(&space, space_style);
        }

        if word_width <= self.avail() || (!self.has_content && word_width <= self.fresh_avail()) {
            self.push_raw(word, style);
            return;
        }
        self.cut_word(word, style);
    }

    fn cut_word(&mut self, word: &str, style: Style) {
        let mut chunk = String::new();
        let mut chunk_width = 0;
        for g in word.graphemes(true) {
            let w = g.width();
            if chunk_width + w > self.avail().max(1) && !chunk.is_empty() {
                self.push_raw(&chunk, style);
                self.end_line();
                chunk.clear();
                chunk_width = 0;
            }
            chunk.push_str(g);
            chunk_width += w;
        }
        if !chunk.is_empty() {
            self.push_raw(&chunk, style);
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(StyledLine { spans });
        self.lines
    }
}

/// Wraps `spans` to `opts.width` columns. `\n` inside a span forces a break.
pub fn wrap_spans(spans: &[StyledSpan], opts: &WrapOptions) -> Vec<StyledLine> {
    let mut builder = LineBuilder::new(opts);
    for token in tokenize(spans) {
        match token {
            Token::Word(word, style) => builder.word(word, style),
            Token::Space(space, style) => builder.space(space, style),
            Token::Break => builder.end_line(),
        }
    }
    builder.finish()
}

/// Cache of wrapped cell lines.
///
/// Keyed by cell, width and a content revision so an edited cell never
/// returns stale lines. Cleared on resize and on transcript reset.
#[derive(Debug, Default)]
pub struct WrapCache {
    entries: RefCell<HashMap<(CellId, usize, usize), Vec<StyledLine>>>,
}

impl WrapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn get(&self, key: (CellId, usize, usize)) -> Option<Vec<StyledLine>> {
        self.entries.borrow().get(&key).cloned()
    }

    pub fn insert(&self, key: (CellId, usize, usize), lines: Vec<StyledLine>) {
        self.entries.borrow_mut().insert(key, lines);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::text).collect()
    }

    fn plain(text: &str) -> Vec<StyledSpan> {
        vec![StyledSpan::new(text, Style::Plain)]
    }

    #[test]
    fn test_wraps_at_word_boundary() {
        let lines = wrap_spans(&plain("hello brave new world"), &WrapOptions::new(11));
        assert_eq!(texts(&lines), vec!["hello brave", "new world"]);
    }

    #[test]
    fn test_hard_break_starts_new_line() {
        let lines = wrap_spans(&plain("one\ntwo"), &WrapOptions::new(40));
        assert_eq!(texts(&lines), vec!["one", "two"]);
    }

    #[test]
    fn test_long_word_is_cut() {
        let lines = wrap_spans(&plain("abcdefghij"), &WrapOptions::new(4));
        assert_eq!(texts(&lines), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_cjk_breaks_between_characters() {
        let lines = wrap_spans(&plain("你好世界再见"), &WrapOptions::new(8));
        assert_eq!(texts(&lines), vec!["你好世界", "再见"]);
        assert!(lines.iter().all(|l| l.text().width() <= 8));
    }

    #[test]
    fn test_hanging_prefix() {
        let opts = WrapOptions::with_prefixes(
            10,
            vec![StyledSpan::new("• ", Style::ListBullet)],
            vec![StyledSpan::new("  ", Style::Plain)],
        );
        let lines = wrap_spans(&plain("alpha beta gamma"), &opts);
        assert_eq!(texts(&lines), vec!["• alpha", "  beta", "  gamma"]);
    }

    #[test]
    fn test_styles_survive_wrapping() {
        let spans = vec![
            StyledSpan::new("run ", Style::Plain),
            StyledSpan::new("cargo", Style::CodeInline),
        ];
        let lines = wrap_spans(&spans, &WrapOptions::new(40));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[1].style, Style::CodeInline);
    }

    #[test]
    fn test_cache_round() {
        let cache = WrapCache::new();
        let key = (CellId(1), 80, 5);
        assert!(cache.get(key).is_none());
        cache.insert(key, vec![StyledLine::from_span("x", Style::Plain)]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get((CellId(1), 40, 5)).is_none());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
