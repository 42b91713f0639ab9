//! Markdown to styled lines for assistant bubbles.
//!
//! pulldown-cmark events drive a small block machine: inline spans collect
//! until a block ends, then get wrapped with the right prefix (list marker,
//! quote bar). Tables go through comfy-table, fenced code through syntect.
//! Raw HTML is dropped so backend text cannot inject markup.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::highlight::highlight_code;
use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{WrapOptions, wrap_spans};

/// Renders `text` as Markdown at `width` columns, coloring fenced code with
/// the syntect theme named `theme`.
pub fn render_markdown(text: &str, width: usize, theme: &str) -> Vec<StyledLine> {
    if text.trim().is_empty() {
        return vec![StyledLine::empty()];
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut view = MarkdownView::new(width.max(1), theme);
    for event in Parser::new_ext(text, options) {
        view.event(event);
    }
    view.finish()
}

#[derive(Debug)]
struct ListLevel {
    /// Next ordinal for ordered lists.
    next_number: Option<u64>,
    /// True until the current item's first line is emitted.
    marker_pending: bool,
}

#[derive(Debug)]
struct CodeBuffer {
    lang: Option<String>,
    text: String,
}

#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl TableBuffer {
    fn render(&self, width: usize) -> Vec<String> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(u16::try_from(width).unwrap_or(u16::MAX));
        if !self.header.is_empty() {
            table.set_header(&self.header);
        }
        for row in &self.rows {
            table.add_row(row);
        }
        table.to_string().lines().map(str::to_string).collect()
    }
}

struct MarkdownView<'t> {
    width: usize,
    theme: &'t str,
    out: Vec<StyledLine>,
    inline: Vec<StyledSpan>,
    styles: Vec<Style>,
    lists: Vec<ListLevel>,
    quote_depth: usize,
    code: Option<CodeBuffer>,
    table: Option<TableBuffer>,
}

impl<'t> MarkdownView<'t> {
    fn new(width: usize, theme: &'t str) -> Self {
        Self {
            width,
            theme,
            out: Vec::new(),
            inline: Vec::new(),
            styles: vec![Style::Assistant],
            lists: Vec::new(),
            quote_depth: 0,
            code: None,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(Style::Assistant)
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn blank(&mut self) {
        if self.lists.is_empty() && self.out.last().is_some_and(|l| !l.spans.is_empty()) {
            self.out.push(StyledLine::empty());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push_str(&code);
                } else {
                    self.inline.push(StyledSpan::new(code.as_ref(), Style::CodeInline));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push(' ');
                } else {
                    self.inline.push(StyledSpan::new("\n", self.style()));
                }
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.inline.push(StyledSpan::new(marker, Style::ListBullet));
            }
            Event::Rule => {
                self.flush_inline();
                self.out.push(StyledLine::from_span(
                    "─".repeat(self.width.min(40)),
                    Style::TableBorder,
                ));
                self.blank();
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.inline.push(StyledSpan::new(math.as_ref(), Style::CodeInline));
            }
            Event::Html(_) | Event::InlineHtml(_) | Event::FootnoteReference(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.styles.push(match level {
                    HeadingLevel::H1 => Style::H1,
                    HeadingLevel::H2 => Style::H2,
                    _ => Style::H3,
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuffer {
                    lang,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_inline();
                self.lists.push(ListLevel {
                    next_number: start,
                    marker_pending: false,
                });
            }
            Tag::Item => {
                self.flush_inline();
                if let Some(level) = self.lists.last_mut() {
                    level.marker_pending = true;
                }
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.quote_depth += 1;
                self.styles.push(Style::BlockQuote);
            }
            Tag::Emphasis => self.styles.push(Style::Emphasis),
            Tag::Strong => self.styles.push(Style::Strong),
            Tag::Strikethrough => self.styles.push(Style::Strikethrough),
            Tag::Link { .. } => self.styles.push(Style::Link),
            Tag::Table(_) => {
                self.flush_inline();
                self.table = Some(TableBuffer::default());
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_inline();
                self.blank();
            }
            TagEnd::Heading(_) => {
                self.flush_inline();
                self.pop_style();
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.flush_code();
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush_inline();
                self.lists.pop();
                self.blank();
            }
            TagEnd::Item => {
                self.flush_inline();
                if let Some(level) = self.lists.last_mut() {
                    level.marker_pending = false;
                    if let Some(n) = level.next_number.as_mut() {
                        *n += 1;
                    }
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inline();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                self.blank();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    for line in table.render(self.width) {
                        self.out.push(StyledLine::from_span(line, Style::Plain));
                    }
                }
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
        } else if let Some(table) = self.table.as_mut() {
            table.cell.push_str(&text.replace('\n', " "));
        } else {
            self.inline.push(StyledSpan::new(text, self.style()));
        }
    }

    fn quote_prefix(&self) -> Vec<StyledSpan> {
        if self.quote_depth == 0 {
            Vec::new()
        } else {
            vec![StyledSpan::new("│ ".repeat(self.quote_depth), Style::BlockQuote)]
        }
    }

    fn flush_inline(&mut self) {
        if self.inline.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.inline);
        let quote = self.quote_prefix();
        let depth = self.lists.len();

        let opts = match self.lists.last_mut() {
            Some(level) => {
                let indent = "  ".repeat(depth - 1);
                let (marker, marker_style) = match level.next_number {
                    Some(n) => (format!("{n}. "), Style::ListNumber),
                    None => ("• ".to_string(), Style::ListBullet),
                };
                let hang = format!("{indent}{}", " ".repeat(marker.width()));

                let mut first = quote.clone();
                if level.marker_pending {
                    first.push(StyledSpan::new(indent, Style::Plain));
                    first.push(StyledSpan::new(marker, marker_style));
                    level.marker_pending = false;
                } else {
                    first.push(StyledSpan::new(hang.clone(), Style::Plain));
                }
                let mut rest = quote;
                rest.push(StyledSpan::new(hang, Style::Plain));
                WrapOptions::with_prefixes(self.width, first, rest)
            }
            None => WrapOptions::with_prefixes(self.width, quote.clone(), quote),
        };
        self.out.extend(wrap_spans(&spans, &opts));
    }

    fn flush_code(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let fence = match &code.lang {
            Some(lang) => format!("```{lang}"),
            None => "```".to_string(),
        };
        self.out.push(StyledLine::from_span(fence, Style::CodeFence));

        let body = code.text.trim_end_matches('\n');
        for spans in highlight_code(body, code.lang.as_deref(), self.theme) {
            let mut line = vec![StyledSpan::new("  ", Style::Plain)];
            line.extend(spans);
            self.out.push(StyledLine { spans: line });
        }

        self.out.push(StyledLine::from_span("```", Style::CodeFence));
    }

    fn finish(mut self) -> Vec<StyledLine> {
        self.flush_inline();
        if self.code.is_some() {
            self.flush_code();
        }
        while self.out.last().is_some_and(|l| l.spans.is_empty()) {
            self.out.pop();
        }
        if self.out.is_empty() {
            self.out.push(StyledLine::empty());
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = "base16-ocean.dark";

    fn has_style(lines: &[StyledLine], style: Style) -> bool {
        lines
            .iter()
            .any(|l| l.spans.iter().any(|s| s.style == style))
    }

    fn all_text(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::text).collect()
    }

    #[test]
    fn test_plain_text_uses_assistant_style() {
        let lines = render_markdown("Just a sentence.", 80, THEME);
        assert_eq!(all_text(&lines), vec!["Just a sentence."]);
        assert!(has_style(&lines, Style::Assistant));
    }

    #[test]
    fn test_inline_styles() {
        let lines = render_markdown("**bold**, *soft* and `code`", 80, THEME);
        assert!(has_style(&lines, Style::Strong));
        assert!(has_style(&lines, Style::Emphasis));
        assert!(has_style(&lines, Style::CodeInline));
        assert_eq!(all_text(&lines), vec!["bold, soft and code"]);
    }

    #[test]
    fn test_headings() {
        let lines = render_markdown("# One\n\n## Two\n\n### Three", 80, THEME);
        assert!(has_style(&lines, Style::H1));
        assert!(has_style(&lines, Style::H2));
        assert!(has_style(&lines, Style::H3));
    }

    #[test]
    fn test_bullets_and_numbers() {
        let lines = render_markdown("- a\n- b\n\n3. x\n4. y", 80, THEME);
        let text = all_text(&lines);
        assert!(text.contains(&"• a".to_string()));
        assert!(text.contains(&"3. x".to_string()));
        assert!(text.contains(&"4. y".to_string()));
    }

    #[test]
    fn test_nested_list_indents() {
        let lines = render_markdown("- outer\n  - inner", 80, THEME);
        let text = all_text(&lines);
        assert_eq!(text, vec!["• outer", "  • inner"]);
    }

    #[test]
    fn test_code_block_keeps_indentation_and_fences() {
        let md = "```python\ndef f():\n    return 1\n```";
        let lines = render_markdown(md, 20, THEME);
        let text = all_text(&lines);
        assert_eq!(text.first().map(String::as_str), Some("```python"));
        assert_eq!(text.last().map(String::as_str), Some("```"));
        assert!(text.iter().any(|l| l == "      return 1"));
        assert!(lines.iter().any(|l| l
            .spans
            .iter()
            .any(|s| matches!(s.style, Style::CodeToken(_)))));
    }

    #[test]
    fn test_quote_prefix() {
        let lines = render_markdown("> quoted", 80, THEME);
        assert_eq!(all_text(&lines), vec!["│ quoted"]);
        assert!(has_style(&lines, Style::BlockQuote));
    }

    #[test]
    fn test_html_is_dropped() {
        let lines = render_markdown("<script>alert(1)</script>\n\nafter", 80, THEME);
        let joined = all_text(&lines).join("\n");
        assert!(!joined.contains("script"));
        assert!(joined.contains("after"));
    }

    #[test]
    fn test_table_renders_cells() {
        let md = "| 名称 | 值 |\n|---|---|\n| a | 1 |";
        let lines = render_markdown(md, 40, THEME);
        let joined = all_text(&lines).join("\n");
        assert!(joined.contains("名称"));
        assert!(joined.contains('a'));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(render_markdown("  ", 80, THEME), vec![StyledLine::empty()]);
    }
}
