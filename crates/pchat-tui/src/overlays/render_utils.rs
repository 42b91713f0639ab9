//! Shared drawing helpers for overlays.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Centers a `width` x `height` box in `area`, shrinking it to fit.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

pub struct OverlayLayout {
    /// Inside the border, above the hint row.
    pub body: Rect,
}

/// Clears the box, draws border, title and hints, and returns the body.
pub fn render_overlay(frame: &mut Frame, area: Rect, config: &OverlayConfig<'_>) -> OverlayLayout {
    let popup = calculate_overlay_area(area, config.width, config.height);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.border_color))
        .title(format!(" {} ", config.title))
        .title_style(
            Style::default()
                .fg(config.border_color)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if !config.hints.is_empty() {
        render_hints(frame, inner, config.hints, config.border_color);
    }
    let footer_height = u16::from(!config.hints.is_empty());
    OverlayLayout {
        body: Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(footer_height),
        ),
    }
}

pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Hint row on the last line of `area`: `key action • key action`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let hints_area = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        hints_area,
    );
}

pub fn render_separator(frame: &mut Frame, area: Rect, y_offset: u16) {
    if y_offset >= area.height {
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(Color::DarkGray),
        )),
        Rect::new(area.x, area.y + y_offset, area.width, 1),
    );
}

/// Keeps the end of `text` that fits in `max_width` columns, with a leading
/// ellipsis when something was cut.
pub fn tail_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        used += w;
        kept.push(ch);
    }
    let tail: String = kept.into_iter().rev().collect();
    format!("…{tail}")
}

/// One labelled single-line field: `label  value█`.
pub struct InputLine<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    pub accent: Color,
}

pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    let label_style = if input.focused {
        Style::default()
            .fg(input.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label = format!("{} ", input.label);
    let label_width = label.as_str().width();
    let max_text = (area.width as usize).saturating_sub(label_width + 1);

    let mut spans = vec![Span::styled(label, label_style)];
    // Newlines in a single-line field render as spaces.
    let value = input.value.replace('\n', " ");
    if value.is_empty() {
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
        spans.push(Span::styled(
            tail_to_width(input.placeholder, max_text),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(tail_to_width(&value, max_text)));
        if input.focused {
            spans.push(Span::styled("█", Style::default().fg(input.accent)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Wrapped paragraph for an error or status line inside an overlay.
pub fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
            .wrap(Wrap { trim: false }),
        area,
    );
}
