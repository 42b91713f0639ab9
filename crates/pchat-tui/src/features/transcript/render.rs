//! Transcript rendering: cells to ratatui lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::state::TranscriptState;
use super::style::{Style as TranscriptStyle, StyledLine};

/// Render frames per spinner step.
pub const SPINNER_SPEED_DIVISOR: usize = 6;

/// Renders every cell with a blank separator line after each one.
pub fn render_transcript(
    transcript: &TranscriptState,
    width: usize,
    theme: &str,
    spinner_frame: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for cell in transcript.cells() {
        let styled = cell.display_lines_cached(
            width,
            theme,
            spinner_frame / SPINNER_SPEED_DIVISOR,
            &transcript.wrap_cache,
        );
        lines.extend(styled.into_iter().map(convert_styled_line));
        lines.push(Line::default());
    }
    lines
}

fn convert_styled_line(line: StyledLine) -> Line<'static> {
    Line::from(
        line.spans
            .into_iter()
            .map(|span| Span::styled(span.text, convert_style(span.style)))
            .collect::<Vec<_>>(),
    )
}

/// Maps a semantic transcript style onto terminal colors.
pub fn convert_style(style: TranscriptStyle) -> Style {
    match style {
        TranscriptStyle::Plain => Style::default(),
        TranscriptStyle::UserPrefix => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::User => Style::default().fg(Color::Green),
        TranscriptStyle::AssistantPrefix => Style::default().fg(Color::Cyan),
        TranscriptStyle::Assistant => Style::default().fg(Color::White),
        TranscriptStyle::Meta => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::Placeholder => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::Error => Style::default().fg(Color::Red),
        TranscriptStyle::Banner => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::CodeInline | TranscriptStyle::CodeBlock => {
            Style::default().fg(Color::Cyan)
        }
        TranscriptStyle::CodeFence | TranscriptStyle::TableBorder => {
            Style::default().fg(Color::DarkGray)
        }
        TranscriptStyle::CodeToken(rgb) => Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b)),
        TranscriptStyle::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
        TranscriptStyle::Strong => Style::default().add_modifier(Modifier::BOLD),
        TranscriptStyle::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),
        TranscriptStyle::H1 => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        TranscriptStyle::H2 => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        TranscriptStyle::H3 => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::Link => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        TranscriptStyle::BlockQuote => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC),
        TranscriptStyle::ListBullet | TranscriptStyle::ListNumber => {
            Style::default().fg(Color::Yellow)
        }
    }
}
