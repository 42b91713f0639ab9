//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects. Layout math is shared with the reducer's
//! frame handler so scroll bounds match what is drawn.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::Scrollbar;
use crate::header::render_header;
use crate::input;
use crate::overlays::OverlayExt;
use crate::sessions::{SIDEBAR_WIDTH, render_sidebar};
use crate::state::{AppState, TuiState};
use crate::statusline::render_status_line;
use crate::transcript;

/// Header height, bottom border included.
const HEADER_HEIGHT: u16 = 2;

/// Height of status line below input.
const STATUS_HEIGHT: u16 = 1;

/// Transcript horizontal margin (padding on each side).
pub const TRANSCRIPT_MARGIN: u16 = 1;

/// Width reserved for the scrollbar on the right side.
const SCROLLBAR_WIDTH: u16 = 1;

/// Terminals narrower than this hide the sidebar regardless of the toggle.
const MIN_WIDTH_FOR_SIDEBAR: u16 = 60;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub sidebar: Option<Rect>,
    pub header: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

impl MainLayout {
    /// Where transcript text is drawn: margins and the scrollbar column
    /// removed.
    pub fn transcript_text(&self) -> Rect {
        Rect {
            x: self.transcript.x + TRANSCRIPT_MARGIN,
            y: self.transcript.y,
            width: self
                .transcript
                .width
                .saturating_sub(TRANSCRIPT_MARGIN * 2 + SCROLLBAR_WIDTH),
            height: self.transcript.height,
        }
    }
}

pub fn calculate_layout(state: &TuiState, area: Rect) -> MainLayout {
    let show_sidebar = !state.sidebar_collapsed && area.width >= MIN_WIDTH_FOR_SIDEBAR;
    let (sidebar, main) = if show_sidebar {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
            .split(area);
        (Some(columns[0]), columns[1])
    } else {
        (None, area)
    };

    let input_height = input::calculate_input_height(state, area.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(input_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(main);

    MainLayout {
        sidebar,
        header: rows[0],
        transcript: rows[1],
        input: rows[2],
        status: rows[3],
    }
}

/// Transcript text area for a terminal of `width` x `height`.
pub fn calculate_transcript_area(state: &TuiState, width: u16, height: u16) -> Rect {
    calculate_layout(state, Rect::new(0, 0, width, height)).transcript_text()
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;
    let layout = calculate_layout(state, area);

    if let Some(sidebar) = layout.sidebar {
        render_sidebar(&state.sessions, frame, sidebar);
    }
    render_header(&state.header, frame, layout.header);
    render_transcript_pane(state, frame, &layout);
    input::render_input(state, frame, layout.input, app.overlay.is_none());
    render_status_line(state, frame, layout.status);

    // Overlay last, so it appears on top
    app.overlay.render(frame, area, state);
}

fn render_transcript_pane(state: &TuiState, frame: &mut Frame, layout: &MainLayout) {
    let text_area = layout.transcript_text();
    let height = text_area.height as usize;

    if state.transcript.cells().is_empty() {
        let hint = if state.sessions.current_id().is_some() {
            "开始对话吧"
        } else if state.sessions.is_empty() {
            "暂无会话，按 Ctrl+N 新建"
        } else {
            "加载中…"
        };
        let y = text_area.y + text_area.height / 2;
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center),
            Rect::new(text_area.x, y, text_area.width, text_area.height.min(1)),
        );
        return;
    }

    let all_lines = transcript::render_transcript(
        &state.transcript,
        text_area.width as usize,
        state.syntax_theme(),
        state.spinner_frame,
    );
    let total_lines = all_lines.len();
    let offset = state
        .transcript
        .scroll
        .get_offset(height)
        .min(total_lines.saturating_sub(height));

    let visible: Vec<Line<'static>> = all_lines.into_iter().skip(offset).take(height).collect();

    // Bottom-align: pad at the top when content doesn't fill the pane
    let lines = if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.extend(visible);
        padded
    } else {
        visible
    };

    // No .wrap(): cells are already wrapped to the text width
    frame.render_widget(Paragraph::new(lines), text_area);
    frame.render_widget(Scrollbar::new(total_lines, height, offset), layout.transcript);
}

/// Number of transcript lines at the given text width.
pub fn calculate_line_count(state: &TuiState, text_width: u16) -> usize {
    transcript::render_transcript(
        &state.transcript,
        text_width as usize,
        state.syntax_theme(),
        state.spinner_frame,
    )
    .len()
}
