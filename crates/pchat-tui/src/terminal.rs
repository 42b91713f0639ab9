//! Raw mode, alternate screen and the extra input modes the chat UI needs.
//!
//! Every exit path (normal return, `Drop` of the runtime, panic) ends in
//! `restore_terminal`, which is safe to call more than once.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches to raw mode on the alternate screen and wraps stdout.
///
/// # Errors
/// Returns an error if any terminal command fails.
pub fn setup_terminal() -> Result<ChatTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

/// Turns on mouse wheel reporting (transcript scrolling) and bracketed
/// paste (multi-line drafts arrive as one `Paste` event).
///
/// # Errors
/// Returns an error if the terminal rejects the commands.
pub fn enable_input_features() -> Result<()> {
    execute!(io::stdout(), EnableBracketedPaste, EnableMouseCapture)
        .context("Failed to enable mouse capture and bracketed paste")
}

/// Reverses `enable_input_features`.
///
/// # Errors
/// Returns an error if the terminal rejects the commands.
pub fn disable_input_features() -> Result<()> {
    execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste)
        .context("Failed to disable mouse capture and bracketed paste")
}

/// Puts the terminal back the way the shell expects it.
///
/// # Errors
/// Returns an error if leaving the alternate screen or raw mode fails.
pub fn restore_terminal() -> Result<()> {
    // Input modes must go before raw mode does
    let _ = disable_input_features();
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")
}

/// Chains a terminal restore in front of the current panic hook so the
/// panic message lands on a usable screen.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}
