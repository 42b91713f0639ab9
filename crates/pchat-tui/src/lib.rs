//! Full-screen chat client for the pchat backend.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use features::transcript::markdown;
pub use features::{chat, header, input, personas, sessions, statusline, transcript};
use pchat_core::api::ApiClient;
use pchat_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive chat UI against `client` until the user quits.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the terminal fails.
pub async fn run_interactive(config: &Config, client: ApiClient) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The chat UI requires a terminal.\n\
             Use `pchat send <session> <text>` for non-interactive use."
        );
    }

    let mut err = stderr();
    writeln!(err, "pchat")?;
    writeln!(err, "Backend: {}", client.base_url())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(config.clone(), client)?;
    runtime.run()?;
    drop(runtime);

    // Terminal is restored by now
    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
