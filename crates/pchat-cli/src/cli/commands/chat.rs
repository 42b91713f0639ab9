//! Interactive mode.

#[cfg(feature = "tui")]
use anyhow::Context;
use anyhow::Result;
use pchat_core::api::ApiClient;
use pchat_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config, client: ApiClient) -> Result<()> {
    pchat_tui::run_interactive(config, client)
        .await
        .context("interactive chat failed")
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config, _client: ApiClient) -> Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
