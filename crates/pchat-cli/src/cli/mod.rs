//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pchat_core::api::ApiClient;
use pchat_core::config::Config;
use pchat_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "pchat")]
#[command(version)]
#[command(about = "Terminal client for a persona chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend URL (overrides config and PCHAT_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Sends one message and prints the reply
    Send {
        #[arg(value_name = "SESSION_ID")]
        session_id: String,
        /// Message text
        #[arg(value_name = "MESSAGE")]
        message: String,
    },
    /// Manage personas
    Personas {
        #[command(subcommand)]
        command: PersonaCommands,
    },
    /// Uploads an avatar image and prints its URL
    Upload {
        /// PNG or JPEG file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists sessions
    List,
    /// Prints a session's transcript
    Show {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Creates a session from the `[new_session]` config
    New,
    /// Renames a session
    Rename {
        #[arg(value_name = "SESSION_ID")]
        id: String,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Deletes a session
    Delete {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Ends a session (the backend writes a summary)
    Terminate {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Writes a session transcript as standalone HTML
    Export {
        #[arg(value_name = "SESSION_ID")]
        id: String,
        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Subcommand)]
enum PersonaCommands {
    /// Lists personas
    List,
    /// Shows one persona
    Show {
        #[arg(value_name = "PERSONA_ID")]
        id: u64,
    },
    /// Deletes a persona
    Delete {
        #[arg(value_name = "PERSONA_ID")]
        id: u64,
    },
    /// Applies a persona to a session
    Use {
        #[arg(value_name = "SESSION_ID")]
        session_id: String,
        #[arg(value_name = "PERSONA_ID")]
        persona_id: u64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it logs to a file
    let target = if cli.command.is_none() {
        logging::Target::File
    } else {
        logging::Target::Stderr
    };
    let _log_guard = logging::init(target)?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let Cli { command, base_url } = cli;

    let client = || build_client(&config, base_url.as_deref());

    // default to the interactive UI
    let Some(command) = command else {
        return commands::chat::run(&config, client()?).await;
    };

    match command {
        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(&client()?).await,
            SessionCommands::Show { id } => commands::sessions::show(&client()?, &id).await,
            SessionCommands::New => commands::sessions::create(&client()?, &config).await,
            SessionCommands::Rename { id, name } => {
                commands::sessions::rename(&client()?, &id, &name).await
            }
            SessionCommands::Delete { id } => commands::sessions::delete(&client()?, &id).await,
            SessionCommands::Terminate { id } => {
                commands::sessions::terminate(&client()?, &id).await
            }
            SessionCommands::Export { id, output } => {
                commands::sessions::export(&client()?, &id, output.as_deref()).await
            }
        },

        Commands::Send {
            session_id,
            message,
        } => commands::send::run(&client()?, &session_id, &message).await,

        Commands::Personas { command } => match command {
            PersonaCommands::List => commands::personas::list(&client()?).await,
            PersonaCommands::Show { id } => commands::personas::show(&client()?, id).await,
            PersonaCommands::Delete { id } => commands::personas::delete(&client()?, id).await,
            PersonaCommands::Use {
                session_id,
                persona_id,
            } => commands::personas::apply(&client()?, &session_id, persona_id).await,
        },

        Commands::Upload { file } => commands::personas::upload(&client()?, &file).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

/// `--base-url` wins over `PCHAT_BASE_URL`, which wins over the config file.
fn build_client(config: &Config, base_url: Option<&str>) -> Result<ApiClient> {
    let Some(raw) = base_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return ApiClient::from_config(config);
    };
    url::Url::parse(raw).with_context(|| format!("Invalid backend base URL: {raw}"))?;
    Ok(ApiClient::new(raw, config.request_timeout())?)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_base_url_flag_overrides_config() {
        let config = Config::default();
        let client = build_client(&config, Some("http://10.0.0.2:9000/")).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.2:9000");
    }

    #[test]
    fn test_invalid_base_url_flag_is_rejected() {
        let config = Config::default();
        let err = build_client(&config, Some("not a url")).unwrap_err();
        assert!(err.to_string().contains("Invalid backend base URL"));
    }
}
