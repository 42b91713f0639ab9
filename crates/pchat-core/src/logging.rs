//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive sessions log to
//! `$PCHAT_HOME/logs/pchat.log`. One-shot CLI commands log to stderr.
//! `PCHAT_LOG` takes any `EnvFilter` directive.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PCHAT_LOG";

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "pchat.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stderr,
    File,
}

impl Target {
    fn default_directive(self) -> &'static str {
        match self {
            Target::Stderr => "warn",
            Target::File => "info",
        }
    }
}

fn env_filter(target: Target) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(target.default_directive()))
}

/// Installs the global subscriber.
///
/// Returns the appender guard for file logging; keep it alive until exit or
/// buffered lines are lost. A second call is a no-op.
///
/// # Errors
/// Returns an error if the logs directory cannot be created.
pub fn init(target: Target) -> Result<Option<WorkerGuard>> {
    match target {
        Target::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(target))
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
            Ok(None)
        }
        Target::File => init_file(&crate::config::paths::logs_dir()).map(Some),
    }
}

fn init_file(dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(Target::File))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let guard = init_file(&logs).unwrap();
        tracing::info!("file logging ready");
        drop(guard);

        assert!(logs.is_dir());
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(Target::Stderr.default_directive(), "warn");
        assert_eq!(Target::File.default_directive(), "info");
    }
}
