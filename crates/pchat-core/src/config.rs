use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "PCHAT_BASE_URL";

const DEFAULT_TEMPLATE: &str = include_str!("../default_config.toml");

pub mod paths {
    //! Where pchat keeps its files: `$PCHAT_HOME` when set, otherwise
    //! `~/.config/pchat`.

    use std::path::PathBuf;

    pub fn pchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("PCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".pchat"),
            |h| h.join(".config").join("pchat"),
        )
    }

    pub fn config_path() -> PathBuf {
        pchat_home().join("config.toml")
    }

    /// Directory holding `pchat.log` in interactive mode.
    pub fn logs_dir() -> PathBuf {
        pchat_home().join("logs")
    }
}

/// Rename-polling cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_attempts: 10,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Values posted to `/api/setup` when a new session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSessionConfig {
    pub model_name: String,
    pub personality: String,
    pub ai_name: String,
    pub ai_avatar: String,
}

impl Default for NewSessionConfig {
    fn default() -> Self {
        Self {
            model_name: "Deepseek".to_string(),
            personality: String::new(),
            ai_name: "AI助手".to_string(),
            ai_avatar: "/static/ai_avatar.png".to_string(),
        }
    }
}

impl NewSessionConfig {
    pub fn setup_request(&self) -> pchat_types::SetupRequest {
        pchat_types::SetupRequest {
            model_name: self.model_name.clone(),
            personality: self.personality.clone(),
            ai_name: self.ai_name.clone(),
            ai_avatar: self.ai_avatar.clone(),
            persona_id: None,
        }
    }
}

/// Interface preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub sidebar_collapsed: bool,
    pub syntax_theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            syntax_theme: Config::DEFAULT_SYNTAX_THEME.to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat backend root URL.
    pub base_url: String,
    /// Optional per-request timeout. `None` or 0 waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub polling: PollingConfig,
    pub new_session: NewSessionConfig,
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            polling: PollingConfig::default(),
            new_session: NewSessionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8888";
    pub const DEFAULT_SYNTAX_THEME: &'static str = "base16-ocean.dark";

    /// Loads configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Reads `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        replace_file(path, DEFAULT_TEMPLATE)
    }

    /// Backend URL after applying `PCHAT_BASE_URL`, validated.
    ///
    /// # Errors
    /// Returns an error if the effective URL does not parse.
    pub fn resolved_base_url(&self) -> Result<String> {
        let env = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(env.as_deref(), &self.base_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Persists the sidebar preference to the default config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or written.
    pub fn save_sidebar_collapsed(collapsed: bool) -> Result<()> {
        Self::save_sidebar_collapsed_to(&paths::config_path(), collapsed)
    }

    /// Rewrites `ui.sidebar_collapsed` in place. Everything else in the file,
    /// comments included, is left alone. A missing file starts from the
    /// default template.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or written.
    pub fn save_sidebar_collapsed_to(path: &Path, collapsed: bool) -> Result<()> {
        let source = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DEFAULT_TEMPLATE.to_string(),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };

        let mut doc: DocumentMut = source
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        let ui = doc
            .entry("ui")
            .or_insert(toml_edit::table())
            .as_table_like_mut()
            .with_context(|| format!("`ui` in {} is not a table", path.display()))?;
        ui.insert("sidebar_collapsed", toml_edit::value(collapsed));

        replace_file(path, &doc.to_string())
    }
}

/// Stages `contents` beside `path`, then renames it over the original.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }

    let staging = path.with_extension("toml.partial");
    fs::write(&staging, contents).with_context(|| format!("write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("move {} into place", staging.display()))?;
    Ok(())
}

/// Picks the env override when non-blank, else the configured URL, else the default.
fn resolve_base_url(env_url: Option<&str>, config_url: &str) -> Result<String> {
    let chosen = env_url
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(config_url.trim()).filter(|s| !s.is_empty()))
        .unwrap_or(Config::DEFAULT_BASE_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid backend base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();

        assert_eq!(config.base_url, "http://localhost:8888");
        assert_eq!(config.polling.interval_secs, 3);
        assert_eq!(config.polling.max_attempts, 10);
        assert_eq!(config.new_session.ai_name, "AI助手");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "base_url = \"http://chat.internal:9000\"\n[polling]\nmax_attempts = 4\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://chat.internal:9000");
        assert_eq!(config.polling.max_attempts, 4);
        assert_eq!(config.polling.interval_secs, 3);
        assert_eq!(config.new_session.model_name, "Deepseek");
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("http://localhost:8888"));
        assert!(contents.contains("# request_timeout_secs ="));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_save_sidebar_preserves_user_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "base_url = \"http://10.0.0.2:8888\"\n").unwrap();

        Config::save_sidebar_collapsed_to(&config_path, true).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert!(config.ui.sidebar_collapsed);
        assert_eq!(config.base_url, "http://10.0.0.2:8888");
    }

    #[test]
    fn test_save_sidebar_keeps_user_comments() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "# my backend\nbase_url = \"http://10.0.0.2:8888\"\n\n[ui]\nsidebar_collapsed = false\n",
        )
        .unwrap();

        Config::save_sidebar_collapsed_to(&config_path, true).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# my backend"));
        assert!(contents.contains("sidebar_collapsed = true"));
        assert!(!config_path.with_extension("toml.partial").exists());
    }

    #[test]
    fn test_save_sidebar_without_file_starts_from_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        Config::save_sidebar_collapsed_to(&config_path, true).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# pchat configuration"));
        assert!(Config::load_from(&config_path).unwrap().ui.sidebar_collapsed);
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);

        let config = Config {
            request_timeout_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_env_base_url_wins_over_config() {
        let url = resolve_base_url(Some(" http://env:1234/ "), "http://cfg:1").unwrap();
        assert_eq!(url, "http://env:1234");
    }

    #[test]
    fn test_blank_env_base_url_falls_back_to_config() {
        let url = resolve_base_url(Some("  "), "http://cfg:1").unwrap();
        assert_eq!(url, "http://cfg:1");

        let url = resolve_base_url(None, "").unwrap();
        assert_eq!(url, Config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = resolve_base_url(None, "not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid backend base URL"));
    }
}
