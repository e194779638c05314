use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Upper bound for both window settings, about ten years.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Hint sent along with the text telling the service what the user wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    #[default]
    Auto,
    Add,
    Delete,
}

impl CommandType {
    pub fn next(&self) -> Self {
        match self {
            CommandType::Auto => CommandType::Add,
            CommandType::Add => CommandType::Delete,
            CommandType::Delete => CommandType::Auto,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommandType::Auto => "Auto",
            CommandType::Add => "Add",
            CommandType::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// EventKit on macOS, the local file elsewhere.
    #[default]
    System,
    Local,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub command_type: CommandType,
    pub backend: Backend,
    /// How far ahead events are loaded and sent as context.
    pub horizon_days: i64,
    /// How far back events are loaded for the stats.
    pub lookback_days: i64,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            command_type: CommandType::Auto,
            backend: Backend::System,
            horizon_days: 365,
            lookback_days: 30,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read config, using defaults");
                return Self::default();
            }
        };
        match toml::from_str::<Config>(&content) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Event window ahead of now, always within `1..=MAX_WINDOW_DAYS`.
    pub fn horizon(&self) -> chrono::Duration {
        chrono::Duration::days(self.horizon_days.clamp(1, MAX_WINDOW_DAYS))
    }

    /// Event window behind now, always within `0..=MAX_WINDOW_DAYS`.
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::days(self.lookback_days.clamp(0, MAX_WINDOW_DAYS))
    }

    fn sanitized(mut self) -> Self {
        self.horizon_days = self.horizon_days.clamp(1, MAX_WINDOW_DAYS);
        self.lookback_days = self.lookback_days.clamp(0, MAX_WINDOW_DAYS);
        if self.endpoint.trim().is_empty() {
            self.endpoint = DEFAULT_ENDPOINT.to_string();
        }
        self
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("event-parser").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.command_type, CommandType::Auto);
        assert_eq!(config.horizon_days, 365);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
endpoint = "https://parser.example.com"
command_type = "delete"
backend = "local"
horizon_days = 0

[theme]
accent = "#ff8800"
"##,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.endpoint, "https://parser.example.com");
        assert_eq!(config.command_type, CommandType::Delete);
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.horizon_days, 1);
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.theme.accent.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn huge_windows_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "horizon_days = 9223372036854775807\nlookback_days = 1000000000\n",
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.horizon_days, MAX_WINDOW_DAYS);
        assert_eq!(config.lookback_days, MAX_WINDOW_DAYS);

        let raw = Config {
            horizon_days: i64::MAX,
            lookback_days: i64::MIN,
            ..Config::default()
        };
        assert_eq!(raw.horizon(), chrono::Duration::days(MAX_WINDOW_DAYS));
        assert_eq!(raw.lookback(), chrono::Duration::zero());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "command_type = \"shout\"").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.command_type, CommandType::Auto);
    }

    #[test]
    fn command_type_cycles() {
        let t = CommandType::Auto;
        assert_eq!(t.next().next().next(), CommandType::Auto);
        assert_eq!(t.next().label(), "Add");
    }
}
