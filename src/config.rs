use crate::error::{Result, VerseError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV_VAR: &str = "VERSE_MEMORY_CONFIG";

/// Application configuration, read from `~/.verse-memory/config.toml`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub practice: PracticeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".verse-memory"))
        .unwrap_or_else(|| PathBuf::from(".verse-memory"))
}

fn default_database_path() -> PathBuf {
    default_data_dir().join("verses.sqlite3")
}

#[derive(Debug, Clone, Deserialize)]
pub struct PracticeConfig {
    /// Whose verses the desktop app shows
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Maximum verses per practice session (unlimited when absent)
    #[serde(default)]
    pub session_limit: Option<usize>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            session_limit: None,
        }
    }
}

fn default_user_id() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    pub fn default_path() -> PathBuf {
        default_data_dir().join("config.toml")
    }

    /// Loads from `$VERSE_MEMORY_CONFIG`, else the default path. A missing
    /// file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| VerseError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| VerseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.practice.user_id.trim().is_empty() {
            return Err(VerseError::Config("practice.user_id must not be empty".into()));
        }
        if self.practice.session_limit == Some(0) {
            return Err(VerseError::Config("practice.session_limit must be at least 1".into()));
        }
        Ok(())
    }
}
