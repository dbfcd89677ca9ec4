//! Journal runtime configuration.
//!
//! # Responsibility
//! - Describe where entries live, which backend stores them and how loads
//!   treat bad records.
//! - Parse optional JSON config files; every field has a default.
//!
//! # Invariants
//! - A validated config has a supported `log_level`, a non-empty `data_path`
//!   when one is set, and an absolute `log_dir` when one is set.
//! - An unset `data_path` resolves to the backend's own default file.

use crate::analysis::sentiment::{Lexicon, LexiconError};
use crate::logging::{default_log_level, normalize_level};
use crate::repo::LoadPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// CSV file used when no data path is configured.
pub const DEFAULT_CSV_FILE: &str = "mood_data.csv";
/// SQLite database used when no data path is configured.
pub const DEFAULT_SQLITE_FILE: &str = "mood_data.db";

/// Durable storage kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Five-column CSV file.
    #[default]
    Csv,
    /// SQLite database with an `entries` table.
    Sqlite,
}

impl StorageBackend {
    /// Data file used when the config names none.
    pub fn default_data_file(self) -> &'static str {
        match self {
            Self::Csv => DEFAULT_CSV_FILE,
            Self::Sqlite => DEFAULT_SQLITE_FILE,
        }
    }
}

/// Config load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Invalid(String),
    Lexicon(LexiconError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid config file: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
            Self::Lexicon(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Lexicon(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<LexiconError> for ConfigError {
    fn from(value: LexiconError) -> Self {
        Self::Lexicon(value)
    }
}

/// Runtime configuration shared by the CLI and embedding callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// CSV file or SQLite database path. Unset means the backend default.
    pub data_path: Option<PathBuf>,
    pub backend: StorageBackend,
    pub load_policy: LoadPolicy,
    /// Optional JSON word tables replacing the built-in v1 lexicon.
    pub lexicon_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling logs. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            backend: StorageBackend::default(),
            load_policy: LoadPolicy::default(),
            lexicon_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl JournalConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses and validates JSON config text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .data_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid("data_path cannot be empty".to_string()));
        }
        normalize_level(&self.log_level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Journal location for the configured backend.
    pub fn resolved_data_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.backend.default_data_file()))
    }

    /// Resolves the configured lexicon, falling back to v1.
    pub fn lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.lexicon_path {
            Some(path) => Ok(Lexicon::from_json_file(path)?),
            None => Ok(Lexicon::v1()),
        }
    }
}
