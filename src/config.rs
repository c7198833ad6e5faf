//! User configuration stored as TOML in `~/.config/fredo/config.toml`

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::ExecutionMode;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Keys accepted by `get`/`set`
pub const CONFIG_KEYS: &[&str] = &[
    "database_path",
    "editor",
    "default_execution_mode",
    "default_search_limit",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key '{0}' (known keys: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FredoConfig {
    /// SQLite file; `~` is expanded
    pub database_path: String,

    /// Editor command line; falls back to $VISUAL / $EDITOR / vim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Mode given to snippets added without `--mode`
    pub default_execution_mode: ExecutionMode,

    /// Result cap for `fredo search` when `--limit` is not given
    pub default_search_limit: usize,
}

impl Default for FredoConfig {
    fn default() -> Self {
        Self {
            database_path: "~/.local/share/fredo/snippets.db".to_string(),
            editor: None,
            default_execution_mode: ExecutionMode::Current,
            default_search_limit: 10,
        }
    }
}

impl FredoConfig {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database_path).into_owned())
    }

    /// Read one key as a string; `None` for an unset optional key
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "database_path" => Some(self.database_path.clone()),
            "editor" => self.editor.clone(),
            "default_execution_mode" => Some(self.default_execution_mode.to_string()),
            "default_search_limit" => Some(self.default_search_limit.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Parse and assign one key. An empty editor clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "database_path" => {
                if value.trim().is_empty() {
                    return Err(invalid("path must not be empty".to_string()));
                }
                self.database_path = value.to_string();
            }
            "editor" => {
                let editor = value.trim();
                self.editor = (!editor.is_empty()).then(|| editor.to_string());
            }
            "default_execution_mode" => {
                self.default_execution_mode = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            }
            "default_search_limit" => {
                self.default_search_limit = value
                    .parse()
                    .map_err(|e| invalid(format!("expected a non-negative integer ({})", e)))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// Loads, caches and saves the config file
#[derive(Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config: Option<FredoConfig>,
}

impl ConfigManager {
    /// Manager for `~/.config/fredo`
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::with_config_dir(home.join(".config").join("fredo")))
    }

    pub fn with_config_dir<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            config: None,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load once, writing a default file the first time
    pub fn load(&mut self) -> Result<&FredoConfig, ConfigError> {
        if self.config.is_none() {
            let config = self.read_or_create()?;
            self.config = Some(config);
        }
        Ok(self.config.get_or_insert_with(FredoConfig::default))
    }

    fn read_or_create(&self) -> Result<FredoConfig, ConfigError> {
        let path = self.config_file();

        if !path.exists() {
            info!("Config file not found, writing defaults to {}", path.display());
            let config = FredoConfig::default();
            self.write(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: FredoConfig = toml::from_str(&content)?;

        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn write(&self, config: &FredoConfig) -> Result<(), ConfigError> {
        let path = self.config_file();
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        let toml_content = toml::to_string_pretty(config)?;
        fs::write(&path, toml_content).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        debug!("Saved configuration to: {}", path.display());
        Ok(())
    }

    pub fn save(&mut self, config: FredoConfig) -> Result<(), ConfigError> {
        self.write(&config)?;
        self.config = Some(config);
        Ok(())
    }

    pub fn get(&mut self, key: &str) -> Result<Option<String>, ConfigError> {
        self.load()?.get(key)
    }

    /// Validate, assign and persist a single key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?.clone();
        config.set(key, value)?;
        self.save(config)
    }

    /// Configured editor, else $VISUAL, else $EDITOR, else vim
    pub fn get_editor(&mut self) -> Result<String, ConfigError> {
        if let Some(editor) = self.load()?.editor.clone() {
            return Ok(editor);
        }
        Ok(["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "vim".to_string()))
    }
}
