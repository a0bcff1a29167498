//! Persistent application preferences: currency label and data location.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

/// User-configurable preferences with serde defaults, so older config
/// files keep loading as fields are added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for the database file. Defaults to
    /// the platform data directory under `savings-core`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: Self::default_locale(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "IDR".into()
    }

    pub fn default_locale() -> String {
        "id-ID".into()
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("savings-core")
    }
}

/// Loads and saves the config file under a fixed root directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    root: PathBuf,
}

impl ConfigManager {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Reads the config file, falling back to defaults when absent.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.config_path(), &data)?;
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
