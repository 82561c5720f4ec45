//! Application configuration: file locations for the model artifact, ride
//! history, and training data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trained model artifact location
    pub model_path: PathBuf,
    /// Ride history CSV location
    pub history_path: PathBuf,
    /// Raw training data CSV (input to `prepare-data`)
    pub raw_data_path: PathBuf,
    /// Cleaned training data CSV (input to `train`)
    pub processed_data_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = get_data_dir();
        Self {
            model_path: data_dir.join("models").join("model.json"),
            history_path: data_dir.join("data").join("ride_history.csv"),
            raw_data_path: data_dir.join("data").join("raw").join("rides_raw.csv"),
            processed_data_path: data_dir
                .join("data")
                .join("processed")
                .join("rides_features.csv"),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "providenceit", "CyclePredict")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from file, falling back to defaults when
/// no config file exists yet.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = get_config_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
