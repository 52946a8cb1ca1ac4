//! Loading and saving of the config file.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::info;

use super::parser::parse_ini;
use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    Write(std::io::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    Directory(std::io::Error),
}

/// Directory holding the config file and default status log
/// (`~/.waypost`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".waypost")
}

/// Default config file path (`~/.waypost/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

impl ConfigFile {
    /// Load configuration from the default path.
    ///
    /// If the file doesn't exist, creates it with defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path, creating it with defaults
    /// when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            info!(path = %path.display(), "Created config file with defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Write these settings to `path` in INI format.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::Directory)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("tracking"))
            .set("interval_secs", self.tracking.interval_secs.to_string())
            .set(
                "fastest_interval_secs",
                self.tracking.fastest_interval_secs.to_string(),
            )
            .set(
                "near_threshold_meters",
                self.tracking.near_threshold_meters.to_string(),
            )
            .set("max_statuses", self.tracking.max_statuses.to_string())
            .set("is_tracked", self.tracking.is_tracked.to_string());
        ini.with_section(Some("sleep"))
            .set("start_hour", self.sleep.start_hour.to_string())
            .set("duration_hours", self.sleep.duration_hours.to_string());
        ini.with_section(Some("logging"))
            .set("status_log", self.logging.status_log.to_string())
            .set(
                "status_log_path",
                self.logging.status_log_path.display().to_string(),
            );
        ini.with_section(Some("source"))
            .set("udp_port", self.source.udp_port.to_string());

        ini.write_to_file(path).map_err(ConfigFileError::Write)
    }
}
