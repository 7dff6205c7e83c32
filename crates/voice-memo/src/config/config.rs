//! Configuration management for voice-memo.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, DisplayConfig, StorageConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use voice_memo_core::{CaptureOptions, TimestampFormat};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Capture settings.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Recording storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Presentation settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a default file there if it
    /// does not exist.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Capture options for new takes. A zero take length is rejected.
    #[track_caller]
    pub fn capture_options(&self) -> AppResult<CaptureOptions> {
        if self.audio.max_duration_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "audio.max_duration_secs must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(CaptureOptions {
            preset: self.audio.preset,
            max_duration: Duration::from_secs(self.audio.max_duration_secs),
        })
    }

    /// Validated timestamp format.
    #[track_caller]
    pub fn timestamp_format(&self) -> AppResult<TimestampFormat> {
        TimestampFormat::new(self.display.timestamp_format.as_str()).ok_or_else(|| {
            AppError::ConfigError {
                reason: format!(
                    "Invalid timestamp format: {:?}",
                    self.display.timestamp_format
                ),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Directory for finished takes: the configured one, or the platform
    /// data dir.
    #[track_caller]
    pub fn recordings_dir(&self) -> AppResult<PathBuf> {
        if let Some(dir) = &self.storage.recordings_dir {
            return Ok(dir.clone());
        }

        Ok(Self::project_dirs()?.data_dir().join("recordings"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voice-memo", "Voice-Memo").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
