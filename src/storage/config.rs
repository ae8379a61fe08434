//! Application configuration.
//!
//! Read from `config.toml` in the platform data directory unless a path is
//! given. A missing file means defaults.

use crate::planner::time::TimeOfDay;
use crate::planner::types::{Segment, TrainingSession, DEFAULT_TARGET_EPH, START_LABEL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Planner defaults
    #[serde(default)]
    pub planner: PlannerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            planner: PlannerSettings::default(),
        }
    }
}

/// Defaults applied when creating sessions and segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Target intensity for new segments (effort points per hour)
    pub default_target_eph: f64,
    /// Start time of new sessions
    pub default_start_time: TimeOfDay,
    /// Name of the start row
    pub start_label: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_target_eph: DEFAULT_TARGET_EPH,
            default_start_time: TimeOfDay::new(7, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            start_label: START_LABEL.to_string(),
        }
    }
}

impl PlannerSettings {
    /// Target intensity for new segments, falling back to the built-in
    /// default if the configured one is not a positive number.
    pub fn target_eph(&self) -> f64 {
        if self.default_target_eph.is_finite() && self.default_target_eph > 0.0 {
            self.default_target_eph
        } else {
            DEFAULT_TARGET_EPH
        }
    }

    /// The start row of a new session.
    pub fn start_segment(&self) -> Segment {
        Segment::new(self.start_label.clone(), self.target_eph())
    }

    /// A new session holding only the start row.
    pub fn new_session(&self, name: impl Into<String>, date: NaiveDate) -> TrainingSession {
        TrainingSession::new(
            name,
            date,
            self.default_start_time,
            vec![self.start_segment()],
        )
    }
}

/// Platform data directory, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "runplanner", "RunPlanner")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// `config.toml` inside the data directory.
    pub fn default_path() -> PathBuf {
        data_dir().join("config.toml")
    }

    /// Read the config at `path`. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::info!("Loaded config from {}", path.display());
                toml::from_str::<AppConfig>(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                AppConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.data_dir = data_dir();
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
