use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::groups::DEFAULT_GROUP_COUNT;
use crate::domain::spin::SpinLimits;

/// User-facing configuration for the wheel and group generator
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WheelConfig {
    pub min_spin_ms: u64,
    pub max_spin_ms: u64,
    pub min_extra_turns: u32,
    pub max_extra_turns: u32,
    /// Delay before a winner is dropped when winners are not kept
    pub removal_delay_ms: u64,
    pub keep_winners: bool,
    pub default_group_count: usize,
    /// Frame pacing for the terminal driver
    pub frame_interval_ms: u64,
    pub canvas_size: u32,
    pub wheel_radius: f32,
    pub font_path: Option<PathBuf>,
}

impl WheelConfig {
    pub const DEFAULT_REMOVAL_DELAY_MS: u64 = 3000;
    pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
    pub const DEFAULT_CANVAS_SIZE: u32 = 600;
    pub const DEFAULT_WHEEL_RADIUS: f32 = 280.0;
    pub const MIN_CANVAS_SIZE: u32 = 64;
    pub const MAX_CANVAS_SIZE: u32 = 4096;
    pub const MAX_FRAME_INTERVAL_MS: u64 = 1000;

    /// Loads a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON config document
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges and geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_spin_ms == 0 || self.min_spin_ms > self.max_spin_ms {
            return Err(ConfigError::InvalidRange {
                field: "spin duration",
                min: self.min_spin_ms,
                max: self.max_spin_ms,
            });
        }

        if self.min_extra_turns == 0 || self.min_extra_turns > self.max_extra_turns {
            return Err(ConfigError::InvalidRange {
                field: "extra turns",
                min: u64::from(self.min_extra_turns),
                max: u64::from(self.max_extra_turns),
            });
        }

        if self.default_group_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_group_count",
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.frame_interval_ms == 0 || self.frame_interval_ms > Self::MAX_FRAME_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "frame_interval_ms",
                reason: format!("must be between 1 and {}", Self::MAX_FRAME_INTERVAL_MS),
            });
        }

        if !(Self::MIN_CANVAS_SIZE..=Self::MAX_CANVAS_SIZE).contains(&self.canvas_size) {
            return Err(ConfigError::InvalidValue {
                field: "canvas_size",
                reason: format!(
                    "must be between {} and {} pixels",
                    Self::MIN_CANVAS_SIZE,
                    Self::MAX_CANVAS_SIZE
                ),
            });
        }

        let max_radius = self.canvas_size as f32 / 2.0;
        if !(self.wheel_radius > 0.0 && self.wheel_radius <= max_radius) {
            return Err(ConfigError::InvalidValue {
                field: "wheel_radius",
                reason: format!("must be positive and at most {max_radius} for this canvas"),
            });
        }

        Ok(())
    }

    pub fn spin_limits(&self) -> SpinLimits {
        SpinLimits {
            min_duration_ms: self.min_spin_ms,
            max_duration_ms: self.max_spin_ms,
            min_extra_turns: self.min_extra_turns,
            max_extra_turns: self.max_extra_turns,
        }
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        let limits = SpinLimits::default();
        Self {
            min_spin_ms: limits.min_duration_ms,
            max_spin_ms: limits.max_duration_ms,
            min_extra_turns: limits.min_extra_turns,
            max_extra_turns: limits.max_extra_turns,
            removal_delay_ms: Self::DEFAULT_REMOVAL_DELAY_MS,
            keep_winners: true,
            default_group_count: DEFAULT_GROUP_COUNT,
            frame_interval_ms: Self::DEFAULT_FRAME_INTERVAL_MS,
            canvas_size: Self::DEFAULT_CANVAS_SIZE,
            wheel_radius: Self::DEFAULT_WHEEL_RADIUS,
            font_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid {field} range: {min}..={max}")]
    InvalidRange { field: &'static str, min: u64, max: u64 },
    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
