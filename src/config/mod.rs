use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::{ConfigError, Error};
use crate::types::{AnimationMode, Position, ToastDuration};

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

#[derive(Debug, Clone)]
pub struct Config {
    pub default_position: Position,
    pub engine: EngineSettings,
    /// Capacity of the snapshot queue between the store and a renderer.
    pub queue_capacity: usize,
}

/// Knobs the engine reads on every operation. Fixed for a manager's lifetime;
/// the mutable per-call defaults live on the manager itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub default_duration: ToastDuration,
    /// Time between a dismissal and the physical removal of the record.
    pub exit_duration: Duration,
    pub default_animation: AnimationMode,
    pub autopilot: AutopilotDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutopilotDefaults {
    pub enabled: bool,
    pub expand_after: Duration,
    pub collapse_after: Duration,
}

impl Config {
    /// Load configuration from an optional TOML file, `NOTIX__*` variables
    /// and the short `NOTIX_*` overrides, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration cannot be parsed or when the
    /// resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path.as_ref()).map_err(Error::from)?;
        raw.apply_env_overrides().map_err(Error::from)?;
        raw.validate_and_build()
    }

    /// Like [`Config::from_env_and_file`], but the file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] when the file cannot be accessed, and
    /// any error [`Config::from_env_and_file`] returns.
    pub fn from_required_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_env_and_file(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_position: Position::default(),
            engine: EngineSettings::default(),
            queue_capacity: defaults::default_queue_bound(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_duration: defaults::default_duration(),
            exit_duration: defaults::default_exit_duration(),
            default_animation: AnimationMode::default(),
            autopilot: AutopilotDefaults::default(),
        }
    }
}

impl Default for AutopilotDefaults {
    fn default() -> Self {
        Self {
            enabled: defaults::default_autopilot_enabled(),
            expand_after: defaults::default_expand_after(),
            collapse_after: defaults::default_collapse_after(),
        }
    }
}
