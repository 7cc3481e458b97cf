use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::types::{AnimationMode, Position, ToastDuration};

use super::defaults::{
    default_animation, default_autopilot_enabled, default_collapse_after, default_duration,
    default_exit_duration, default_expand_after, default_position, default_queue_bound,
};
use super::env::{env_parse, env_string};
use super::{AutopilotDefaults, Config, EngineSettings, HumantimeDuration};

pub(super) fn load(path: &Path) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("NOTIX")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toasts: RawToasts,
    #[serde(default)]
    pub(super) autopilot: RawAutopilot,
    #[serde(default)]
    pub(super) renderer: RawRenderer,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToasts {
    #[serde(default = "default_position")]
    pub(super) position: String,
    #[serde(default = "default_duration")]
    pub(super) duration: ToastDuration,
    #[serde(default = "default_exit_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) exit_duration: Duration,
    #[serde(default = "default_animation")]
    pub(super) animation: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawAutopilot {
    #[serde(default = "default_autopilot_enabled")]
    pub(super) enabled: bool,
    #[serde(default = "default_expand_after")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) expand_after: Duration,
    #[serde(default = "default_collapse_after")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) collapse_after: Duration,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawRenderer {
    #[serde(default = "default_queue_bound")]
    pub(super) queue_bound: usize,
}

impl Default for RawToasts {
    fn default() -> Self {
        Self {
            position: default_position(),
            duration: default_duration(),
            exit_duration: default_exit_duration(),
            animation: default_animation(),
        }
    }
}

impl Default for RawAutopilot {
    fn default() -> Self {
        Self {
            enabled: default_autopilot_enabled(),
            expand_after: default_expand_after(),
            collapse_after: default_collapse_after(),
        }
    }
}

impl Default for RawRenderer {
    fn default() -> Self {
        Self {
            queue_bound: default_queue_bound(),
        }
    }
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(position) = env_string("NOTIX_POSITION")? {
            self.toasts.position = position;
        }
        if let Some(duration) = env_parse::<ToastDuration>("NOTIX_DURATION")? {
            self.toasts.duration = duration;
        }
        if let Some(animation) = env_string("NOTIX_ANIMATION")? {
            self.toasts.animation = animation;
        }
        if let Some(autopilot) = env_parse::<bool>("NOTIX_AUTOPILOT")? {
            self.autopilot.enabled = autopilot;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let position =
            Position::from_str(&self.toasts.position).map_err(|err| ConfigError::InvalidField {
                field: "toasts.position",
                message: err,
            })?;
        let animation = AnimationMode::from_str(&self.toasts.animation).map_err(|err| {
            ConfigError::InvalidField {
                field: "toasts.animation",
                message: err,
            }
        })?;

        if self.toasts.exit_duration.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "toasts.exit_duration",
                message: "exit animation window must be greater than zero".to_string(),
            }
            .into());
        }
        if self.autopilot.collapse_after < self.autopilot.expand_after {
            return Err(ConfigError::InvalidField {
                field: "autopilot.collapse_after",
                message: format!(
                    "collapse ({}) must not come before expand ({})",
                    humantime::format_duration(self.autopilot.collapse_after),
                    humantime::format_duration(self.autopilot.expand_after)
                ),
            }
            .into());
        }
        if self.renderer.queue_bound == 0 {
            return Err(ConfigError::InvalidField {
                field: "renderer.queue_bound",
                message: "queue bound must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(Config {
            default_position: position,
            engine: EngineSettings {
                default_duration: self.toasts.duration,
                exit_duration: self.toasts.exit_duration,
                default_animation: animation,
                autopilot: AutopilotDefaults {
                    enabled: self.autopilot.enabled,
                    expand_after: self.autopilot.expand_after,
                    collapse_after: self.autopilot.collapse_after,
                },
            },
            queue_capacity: self.renderer.queue_bound,
        })
    }
}
