use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no tokio runtime available to drive toast timers")]
    Runtime(#[source] tokio::runtime::TryCurrentError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

impl From<tokio::runtime::TryCurrentError> for Error {
    fn from(source: tokio::runtime::TryCurrentError) -> Self {
        Self::Runtime(source)
    }
}

impl Error {
    /// Configuration problems are the only errors a caller can fix by editing
    /// input; everything else is an environment problem.
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
