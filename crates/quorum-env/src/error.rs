use std::io;
use std::path::PathBuf;

use quorum_lazy::LazyError;

/// Errors produced by environment helpers.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// A state check failed.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A log level or filter directive could not be parsed.
    #[error("invalid log directive {directive:?}: {reason}")]
    InvalidDirective { directive: String, reason: String },

    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    LoggingInstalled(String),

    /// The installed filter could not be replaced.
    #[error("failed to reload log filter: {0}")]
    Reload(String),

    /// Configuration file could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Platform detection failed.
    #[error("platform detection failed: {0}")]
    Platform(#[from] LazyError),

    /// I/O error while reading configuration.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the environment crate.
pub type EnvResult<T> = std::result::Result<T, EnvError>;
