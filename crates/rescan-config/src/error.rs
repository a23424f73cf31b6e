//! Error types for configuration loading and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration document was not valid YAML for the model.
    #[error("failed to parse configuration document")]
    Parse {
        /// File the document came from, when loaded from disk.
        path: Option<PathBuf>,
        /// Source YAML error.
        source: serde_yaml::Error,
    },
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section that failed validation.
        section: String,
        /// Field that failed validation.
        field: String,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Two triggers share the same name and would collide on one route.
    #[error("duplicate trigger name")]
    DuplicateTrigger {
        /// Name used more than once.
        name: String,
    },
    /// A trigger's rewrite rules failed to compile.
    #[error("invalid rewrite rule")]
    InvalidRewrite {
        /// Trigger owning the rule.
        trigger: String,
        /// Source compilation error.
        source: rescan_core::CoreError,
    },
    /// Verbosity value was not a known level.
    #[error("invalid verbosity")]
    InvalidVerbosity {
        /// Verbosity payload provided by the caller.
        value: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
