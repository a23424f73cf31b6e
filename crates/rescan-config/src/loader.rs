//! Loading configuration documents from disk or memory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;
use crate::validate::validate;

/// Configuration path from `RESCAN_CONFIG`, falling back to `config.yml`.
#[must_use]
pub fn config_path_from_env() -> PathBuf {
    resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok())
}

fn resolve_config_path(value: Option<String>) -> PathBuf {
    value
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Read, parse and validate the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::Parse`] when it is not a valid document, and any
/// validation error raised by [`validate`].
pub fn load_from_path(path: &Path) -> ConfigResult<AppConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text, Some(path))?;
    debug!(path = %path.display(), triggers = config.triggers.tdarr.len(), "configuration loaded");
    Ok(config)
}

/// Parse and validate an in-memory configuration document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or a validation error.
pub fn load_from_str(text: &str) -> ConfigResult<AppConfig> {
    parse(text, None)
}

fn parse(text: &str, path: Option<&Path>) -> ConfigResult<AppConfig> {
    let config = if text.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str::<AppConfig>(text).map_err(|source| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?
    };
    validate(&config)?;
    Ok(config)
}
