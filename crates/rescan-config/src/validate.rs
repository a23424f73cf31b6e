//! Structural validation applied after parsing.

use std::collections::HashSet;

use rescan_core::PathRewriter;

use crate::error::{ConfigError, ConfigResult};
use crate::model::AppConfig;

/// Check a parsed configuration for values the service cannot run with.
///
/// Trigger names must be non-empty, route-safe (`[A-Za-z0-9_-]`) and unique,
/// and every rewrite rule must compile.
///
/// # Errors
///
/// Returns the first [`ConfigError`] encountered.
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    if config.port == 0 {
        return Err(ConfigError::InvalidField {
            section: "server".to_string(),
            field: "port".to_string(),
            value: Some(config.port.to_string()),
            reason: "must be between 1 and 65535",
        });
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "logging".to_string(),
            field: "level".to_string(),
            value: None,
            reason: "must not be empty",
        });
    }

    let mut seen = HashSet::new();
    for trigger in &config.triggers.tdarr {
        validate_trigger_name(&trigger.name)?;
        if !seen.insert(trigger.name.as_str()) {
            return Err(ConfigError::DuplicateTrigger {
                name: trigger.name.clone(),
            });
        }
        PathRewriter::new(&trigger.rewrite).map_err(|source| ConfigError::InvalidRewrite {
            trigger: trigger.name.clone(),
            source,
        })?;
    }

    Ok(())
}

fn validate_trigger_name(name: &str) -> ConfigResult<()> {
    if name.is_empty() {
        return Err(ConfigError::InvalidField {
            section: "triggers".to_string(),
            field: "name".to_string(),
            value: None,
            reason: "must not be empty",
        });
    }
    let route_safe = name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !route_safe {
        return Err(ConfigError::InvalidField {
            section: "triggers".to_string(),
            field: "name".to_string(),
            value: Some(name.to_string()),
            reason: "must contain only letters, digits, '-' or '_'",
        });
    }
    Ok(())
}
