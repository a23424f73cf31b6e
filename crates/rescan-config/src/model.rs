//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers deserialised from YAML; IO lives in `loader.rs`.
//! - Every field has a default so a minimal file only lists its triggers.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rescan_core::RewriteRule;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing::level_filters::LevelFilter;

use crate::defaults::{DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_PORT, DEFAULT_TDARR_NAME};
use crate::error::ConfigError;

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP host binds to.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// Port the HTTP host binds to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Process-wide logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Configured trigger instances, grouped by kind.
    #[serde(default)]
    pub triggers: TriggersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            logging: LoggingSettings::default(),
            triggers: TriggersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Socket address assembled from `host` and `port`.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Logging settings consumed by the telemetry crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive (e.g. `info`, `rescan_api=debug`); `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format; inferred from the build profile when absent.
    #[serde(default)]
    pub format: Option<LogFormatSetting>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Log output format requested by the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Trigger instances by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggersConfig {
    /// Tdarr webhook triggers.
    #[serde(default)]
    pub tdarr: Vec<TdarrConfig>,
}

impl TriggersConfig {
    /// Names of every configured trigger, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tdarr.iter().map(|trigger| trigger.name.as_str())
    }
}

/// Construction-time settings for one Tdarr trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdarrConfig {
    /// Trigger identifier; also the route segment under `/triggers/`.
    #[serde(default = "default_tdarr_name")]
    pub name: String,
    /// Priority copied into every scan request.
    #[serde(default)]
    pub priority: i32,
    /// Ordered rewrite rules applied to reported paths.
    #[serde(default)]
    pub rewrite: Vec<RewriteRule>,
    /// Diagnostic verbosity for this trigger.
    #[serde(default)]
    pub verbosity: Verbosity,
}

impl Default for TdarrConfig {
    fn default() -> Self {
        Self {
            name: default_tdarr_name(),
            priority: 0,
            rewrite: Vec::new(),
            verbosity: Verbosity::default(),
        }
    }
}

/// Per-trigger diagnostic level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Everything, including decoded request bodies.
    Trace,
    /// Connectivity tests and other chatter.
    Debug,
    /// Successful dispatches.
    #[default]
    Info,
    /// Warnings and errors.
    #[serde(alias = "warning")]
    Warn,
    /// Errors only.
    Error,
}

impl Verbosity {
    /// Lowercase name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Equivalent `tracing` filter.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }

    /// Whether a record at `level` should be emitted.
    #[must_use]
    pub fn allows(self, level: Level) -> bool {
        self.level_filter() >= LevelFilter::from_level(level)
    }
}

impl FromStr for Verbosity {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "" | "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidVerbosity {
                value: value.to_string(),
            }),
        }
    }
}

const fn default_host() -> IpAddr {
    DEFAULT_HOST
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_tdarr_name() -> String {
    DEFAULT_TDARR_NAME.to_string()
}
