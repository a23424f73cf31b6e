//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: rescan_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: rescan_telemetry::TelemetryError,
    },
    /// Trigger construction failed.
    #[error("trigger construction failed")]
    Trigger {
        /// Operation identifier.
        operation: &'static str,
        /// Configured trigger name.
        name: String,
        /// Source core error.
        source: rescan_core::CoreError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: rescan_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: rescan_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: rescan_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn trigger(
        operation: &'static str,
        name: String,
        source: rescan_core::CoreError,
    ) -> Self {
        Self::Trigger {
            operation,
            name,
            source,
        }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: rescan_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
