//! Error types for telemetry operations.

use std::string::FromUtf8Error;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::init::LogFormat;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while wiring logging or exposing metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global log subscriber could not be installed.
    #[error("failed to install log subscriber")]
    LoggingInstall {
        /// Output format that was being installed.
        format: LogFormat,
        /// Underlying subscriber error.
        source: TryInitError,
    },
    /// A counter could not be built or added to the registry.
    #[error("failed to set up metric")]
    MetricSetup {
        /// Step that failed (`build` or `register`).
        operation: &'static str,
        /// Metric family name.
        metric: &'static str,
        /// Underlying Prometheus error.
        source: prometheus::Error,
    },
    /// The registry could not be encoded as Prometheus text.
    #[error("failed to encode metrics exposition")]
    ExpositionEncode {
        /// Number of metric families gathered for the scrape.
        families: usize,
        /// Underlying Prometheus error.
        source: prometheus::Error,
    },
    /// The encoded exposition was not valid UTF-8.
    #[error("metrics exposition was not valid utf-8")]
    ExpositionUtf8 {
        /// Underlying conversion error.
        source: FromUtf8Error,
    },
}

impl TelemetryError {
    pub(crate) fn metric_setup(
        operation: &'static str,
        metric: &'static str,
    ) -> impl FnOnce(prometheus::Error) -> Self {
        move |source| Self::MetricSetup {
            operation,
            metric,
            source,
        }
    }
}
