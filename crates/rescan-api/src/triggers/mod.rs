//! Trigger adapters mounted on the HTTP host.
//!
//! # Design
//! - A trigger owns its route, decoding and validation; the host only merges
//!   the router each trigger hands back.
//! - Dependencies (processor, clock, metrics) are injected so handlers stay
//!   deterministic under test.
//! - Failures map to a status-only [`TriggerOutcome`]; details go to the log.

use std::sync::Arc;

use axum::Router;
use rescan_core::{Clock, ScanProcessor, SystemClock};
use rescan_telemetry::Metrics;
use thiserror::Error;

pub mod outcome;
pub mod tdarr;

pub use outcome::TriggerOutcome;

/// Route prefix shared by every trigger endpoint.
pub const TRIGGER_ROUTE_PREFIX: &str = "/triggers";

/// Path a trigger named `name` is mounted on.
#[must_use]
pub fn trigger_route(name: &str) -> String {
    format!("{TRIGGER_ROUTE_PREFIX}/{name}")
}

/// A webhook adapter that converts external notifications into scan requests.
pub trait HttpTrigger: Send + Sync {
    /// Configured name; also the route segment under `/triggers/`.
    fn name(&self) -> &str;

    /// Adapter kind reported by health and logs.
    fn kind(&self) -> &'static str;

    /// Router serving this trigger's endpoint, with its state already bound.
    fn router(self: Arc<Self>) -> Router;
}

/// Collaborators shared by trigger adapters.
#[derive(Clone)]
pub struct TriggerDeps {
    /// Downstream receiver of scan requests.
    pub processor: Arc<dyn ScanProcessor>,
    /// Source of scan timestamps.
    pub clock: Arc<dyn Clock>,
    /// Optional outcome counters.
    pub metrics: Option<Metrics>,
}

impl TriggerDeps {
    /// Dependencies using the wall clock and no metrics.
    #[must_use]
    pub fn new(processor: Arc<dyn ScanProcessor>) -> Self {
        Self {
            processor,
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a metrics registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Reasons a trigger request did not end in a successful dispatch.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The body was not a notification of the expected shape.
    #[error("failed decoding request")]
    Decode {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The event type is not one the trigger acts on.
    #[error("unsupported event type")]
    UnsupportedEvent {
        /// Event type as sent.
        kind: String,
    },
    /// A required field was empty or absent.
    #[error("required field missing")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// The processor rejected the scan.
    #[error("processor could not process scan")]
    Dispatch {
        /// Folder that was being dispatched.
        folder: String,
        /// Processor failure.
        #[source]
        source: anyhow::Error,
    },
}

impl TriggerError {
    /// Status-level outcome reported to the sender.
    #[must_use]
    pub const fn outcome(&self) -> TriggerOutcome {
        match self {
            Self::Decode { .. } | Self::UnsupportedEvent { .. } | Self::MissingField { .. } => {
                TriggerOutcome::BadRequest
            }
            Self::Dispatch { .. } => TriggerOutcome::InternalError,
        }
    }
}
