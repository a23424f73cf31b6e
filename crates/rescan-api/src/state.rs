//! Shared state for the non-trigger endpoints.

use rescan_telemetry::Metrics;
use serde::Serialize;

/// Name and kind of a mounted trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerSummary {
    /// Route segment under `/triggers/`.
    pub name: String,
    /// Adapter kind (e.g. `tdarr`).
    pub kind: &'static str,
}

/// State handed to the health and metrics handlers and the request counter.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) metrics: Metrics,
    pub(crate) triggers: Vec<TriggerSummary>,
}

impl ApiState {
    /// Bundle the metrics registry with the mounted trigger list.
    #[must_use]
    pub const fn new(metrics: Metrics, triggers: Vec<TriggerSummary>) -> Self {
        Self { metrics, triggers }
    }

    /// Triggers mounted on the router.
    #[must_use]
    pub fn triggers(&self) -> &[TriggerSummary] {
        &self.triggers
    }
}
