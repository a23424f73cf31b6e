//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Counts HTTP traffic per route and trigger outcomes per trigger.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    trigger_requests_total: IntCounterVec,
}

/// Snapshot of trigger counters for health reporting and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Requests acknowledged with `200` (dispatched scans and test events).
    pub ok: u64,
    /// Requests rejected with `400`.
    pub bad_request: u64,
    /// Requests that failed downstream with `500`.
    pub internal_error: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built
    /// or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let trigger_requests_total = counter_vec(
            "trigger_requests_total",
            "Trigger notifications handled by outcome",
            &["trigger", "outcome"],
        )?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "trigger_requests_total", &trigger_requests_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                trigger_requests_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the outcome counter for a trigger.
    pub fn inc_trigger_outcome(&self, trigger: &str, outcome: &str) {
        self.inner
            .trigger_requests_total
            .with_label_values(&[trigger, outcome])
            .inc();
    }

    /// Outcome counters for a single trigger.
    #[must_use]
    pub fn trigger_snapshot(&self, trigger: &str) -> MetricsSnapshot {
        let read = |outcome: &str| {
            self.inner
                .trigger_requests_total
                .with_label_values(&[trigger, outcome])
                .get()
        };
        MetricsSnapshot {
            ok: read("ok"),
            bad_request: read("bad_request"),
            internal_error: read("internal_error"),
        }
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::ExpositionEncode {
                families: metric_families.len(),
                source,
            })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::ExpositionUtf8 { source })
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(TelemetryError::metric_setup("build", name))
}

fn register(registry: &Registry, name: &'static str, collector: &IntCounterVec) -> Result<()> {
    registry
        .register(Box::new(collector.clone()))
        .map_err(TelemetryError::metric_setup("register", name))
}
