//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, State},
    http::{HeaderName, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use rescan_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics, not_found};
use crate::state::{ApiState, TriggerSummary};
use crate::triggers::HttpTrigger;

/// Axum router wrapper that hosts the configured triggers.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct a new API server with every trigger mounted under
    /// `/triggers/{name}` plus `/health` and `/metrics`.
    ///
    /// # Errors
    ///
    /// Returns an error when a trigger name is unusable as a route segment or
    /// two triggers share a name.
    pub fn new(triggers: Vec<Arc<dyn HttpTrigger>>, telemetry: Metrics) -> ApiServerResult<Self> {
        let summaries = Self::summarise(&triggers)?;
        let state = Arc::new(ApiState::new(telemetry, summaries));

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let request_id = HeaderName::from_static(HEADER_REQUEST_ID);
        let layered = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(trace_layer)
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                record_http_metrics,
            ));

        let router = triggers
            .into_iter()
            .fold(Self::public_routes(state), |router, trigger| {
                router.merge(trigger.router())
            })
            .route_layer(layered)
            .fallback(not_found);

        Ok(Self { router })
    }

    fn summarise(triggers: &[Arc<dyn HttpTrigger>]) -> ApiServerResult<Vec<TriggerSummary>> {
        let mut summaries: Vec<TriggerSummary> = Vec::with_capacity(triggers.len());
        for trigger in triggers {
            let name = trigger.name();
            if !is_route_segment(name) {
                return Err(ApiServerError::InvalidTriggerName {
                    name: name.to_string(),
                });
            }
            if summaries.iter().any(|summary| summary.name == name) {
                return Err(ApiServerError::DuplicateTrigger {
                    name: name.to_string(),
                });
            }
            summaries.push(TriggerSummary {
                name: name.to_string(),
                kind: trigger.kind(),
            });
        }
        Ok(summaries)
    }

    fn public_routes(state: Arc<ApiState>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .with_state(state)
    }

    /// Consume the server and return the assembled router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve the API on `addr` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(addr = %addr, "api listening");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }
}

/// Count each routed request by route template and status code.
async fn record_http_metrics(
    State(state): State<Arc<ApiState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Matched templates keep label cardinality bounded.
    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_owned(),
        |matched| matched.as_str().to_owned(),
    );
    let response = next.run(req).await;
    state
        .metrics
        .inc_http_request(&route, response.status().as_u16());
    response
}

fn is_route_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
