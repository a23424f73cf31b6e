use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use rescan_api::{ApiServer, ApiServerError, HttpTrigger, TdarrTrigger, TriggerDeps};
use rescan_config::{TdarrConfig, Verbosity};
use rescan_core::{FixedClock, RewriteRule};
use rescan_telemetry::Metrics;
use rescan_test_support::fixtures::{fixed_instant, test_event_body, transcoded_body};
use rescan_test_support::mocks::{FailingProcessor, RecordingProcessor};
use tower::ServiceExt;

fn tdarr(name: &str, deps: TriggerDeps) -> Arc<dyn HttpTrigger> {
    let config = TdarrConfig {
        name: name.to_string(),
        priority: 2,
        rewrite: vec![RewriteRule::new("^/data/", "/mnt/media/")],
        verbosity: Verbosity::Info,
    };
    Arc::new(TdarrTrigger::new(&config, deps).expect("trigger"))
}

fn deps(processor: RecordingProcessor, metrics: &Metrics) -> TriggerDeps {
    TriggerDeps::new(Arc::new(processor))
        .with_clock(Arc::new(FixedClock::new(fixed_instant())))
        .with_metrics(metrics.clone())
}

fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn router_with(processor: RecordingProcessor, metrics: &Metrics) -> Router {
    ApiServer::new(vec![tdarr("tdarr", deps(processor, metrics))], metrics.clone())
        .expect("server")
        .into_router()
}

#[tokio::test]
async fn trigger_route_maps_outcomes_to_statuses() {
    let metrics = Metrics::new().expect("metrics");
    let processor = RecordingProcessor::new();
    let router = router_with(processor.clone(), &metrics);

    let cases = [
        (test_event_body(), StatusCode::OK),
        (
            transcoded_body("/data/movies/Foo", "movie.mkv", true),
            StatusCode::OK,
        ),
        (
            transcoded_body("/data/movies/Foo", "", true),
            StatusCode::BAD_REQUEST,
        ),
        (b"{not json".to_vec(), StatusCode::BAD_REQUEST),
    ];
    for (body, status) in cases {
        let response = router
            .clone()
            .oneshot(post("/triggers/tdarr", body))
            .await
            .expect("response");
        assert_eq!(response.status(), status);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(body_text(response).await.is_empty());
    }

    let scans = processor.scans();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].folder, "/mnt/media/movies/Foo");
    assert_eq!(scans[0].priority, 2);
}

#[tokio::test]
async fn processor_failure_returns_500_with_empty_body() {
    let metrics = Metrics::new().expect("metrics");
    let processor = FailingProcessor::new("queue full");
    let deps = TriggerDeps::new(Arc::new(processor.clone())).with_metrics(metrics.clone());
    let router = ApiServer::new(vec![tdarr("tdarr", deps)], metrics.clone())
        .expect("server")
        .into_router();

    let response = router
        .oneshot(post(
            "/triggers/tdarr",
            transcoded_body("/data/movies/Foo", "movie.mkv", true),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.is_empty());
    assert_eq!(processor.calls(), 1);
    assert_eq!(metrics.trigger_snapshot("tdarr").internal_error, 1);
}

#[tokio::test]
async fn request_id_is_propagated_when_supplied() {
    let metrics = Metrics::new().expect("metrics");
    let router = router_with(RecordingProcessor::new(), &metrics);
    let mut request = post("/triggers/tdarr", test_event_body());
    request
        .headers_mut()
        .insert("x-request-id", "abc-123".parse().expect("header"));

    let response = router.oneshot(request).await.expect("response");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("abc-123")
    );
}

#[tokio::test]
async fn non_post_methods_are_not_allowed() {
    let metrics = Metrics::new().expect("metrics");
    let router = router_with(RecordingProcessor::new(), &metrics);
    let response = router
        .oneshot(get("/triggers/tdarr"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_trigger_returns_problem_document() {
    let metrics = Metrics::new().expect("metrics");
    let router = router_with(RecordingProcessor::new(), &metrics);
    let response = router
        .oneshot(post("/triggers/sonarr", test_event_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(value["status"], 404);
    assert_eq!(value["detail"], "no route for /triggers/sonarr");
}

#[tokio::test]
async fn health_lists_mounted_triggers() {
    let metrics = Metrics::new().expect("metrics");
    let triggers = vec![
        tdarr("tdarr", deps(RecordingProcessor::new(), &metrics)),
        tdarr("tdarr-4k", deps(RecordingProcessor::new(), &metrics)),
    ];
    let router = ApiServer::new(triggers, metrics.clone())
        .expect("server")
        .into_router();

    let response = router.oneshot(get("/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let value: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(value["status"], "ok");
    assert!(value["build"].is_string());
    assert_eq!(
        value["triggers"],
        serde_json::json!([
            { "name": "tdarr", "kind": "tdarr" },
            { "name": "tdarr-4k", "kind": "tdarr" },
        ])
    );
}

#[tokio::test]
async fn metrics_endpoint_counts_trigger_traffic() {
    let metrics = Metrics::new().expect("metrics");
    let router = router_with(RecordingProcessor::new(), &metrics);

    router
        .clone()
        .oneshot(post("/triggers/tdarr", test_event_body()))
        .await
        .expect("response");
    let response = router.oneshot(get("/metrics")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("http_requests_total{code=\"200\",route=\"/triggers/tdarr\"} 1"));
    assert!(text.contains("trigger_requests_total{outcome=\"ok\",trigger=\"tdarr\"} 1"));
}

#[tokio::test]
async fn request_counter_labels_route_templates_and_skips_fallback() {
    let metrics = Metrics::new().expect("metrics");
    let router = router_with(RecordingProcessor::new(), &metrics);

    router
        .clone()
        .oneshot(post("/triggers/tdarr", b"not json".to_vec()))
        .await
        .expect("response");
    router
        .clone()
        .oneshot(get("/health"))
        .await
        .expect("response");
    router
        .clone()
        .oneshot(post("/triggers/unknown", test_event_body()))
        .await
        .expect("response");

    let text = metrics.render().expect("render");
    assert!(text.contains("http_requests_total{code=\"400\",route=\"/triggers/tdarr\"} 1"));
    assert!(text.contains("http_requests_total{code=\"200\",route=\"/health\"} 1"));
    assert!(!text.contains("/triggers/unknown"));
}

#[test]
fn duplicate_trigger_names_are_rejected() {
    let metrics = Metrics::new().expect("metrics");
    let triggers = vec![
        tdarr("tdarr", deps(RecordingProcessor::new(), &metrics)),
        tdarr("tdarr", deps(RecordingProcessor::new(), &metrics)),
    ];
    let result = ApiServer::new(triggers, metrics);
    assert!(matches!(
        result,
        Err(ApiServerError::DuplicateTrigger { ref name }) if name == "tdarr"
    ));
}

#[test]
fn unusable_trigger_names_are_rejected() {
    let metrics = Metrics::new().expect("metrics");
    let triggers = vec![tdarr("bad/name", deps(RecordingProcessor::new(), &metrics))];
    let result = ApiServer::new(triggers, metrics);
    assert!(matches!(
        result,
        Err(ApiServerError::InvalidTriggerName { .. })
    ));
}
