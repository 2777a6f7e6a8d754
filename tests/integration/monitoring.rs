//! Service endpoints: home, health, metrics and docs.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusBuilder;
use pretty_assertions::assert_eq;

use crate::TestApp;

#[tokio::test]
async fn home_describes_the_api() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["documentation"], "/api/docs");
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["uptime_seconds"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());

    let started_at: DateTime<Utc> = body["started_at"].as_str().unwrap().parse().unwrap();
    let timestamp: DateTime<Utc> = body["timestamp"].as_str().unwrap().parse().unwrap();
    assert_eq!(started_at, app.state.process.started_at());
    assert!(started_at <= timestamp);
}

#[tokio::test]
async fn metrics_counts_every_request_including_itself() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requests_total"], 1);
    assert_eq!(body["cpu_percent"], 7.5);
    assert_eq!(body["memory_percent"], 42.0);
    assert!(body["timestamp"].is_string());

    app.get("/api/articles").await;
    app.get("/does/not/exist").await;
    app.post("/api/articles", r#"{"title":"only"}"#).await;

    let (_, body) = app.get("/metrics").await;
    assert_eq!(body["requests_total"], 5);
    assert_eq!(app.state.process.request_count(), 5);
}

#[tokio::test]
async fn docs_list_every_endpoint() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/docs").await;

    assert_eq!(status, StatusCode::OK);
    let endpoints = body["endpoints"].as_object().unwrap();
    for key in [
        "GET /",
        "GET /health",
        "GET /metrics",
        "GET /api/articles",
        "GET /api/articles/<id>",
        "POST /api/articles",
        "PUT /api/articles/<id>",
        "DELETE /api/articles/<id>",
    ] {
        assert!(endpoints.contains_key(key), "missing {key}");
    }
}

#[tokio::test]
async fn prometheus_endpoint_absent_without_recorder() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/metrics/prometheus").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

// Current-thread runtime: the thread-local recorder sees every handler.
#[tokio::test(flavor = "current_thread")]
async fn prometheus_endpoint_renders_recorded_traffic() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let _guard = metrics::set_default_local_recorder(&recorder);
    let app = TestApp::seeded_with_prometheus(recorder.handle()).await;

    let (status, _) = app
        .post("/api/articles", r#"{"title":"T","content":"C"}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, text) = app.get_text("/metrics/prometheus").await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("articles_created_total 1"), "{text}");
    assert!(text.contains(r#"http_requests_total{method="POST"} 1"#), "{text}");
    assert!(text.contains("http_request_latency_ms"), "{text}");
}
