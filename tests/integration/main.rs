//! End-to-end tests for the blog API.
//!
//! Each test drives the full router in-process against its own temporary
//! database file, with a fixed CPU/memory sampler.

mod articles;
mod monitoring;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use tower::ServiceExt;

use blog_api::api::{create_router, AppState};
use blog_api::db::{bootstrap, Storage};
use blog_api::monitor::{FixedSampler, SystemSample};

/// Running app plus the directory that owns its database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage: Storage,
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// Fresh database, seeded the way the server seeds it on start.
    pub async fn seeded() -> Self {
        let app = Self::empty();
        bootstrap(&app.storage).await.expect("bootstrap");
        app
    }

    /// Seeded app that renders `/metrics/prometheus` from `handle`.
    pub async fn seeded_with_prometheus(handle: PrometheusHandle) -> Self {
        let mut app = Self::seeded().await;
        app.state = app.state.clone().with_prometheus(handle);
        app.router = create_router(app.state.clone());
        app
    }

    /// Database file path only; the table is not created.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().join("blog.db"));
        let sampler = Arc::new(FixedSampler(SystemSample {
            cpu_percent: 7.5,
            memory_percent: 42.0,
        }));
        let state = AppState::new(storage.clone(), sampler);

        Self {
            router: create_router(state.clone()),
            state,
            storage,
            _dir: dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let (status, bytes) = self.request_raw(method, uri, body).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Response body as text, for non-JSON endpoints.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let (status, bytes) = self.request_raw(Method::GET, uri, None).await;
        (status, String::from_utf8(bytes).expect("utf-8 body"))
    }

    async fn request_raw(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Number of articles reported by the list endpoint.
    pub async fn article_count(&self) -> u64 {
        let (_, body) = self.get("/api/articles").await;
        body["count"].as_u64().expect("count")
    }
}
