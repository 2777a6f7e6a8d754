//! Service-level handlers: home, health, metrics and documentation.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::articles::ArticleRepository;
use crate::db::Storage;
use crate::monitor::{ProcessMetrics, SystemSampler};

use super::response::ApiError;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database accessor, used for health checks.
    pub storage: Storage,
    /// Article table operations.
    pub articles: ArticleRepository,
    /// Start time and request counter.
    pub process: Arc<ProcessMetrics>,
    /// Host CPU/memory source.
    pub sampler: Arc<dyn SystemSampler>,
    /// Prometheus renderer, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
    /// Allow cross-origin requests from any origin.
    pub cors_permissive: bool,
}

impl AppState {
    /// Create new app state over `storage`.
    pub fn new(storage: Storage, sampler: Arc<dyn SystemSampler>) -> Self {
        Self {
            articles: ArticleRepository::new(storage.clone()),
            storage,
            process: Arc::new(ProcessMetrics::new()),
            sampler,
            prometheus: None,
            cors_permissive: true,
        }
    }

    /// Attach a Prometheus renderer.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Toggle permissive CORS.
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

/// Home response.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub documentation: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy".
    pub status: &'static str,
    pub uptime_seconds: f64,
    /// When this process started serving.
    pub started_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
    /// "connected" or "disconnected".
    pub database: &'static str,
}

/// Process metrics response.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub requests_total: u64,
    pub uptime_seconds: f64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Home handler.
pub async fn home() -> impl IntoResponse {
    Json(HomeResponse {
        status: "success",
        message: "Bienvenue sur l'API Blog! 🚀",
        version: env!("CARGO_PKG_VERSION"),
        documentation: "/api/docs",
    })
}

/// Health check handler - 200 while the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = match state.storage.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "health check could not reach the database");
            false
        }
    };

    let response = HealthResponse {
        status: if reachable { "healthy" } else { "unhealthy" },
        uptime_seconds: state.process.uptime_seconds(),
        started_at: state.process.started_at(),
        timestamp: Utc::now(),
        database: if reachable { "connected" } else { "disconnected" },
    };

    if reachable {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Metrics handler - request count, uptime and a fresh CPU/memory sample.
pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    let sampler = state.sampler.clone();
    let sample = tokio::task::spawn_blocking(move || sampler.sample())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(MetricsResponse {
        requests_total: state.process.request_count(),
        uptime_seconds: state.process.uptime_seconds(),
        cpu_percent: sample.cpu_percent,
        memory_percent: sample.memory_percent,
        timestamp: Utc::now(),
    }))
}

/// Prometheus text exposition of the recorded metrics.
pub async fn prometheus(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .prometheus
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(ApiError::RouteNotFound)
}

/// Endpoint listing.
pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "endpoints": {
            "GET /": "Page d'accueil",
            "GET /health": "Vérification de santé",
            "GET /metrics": "Métriques système",
            "GET /metrics/prometheus": "Métriques au format Prometheus",
            "GET /api/docs": "Documentation de l'API",
            "GET /api/openapi.json": "Spécification OpenAPI",
            "GET /api/articles": "Liste tous les articles",
            "GET /api/articles/<id>": "Récupère un article",
            "POST /api/articles": "Crée un article",
            "PUT /api/articles/<id>": "Modifie un article",
            "DELETE /api/articles/<id>": "Supprime un article"
        }
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
