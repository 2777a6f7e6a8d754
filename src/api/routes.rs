//! HTTP API route definitions.

use std::any::Any;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::metrics::{self, LatencyTimer};
use crate::utils::shutdown_signal;

use super::articles::{create_article, delete_article, get_article, list_articles, update_article};
use super::handlers::{api_docs, health, home, metrics as metrics_handler, not_found, prometheus, AppState};
use super::openapi::openapi_json;
use super::response::{ApiError, MSG_INTERNAL};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        // Service endpoints
        .route("/", get(home))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/prometheus", get(prometheus))
        .route("/api/docs", get(api_docs))
        .route("/api/openapi.json", get(openapi_json))
        // Articles
        .route("/api/articles", get(list_articles).post(create_article))
        .route(
            "/api/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        );

    with_middleware(routes, state)
}

/// Serve the API on `listener` until a shutdown signal arrives.
pub async fn serve(listener: TcpListener, state: AppState) -> crate::Result<()> {
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Attach the fallback, request accounting and transport layers.
fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = state.cors_permissive;

    let router = routes
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Count every inbound request before it reaches a handler, matched or not.
async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.process.record_request();
    metrics::inc_http_requests(request.method().as_str());

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let _timer = LatencyTimer::new(route);

    next.run(request).await
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");

    ApiError::Internal(MSG_INTERNAL.to_string()).into_response()
}
