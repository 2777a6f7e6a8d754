//! Uniform JSON envelopes and the error-to-response mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

use crate::error::{ArticleError, StorageError};

/// Message for an unknown article id.
pub const MSG_ARTICLE_NOT_FOUND: &str = "Article non trouvé";
/// Message for an unmatched route.
pub const MSG_ROUTE_NOT_FOUND: &str = "Endpoint non trouvé";
/// Message for a failure with no safe detail to show.
pub const MSG_INTERNAL: &str = "Erreur serveur interne";
/// Message for a create request without title or content.
pub const MSG_TITLE_CONTENT_REQUIRED: &str = "Title et content sont requis";
/// Message for an update request without data.
pub const MSG_DATA_REQUIRED: &str = "Données requises";

/// `{status: "success", ...}` envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Success carrying a payload.
    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            count: None,
            data: Some(data),
        }
    }

    /// Success carrying a message and a payload.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Success carrying a sequence and its length.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            status: "success",
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl Envelope<()> {
    /// Success carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

/// `{status: "error", message}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub message: String,
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400).
    Validation(String),
    /// Unknown resource id (404).
    NotFound(String),
    /// No route matches the request (404).
    RouteNotFound,
    /// Anything else (500). The message is returned to the caller as-is.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m,
            ApiError::RouteNotFound => MSG_ROUTE_NOT_FOUND,
        }
    }
}

impl From<ArticleError> for ApiError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::Validation(message) => ApiError::Validation(message),
            ArticleError::NotFound(_) => ApiError::NotFound(MSG_ARTICLE_NOT_FOUND.to_string()),
            ArticleError::Storage(e) => e.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), message = self.message(), "request failed");
        }
        let body = ErrorEnvelope {
            status: "error",
            message: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
