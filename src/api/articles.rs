//! Article CRUD handlers.
//!
//! Bodies are read as raw bytes and decoded here so malformed input produces
//! the same error envelope as every other failure.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::articles::{Article, ArticleUpdate, NewArticle};
use crate::metrics;

use super::handlers::AppState;
use super::response::{
    ApiError, Envelope, MSG_ARTICLE_NOT_FOUND, MSG_DATA_REQUIRED, MSG_TITLE_CONTENT_REQUIRED,
};

/// Summary returned after a create.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedArticle {
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Only unsigned decimal ids match an article route; signs included, anything
/// else is an unmatched route.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::RouteNotFound);
    }
    raw.parse::<i64>().map_err(|_| ApiError::RouteNotFound)
}

#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    responses(
        (status = 200, description = "All articles, newest first"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Article>>>, ApiError> {
    let articles = state.articles.list_all().await?;
    Ok(Json(Envelope::list(articles)))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    tag = "articles",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "The article"),
        (status = 404, description = "No article with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Article>>, ApiError> {
    let id = parse_id(&id)?;
    let article = state
        .articles
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(MSG_ARTICLE_NOT_FOUND.to_string()))?;
    Ok(Json(Envelope::data(article)))
}

#[utoipa::path(
    post,
    path = "/api/articles",
    tag = "articles",
    request_body = NewArticle,
    responses(
        (status = 201, description = "Article created", body = CreatedArticle),
        (status = 400, description = "Title or content missing"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<CreatedArticle>>), ApiError> {
    let article = decode_new_article(&body)?;
    let title = article.title.clone();
    let author = article.author().to_string();

    let id = state.articles.create(article).await?;
    metrics::inc_articles_created();
    info!(id, "article created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Article créé avec succès",
            CreatedArticle { id, title, author },
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    tag = "articles",
    params(("id" = i64, Path, description = "Article id")),
    request_body = ArticleUpdate,
    responses(
        (status = 200, description = "Article updated"),
        (status = 400, description = "No data supplied"),
        (status = 404, description = "No article with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_id(&id)?;
    let update = decode_update(&body)?;

    state.articles.update(id, update).await?;
    metrics::inc_articles_updated();
    info!(id, "article updated");

    Ok(Json(Envelope::message("Article mis à jour")))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    tag = "articles",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted"),
        (status = 404, description = "No article with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_id(&id)?;

    state.articles.delete(id).await?;
    metrics::inc_articles_deleted();
    info!(id, "article deleted");

    Ok(Json(Envelope::message("Article supprimé")))
}

/// Create body: an object with string `title` and `content`, optional `author`.
fn decode_new_article(body: &[u8]) -> Result<NewArticle, ApiError> {
    let required = || ApiError::Validation(MSG_TITLE_CONTENT_REQUIRED.to_string());

    let value: Value = serde_json::from_slice(body).map_err(|_| required())?;
    if !value.is_object() {
        return Err(required());
    }
    let article: NewArticle = serde_json::from_value(value).map_err(|_| required())?;
    article.validate()?;
    Ok(article)
}

/// Update body: any non-empty object. Keys other than `title`/`content` are ignored.
fn decode_update(body: &[u8]) -> Result<ArticleUpdate, ApiError> {
    let required = || ApiError::Validation(MSG_DATA_REQUIRED.to_string());

    let value: Value = serde_json::from_slice(body).map_err(|_| required())?;
    match value.as_object() {
        Some(fields) if !fields.is_empty() => {}
        _ => return Err(required()),
    }

    let update: ArticleUpdate = serde_json::from_value(value).map_err(|e| {
        ApiError::Validation(format!("Données invalides: {e}"))
    })?;
    update.validate()?;
    Ok(update)
}
