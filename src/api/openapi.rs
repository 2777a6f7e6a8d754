//! OpenAPI document for the article endpoints.

use axum::Json;
use utoipa::OpenApi;

use crate::articles::{Article, ArticleUpdate, NewArticle};

use super::articles::{self, CreatedArticle};

#[derive(OpenApi)]
#[openapi(
    info(title = "Blog API", description = "CRUD API for blog articles"),
    paths(
        articles::list_articles,
        articles::get_article,
        articles::create_article,
        articles::update_article,
        articles::delete_article,
    ),
    components(schemas(Article, NewArticle, ArticleUpdate, CreatedArticle)),
    tags((name = "articles", description = "Blog article management"))
)]
pub struct ApiDoc;

/// Serve the generated document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
