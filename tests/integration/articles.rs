//! Article CRUD over HTTP.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use blog_api::articles::types::parse_timestamp;

use crate::TestApp;

#[tokio::test]
async fn list_returns_seeded_articles() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/articles").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    let app = TestApp::seeded().await;

    let (status, body) = app.post("/api/articles", r#"{"title":"T","content":"C"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Article créé avec succès");
    assert_eq!(body["data"]["author"], "Anonymous");
    assert_eq!(body["data"]["title"], "T");
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/articles/{id}");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "T");
    assert_eq!(body["data"]["created_at"], body["data"]["updated_at"]);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let (status, body) = app.put(&uri, r#"{"title":"T2"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Article mis à jour");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "T2");
    assert_eq!(body["data"]["content"], "C");
    assert_eq!(body["data"]["author"], "Anonymous");
    let created = parse_timestamp(body["data"]["created_at"].as_str().unwrap()).unwrap();
    let updated = parse_timestamp(body["data"]["updated_at"].as_str().unwrap()).unwrap();
    assert!(updated > created);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Article supprimé");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Article non trouvé");

    let (_, body) = app.get("/api/articles").await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert!(!ids.contains(&id));
}

#[tokio::test]
async fn create_keeps_explicit_author() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .post(
            "/api/articles",
            r#"{"title":"Test Article","content":"Ceci est un article de test","author":"Test Author"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Test Article");
    assert_eq!(body["data"]["author"], "Test Author");
}

#[tokio::test]
async fn create_without_content_is_rejected_and_writes_nothing() {
    let app = TestApp::seeded().await;
    let before = app.article_count().await;

    let (status, body) = app.post("/api/articles", r#"{"title":"Test sans contenu"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Title et content sont requis");
    assert_eq!(app.article_count().await, before);
}

#[tokio::test]
async fn whitespace_only_title_and_content_are_stored_verbatim() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .post("/api/articles", r#"{"title":"   ","content":" \n "}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.get(&format!("/api/articles/{id}")).await;
    assert_eq!(body["data"]["title"], "   ");
    assert_eq!(body["data"]["content"], " \n ");

    let (status, _) = app
        .post("/api/articles", r#"{"title":"","content":"C"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_malformed_json_is_rejected() {
    let app = TestApp::seeded().await;

    let (status, body) = app.post("/api/articles", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn get_never_issued_id_is_not_found() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/articles/99999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn update_requires_data() {
    let app = TestApp::seeded().await;

    let (status, body) = app.put("/api/articles/1", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Données requises");

    let (status, _) = app.request(axum::http::Method::PUT, "/api/articles/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_missing_ids_are_not_found() {
    let app = TestApp::seeded().await;

    let (status, body) = app.put("/api/articles/99999", r#"{"title":"x"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Article non trouvé");

    let (status, body) = app.delete("/api/articles/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn update_cannot_change_author() {
    let app = TestApp::seeded().await;
    let (_, body) = app
        .post("/api/articles", r#"{"title":"T","content":"C","author":"Ada"}"#)
        .await;
    let uri = format!("/api/articles/{}", body["data"]["id"]);

    let (status, _) = app.put(&uri, r#"{"author":"Mallory","content":"C2"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&uri).await;
    assert_eq!(body["data"]["author"], "Ada");
    assert_eq!(body["data"]["content"], "C2");
    assert_eq!(body["data"]["title"], "T");
}

#[tokio::test]
async fn storage_failures_surface_as_500_with_driver_message() {
    // No bootstrap: the articles table does not exist.
    let app = TestApp::empty();

    let (status, body) = app.get("/api/articles").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn restarting_against_existing_data_does_not_reseed() {
    let app = TestApp::seeded().await;
    app.delete("/api/articles/1").await;

    let seeded = blog_api::db::bootstrap(&app.storage).await.unwrap();

    assert_eq!(seeded, 0);
    assert_eq!(app.article_count().await, 2);
}
