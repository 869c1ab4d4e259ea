//! HTTP routes driven through the router

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use catalog_server::{api, repository::CatalogStore, AppConfig, AppState};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{catalog, Catalog};

fn app(catalog: &Catalog) -> Router {
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(catalog.services.clone()),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, location, body)
}

#[tokio::test]
async fn test_health_check() {
    let catalog = catalog();
    let (status, _, body) = get(app(&catalog), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let catalog = catalog();
    let (status, location, _) = get(app(&catalog), "/").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_index_renders_counts() {
    let catalog = catalog();
    catalog.genre("Fantasy").await;

    let (status, _, body) = get(app(&catalog), "/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "index");
    assert_eq!(body["data"]["title"], "Local Library Home");
    assert_eq!(body["data"]["data"]["genre_count"]["count"], 1);
}

#[tokio::test]
async fn test_create_author_over_form_post() {
    let catalog = catalog();

    let (status, location, _) = post(
        app(&catalog),
        "/catalog/author/create",
        "first_name=Mary&family_name=Shelley&date_of_birth=1797-08-30",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.unwrap();
    assert!(location.starts_with("/catalog/author/"));

    let (status, _, body) = get(app(&catalog), &location).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "author_detail");
    assert_eq!(body["data"]["author"]["family_name"], "Shelley");
}

#[tokio::test]
async fn test_invalid_form_renders_errors() {
    let catalog = catalog();

    let (status, _, body) = post(app(&catalog), "/catalog/genre/create", "name=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "genre_form");
    assert_eq!(body["data"]["errors"][0]["message"], "Genre name required");
}

#[tokio::test]
async fn test_repeated_genre_keys_become_a_set() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "LeGuin").await;
    let fantasy = catalog.genre("Fantasy").await;
    let scifi = catalog.genre("Sci-Fi").await;

    let body = format!(
        "title=The+Dispossessed&author={}&summary=Anarres&isbn=9780061054884&genre={}&genre={}",
        author.id, fantasy.id, scifi.id
    );
    let (status, location, _) = post(app(&catalog), "/catalog/book/create", &body).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let id = location.unwrap().rsplit('/').next().unwrap().to_string();
    let book = catalog
        .store
        .books_find_by_id(Uuid::parse_str(&id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(book.genre, vec![fantasy.id, scifi.id]);

    let (_, _, body) = get(app(&catalog), &format!("/catalog/book/{}", id)).await;
    assert_eq!(body["view"], "book_detail");
    assert_eq!(body["data"]["book"]["title"], "The Dispossessed");
    assert_eq!(body["data"]["book"]["genres"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let catalog = catalog();
    let uri = format!("/catalog/book/{}", Uuid::new_v4());

    let (status, _, body) = get(app(&catalog), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchEntity");

    let (status, _, _) = get(app(&catalog), "/catalog/author/not-an-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_of_missing_entity_redirects_to_list() {
    let catalog = catalog();

    let uri = format!("/catalog/genre/{}/delete", Uuid::new_v4());
    let (status, location, _) = get(app(&catalog), &uri).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/genres"));

    let (status, location, _) = post(app(&catalog), "/catalog/bookinstance/bogus/delete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/bookinstances"));
}

#[tokio::test]
async fn test_blocked_author_delete_renders_dependents() {
    let catalog = catalog();
    let author = catalog.author("Jane", "Austen").await;
    catalog.book("Persuasion", author.id, vec![]).await;

    let uri = format!("/catalog/author/{}/delete", author.id);
    let (status, _, body) = post(app(&catalog), &uri, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "author_delete");
    assert_eq!(body["data"]["author_books"][0]["title"], "Persuasion");
}
