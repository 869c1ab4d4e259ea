//! HTTP boundary for the catalog
//!
//! Handlers turn requests into workflow calls and workflow outcomes into responses. A
//! rendered view is returned as JSON `{"view": ..., "data": ...}`; a redirect becomes
//! `303 See Other`; an `AppError` goes through its own `IntoResponse`.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::Form;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{error::AppError, validation::RawFields, views::Outcome, AppState};

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(view) => (StatusCode::OK, Json(view)).into_response(),
            Outcome::Redirect(path) => Redirect::to(&path).into_response(),
        }
    }
}

/// Submitted form body, repeated keys kept in order
pub type FormBody = Form<Vec<(String, String)>>;

pub(crate) fn raw_fields(Form(pairs): FormBody) -> RawFields {
    pairs.into_iter().collect()
}

/// Entity id from the path. A malformed id cannot name an entity.
pub(crate) fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(format!("No entity with id {}", id)))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(home::index))
        // Authors
        .route("/authors", get(authors::list))
        .route("/author/create", get(authors::create_form).post(authors::create))
        .route("/author/:id", get(authors::detail))
        .route("/author/:id/update", get(authors::update_form).post(authors::update))
        .route("/author/:id/delete", get(authors::delete_form).post(authors::delete))
        // Genres
        .route("/genres", get(genres::list))
        .route("/genre/create", get(genres::create_form).post(genres::create))
        .route("/genre/:id", get(genres::detail))
        .route("/genre/:id/update", get(genres::update_form).post(genres::update))
        .route("/genre/:id/delete", get(genres::delete_form).post(genres::delete))
        // Books
        .route("/books", get(books::list))
        .route("/book/create", get(books::create_form).post(books::create))
        .route("/book/:id", get(books::detail))
        .route("/book/:id/update", get(books::update_form).post(books::update))
        .route("/book/:id/delete", get(books::delete_form).post(books::delete))
        // Copies
        .route("/bookinstances", get(book_instances::list))
        .route(
            "/bookinstance/create",
            get(book_instances::create_form).post(book_instances::create),
        )
        .route("/bookinstance/:id", get(book_instances::detail))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_form).post(book_instances::update),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_form).post(book_instances::delete),
        );

    Router::new()
        .route("/", get(home::root))
        .route("/health", get(health::health_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
