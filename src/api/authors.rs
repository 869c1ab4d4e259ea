//! Author endpoints

use axum::extract::{Path, State};

use super::{parse_id, raw_fields, FormBody};
use crate::{error::AppResult, models::author::AUTHOR_LIST_URL, views::Outcome, AppState};

pub async fn list(State(state): State<AppState>) -> AppResult<Outcome> {
    state.services.authors.list().await
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Outcome> {
    state.services.authors.detail(parse_id(&id)?).await
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Outcome> {
    Ok(state.services.authors.create_form())
}

pub async fn create(State(state): State<AppState>, form: FormBody) -> AppResult<Outcome> {
    state.services.authors.create(&raw_fields(form)).await
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    state.services.authors.update_form(parse_id(&id)?).await
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormBody,
) -> AppResult<Outcome> {
    state.services.authors.update(parse_id(&id)?, &raw_fields(form)).await
}

/// Absent or malformed ids land on the list
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    match parse_id(&id) {
        Ok(id) => state.services.authors.delete_form(id).await,
        Err(_) => Ok(Outcome::redirect(AUTHOR_LIST_URL)),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Outcome> {
    match parse_id(&id) {
        Ok(id) => state.services.authors.delete(id).await,
        Err(_) => Ok(Outcome::redirect(AUTHOR_LIST_URL)),
    }
}
