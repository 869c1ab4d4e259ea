//! Home page

use axum::{extract::State, response::Redirect};

use crate::{views::Outcome, AppState};

/// Site root forwards to the catalog
pub async fn root() -> Redirect {
    Redirect::to("/catalog")
}

/// Catalog counts. Always renders, failed counts are reported on the page.
pub async fn index(State(state): State<AppState>) -> Outcome {
    state.services.home.index().await
}
