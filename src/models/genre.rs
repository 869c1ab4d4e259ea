//! Genre model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::Sanitized;

/// Genre record. Names are unique across genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        genre_url(self.id)
    }
}

pub const GENRE_LIST_URL: &str = "/catalog/genres";

pub fn genre_url(id: Uuid) -> String {
    format!("/catalog/genre/{}", id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreFields {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenreFilter {
    All,
    /// Exact name match
    ByName(String),
    /// Genres whose id is in the set, in store order
    Ids(Vec<Uuid>),
}

/// Unsaved genre as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreDraft {
    pub id: Option<Uuid>,
    pub name: String,
}

impl GenreDraft {
    pub fn from_sanitized(values: &Sanitized, id: Option<Uuid>) -> Self {
        Self {
            id,
            name: values.text("name"),
        }
    }

    pub fn into_fields(self) -> GenreFields {
        GenreFields { name: self.name }
    }
}

impl From<&Genre> for GenreDraft {
    fn from(genre: &Genre) -> Self {
        Self {
            id: Some(genre.id),
            name: genre.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSummary {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreSummary {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            url: genre.url(),
        }
    }
}

/// Genre offered in the book form, flagged when it is part of the selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreOption {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

impl GenreOption {
    /// Project every genre against the selected ids. Selected values are raw submitted text;
    /// any spelling `Uuid::parse_str` accepts matches, anything else selects nothing.
    pub fn project<S: AsRef<str>>(genres: &[Genre], selected: &[S]) -> Vec<GenreOption> {
        let selected: HashSet<Uuid> = selected
            .iter()
            .filter_map(|s| Uuid::parse_str(s.as_ref().trim()).ok())
            .collect();
        genres
            .iter()
            .map(|genre| GenreOption {
                id: genre.id,
                name: genre.name.clone(),
                checked: selected.contains(&genre.id),
            })
            .collect()
    }
}
