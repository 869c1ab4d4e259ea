//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::format_date;
use crate::validation::Sanitized;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "first_name family_name", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.first_name, self.family_name)
        }
    }

    /// "birth - death", each side empty when unknown
    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    pub fn url(&self) -> String {
        author_url(self.id)
    }
}

pub const AUTHOR_LIST_URL: &str = "/catalog/authors";

pub fn author_url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

/// Validated author fields, ready to be saved or written over an existing row
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorFields {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorFields {
    pub fn into_author(self, id: Uuid) -> Author {
        Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }
}

/// Author filter for store lookups
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorFilter {
    All,
}

/// Unsaved author as submitted, kept only to redisplay the form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorDraft {
    pub id: Option<Uuid>,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorDraft {
    pub fn from_sanitized(values: &Sanitized, id: Option<Uuid>) -> Self {
        Self {
            id,
            first_name: values.text("first_name"),
            family_name: values.text("family_name"),
            date_of_birth: values.date("date_of_birth"),
            date_of_death: values.date("date_of_death"),
        }
    }

    pub fn into_fields(self) -> AuthorFields {
        AuthorFields {
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }
}

impl From<&Author> for AuthorDraft {
    fn from(author: &Author) -> Self {
        Self {
            id: Some(author.id),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

/// Author as shown in views, with its derived values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub name: String,
    pub lifespan: String,
    pub date_of_birth: String,
    pub date_of_death: String,
    pub url: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author.name(),
            lifespan: author.lifespan(),
            date_of_birth: format_date(author.date_of_birth),
            date_of_death: format_date(author.date_of_death),
            url: author.url(),
        }
    }
}
