//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{book::{parse_reference, BookSummary}, format_date};
use crate::{
    error::{AppError, AppResult},
    validation::Sanitized,
};

/// Copy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_instance_status")]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub const NAMES: &'static [&'static str] = &["Available", "Maintenance", "Loaned", "Reserved"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        book_instance_url(self.id)
    }
}

pub const BOOK_INSTANCE_LIST_URL: &str = "/catalog/bookinstances";

pub fn book_instance_url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceFields {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceFields {
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book: self.book,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookInstanceFilter {
    All,
    ByBook(Uuid),
    ByStatus(BookInstanceStatus),
}

/// Unsaved copy as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookInstanceDraft {
    pub id: Option<Uuid>,
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceDraft {
    pub fn from_sanitized(values: &Sanitized, id: Option<Uuid>) -> Self {
        Self {
            id,
            book: values.text("book"),
            imprint: values.text("imprint"),
            status: values.text("status"),
            due_back: values.date("due_back"),
        }
    }

    pub fn into_fields(self) -> AppResult<BookInstanceFields> {
        let status = if self.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            self.status
                .parse::<BookInstanceStatus>()
                .map_err(AppError::Validation)?
        };
        Ok(BookInstanceFields {
            book: parse_reference(&self.book)?,
            imprint: self.imprint,
            status,
            due_back: self.due_back,
        })
    }
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: Some(instance.id),
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance.due_back,
        }
    }
}

/// Copy with its book resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceSummary {
    pub id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: String,
    pub url: String,
    pub book: Option<BookSummary>,
}

impl BookInstanceSummary {
    pub fn new(instance: &BookInstance, book: Option<BookSummary>) -> Self {
        Self {
            id: instance.id,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: format_date(instance.due_back),
            url: instance.url(),
            book,
        }
    }
}
