//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{author::AuthorSummary, genre::GenreSummary};
use crate::{
    error::{AppError, AppResult},
    validation::Sanitized,
};

/// Full book model from database. `genre` lists the linked genre ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

pub const BOOK_LIST_URL: &str = "/catalog/books";

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl BookFields {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            summary: self.summary,
            isbn: self.isbn,
            genre: self.genre,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookFilter {
    All,
    ByAuthor(Uuid),
    /// Books whose genre set contains the id
    ByGenre(Uuid),
}

/// Unsaved book as submitted. References stay as submitted text until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookDraft {
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<String>,
}

impl BookDraft {
    pub fn from_sanitized(values: &Sanitized, id: Option<Uuid>) -> Self {
        Self {
            id,
            title: values.text("title"),
            author: values.text("author"),
            summary: values.text("summary"),
            isbn: values.text("isbn"),
            genre: values.list("genre"),
        }
    }

    pub fn into_fields(self) -> AppResult<BookFields> {
        let author = parse_reference(&self.author)?;
        let genre = self
            .genre
            .iter()
            .map(|g| parse_reference(g))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(BookFields {
            title: self.title,
            author,
            summary: self.summary,
            isbn: self.isbn,
            genre,
        })
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(Uuid::to_string).collect(),
        }
    }
}

pub(crate) fn parse_reference(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("Invalid reference: {}", value)))
}

/// Book with its author resolved, as shown in lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorSummary>,
}

impl BookSummary {
    pub fn new(book: &Book, author: Option<AuthorSummary>) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book.url(),
            author,
        }
    }
}

/// Book with author and genres resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: BookSummary,
    pub genres: Vec<GenreSummary>,
}
