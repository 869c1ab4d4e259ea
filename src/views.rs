//! Presentation values returned by the catalog workflows
//!
//! A workflow either renders a named view with its payload or redirects; failures travel
//! as `AppError`. The HTTP layer decides how a view is materialized.

use serde::Serialize;

use crate::{
    models::{
        AuthorDraft, AuthorSummary, BookDetails, BookDraft, BookInstanceDraft,
        BookInstanceSummary, BookSummary, GenreDraft, GenreOption, GenreSummary,
    },
    validation::FieldError,
};

/// What a workflow asks the boundary to do
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Render(View),
    Redirect(String),
}

impl Outcome {
    pub fn redirect(path: impl Into<String>) -> Self {
        Outcome::Redirect(path.into())
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(path) => Some(path),
            Outcome::Render(_) => None,
        }
    }
}

impl From<View> for Outcome {
    fn from(view: View) -> Self {
        Outcome::Render(view)
    }
}

/// Named views and their payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum View {
    Index(IndexPage),
    AuthorList(AuthorListPage),
    AuthorDetail(AuthorDetailPage),
    AuthorForm(AuthorFormPage),
    AuthorDelete(AuthorDeletePage),
    GenreList(GenreListPage),
    GenreDetail(GenreDetailPage),
    GenreForm(GenreFormPage),
    GenreDelete(GenreDeletePage),
    BookList(BookListPage),
    BookDetail(BookDetailPage),
    BookForm(BookFormPage),
    BookDelete(BookDeletePage),
    #[serde(rename = "bookinstance_list")]
    BookInstanceList(BookInstanceListPage),
    #[serde(rename = "bookinstance_detail")]
    BookInstanceDetail(BookInstanceDetailPage),
    #[serde(rename = "bookinstance_form")]
    BookInstanceForm(BookInstanceFormPage),
    #[serde(rename = "bookinstance_delete")]
    BookInstanceDelete(BookInstanceDeletePage),
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

/// One aggregate count, or the reason it could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tally {
    Count(i64),
    Failed(String),
}

impl Tally {
    pub fn count(&self) -> Option<i64> {
        match self {
            Tally::Count(n) => Some(*n),
            Tally::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexCounts {
    pub book_count: Tally,
    pub book_instance_count: Tally,
    pub book_instance_available_count: Tally,
    pub author_count: Tally,
    pub genre_count: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexPage {
    pub title: String,
    pub data: IndexCounts,
    /// First failure met while counting, if any
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorListPage {
    pub title: String,
    pub author_list: Vec<AuthorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDetailPage {
    pub title: String,
    pub author: AuthorSummary,
    pub author_books: Vec<BookSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorFormPage {
    pub title: String,
    pub author: Option<AuthorDraft>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDeletePage {
    pub title: String,
    pub author: AuthorSummary,
    pub author_books: Vec<BookSummary>,
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreListPage {
    pub title: String,
    pub genre_list: Vec<GenreSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDetailPage {
    pub title: String,
    pub genre: GenreSummary,
    pub genre_books: Vec<BookSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreFormPage {
    pub title: String,
    pub genre: Option<GenreDraft>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDeletePage {
    pub title: String,
    pub genre: GenreSummary,
    pub genre_books: Vec<BookSummary>,
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListPage {
    pub title: String,
    pub book_list: Vec<BookSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetailPage {
    pub title: String,
    pub book: BookDetails,
    pub book_instances: Vec<BookInstanceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFormPage {
    pub title: String,
    pub authors: Vec<AuthorSummary>,
    pub genres: Vec<GenreOption>,
    pub book: Option<BookDraft>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDeletePage {
    pub title: String,
    pub book: BookDetails,
    pub book_instances: Vec<BookInstanceSummary>,
}

// ---------------------------------------------------------------------------
// Book instances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceListPage {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceDetailPage {
    pub title: String,
    pub bookinstance: BookInstanceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceFormPage {
    pub title: String,
    pub book_list: Vec<BookSummary>,
    pub statuses: &'static [&'static str],
    pub selected_book: Option<String>,
    pub bookinstance: Option<BookInstanceDraft>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceDeletePage {
    pub title: String,
    pub bookinstance: BookInstanceSummary,
}
