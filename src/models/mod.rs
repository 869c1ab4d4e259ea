//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorFields, AuthorFilter, AuthorSummary};
pub use book::{Book, BookDetails, BookDraft, BookFields, BookFilter, BookSummary};
pub use book_instance::{
    BookInstance, BookInstanceDraft, BookInstanceFields, BookInstanceFilter, BookInstanceStatus,
    BookInstanceSummary,
};
pub use genre::{Genre, GenreDraft, GenreFields, GenreFilter, GenreOption, GenreSummary};

/// YYYY-MM-DD, or empty for a missing date
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
