//! Catalog home page counts

use crate::{
    error::AppResult,
    models::{AuthorFilter, BookFilter, BookInstanceFilter, BookInstanceStatus, GenreFilter},
    repository::Repository,
    views::{IndexCounts, IndexPage, Outcome, Tally, View},
};

/// Shown in place of a count the store could not provide
pub const COUNT_UNAVAILABLE: &str = "Count unavailable";

#[derive(Clone)]
pub struct HomeService {
    repository: Repository,
}

impl HomeService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Five independent counts. A failed count is recorded on the page and does not hide the
    /// others.
    pub async fn index(&self) -> Outcome {
        let (books, instances, available, authors, genres) = tokio::join!(
            self.repository.books_count(BookFilter::All),
            self.repository.book_instances_count(BookInstanceFilter::All),
            self.repository
                .book_instances_count(BookInstanceFilter::ByStatus(BookInstanceStatus::Available)),
            self.repository.authors_count(AuthorFilter::All),
            self.repository.genres_count(GenreFilter::All),
        );

        let mut error = None;
        let mut tally = |name: &str, result: AppResult<i64>| match result {
            Ok(count) => Tally::Count(count),
            Err(e) => {
                tracing::warn!(count = name, error = %e, "Index count failed");
                error.get_or_insert_with(|| COUNT_UNAVAILABLE.to_string());
                Tally::Failed(COUNT_UNAVAILABLE.to_string())
            }
        };

        let data = IndexCounts {
            book_count: tally("book_count", books),
            book_instance_count: tally("book_instance_count", instances),
            book_instance_available_count: tally("book_instance_available_count", available),
            author_count: tally("author_count", authors),
            genre_count: tally("genre_count", genres),
        };

        View::Index(IndexPage {
            title: "Local Library Home".to_string(),
            data,
            error,
        })
        .into()
    }
}
