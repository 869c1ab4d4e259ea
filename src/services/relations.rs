//! Relationship resolution between catalog entities
//!
//! Dependents are always read from the store at call time: the delete guards rely on them.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorSummary, Book, BookFilter, BookInstance, BookInstanceFilter, BookSummary,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RelationResolver {
    repository: Repository,
}

impl RelationResolver {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books written by the author
    pub async fn author_books(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.repository.books_find(BookFilter::ByAuthor(author_id)).await
    }

    /// Books filed under the genre
    pub async fn genre_books(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        self.repository.books_find(BookFilter::ByGenre(genre_id)).await
    }

    /// Copies of the book
    pub async fn book_instances(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.repository
            .book_instances_find(BookInstanceFilter::ByBook(book_id))
            .await
    }
}

/// Summaries of books without resolving their authors
pub fn book_summaries(books: &[Book]) -> Vec<BookSummary> {
    books.iter().map(|book| BookSummary::new(book, None)).collect()
}

/// Summaries of books with their author looked up in `authors`
pub fn books_with_authors(books: &[Book], authors: &[Author]) -> Vec<BookSummary> {
    let by_id: HashMap<Uuid, &Author> = authors.iter().map(|a| (a.id, a)).collect();
    books
        .iter()
        .map(|book| {
            let author = by_id.get(&book.author).map(|a| AuthorSummary::from(*a));
            BookSummary::new(book, author)
        })
        .collect()
}
