//! Entity store layer
//!
//! [`CatalogStore`] is the persistence boundary the workflows talk to. It offers the same six
//! operations for every entity type: find by id, find by filter, count, save, update by id
//! and delete by id. Identifiers are assigned by the store on save.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, AuthorFilter, Book, BookFields, BookFilter, BookInstance,
        BookInstanceFields, BookInstanceFilter, Genre, GenreFields, GenreFilter,
    },
};

pub use memory::MemoryRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn authors_find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;
    /// Authors ordered by family name
    async fn authors_find(&self, filter: AuthorFilter) -> AppResult<Vec<Author>>;
    async fn authors_count(&self, filter: AuthorFilter) -> AppResult<i64>;
    async fn authors_save(&self, fields: AuthorFields) -> AppResult<Author>;
    async fn authors_update_by_id(&self, id: Uuid, fields: AuthorFields) -> AppResult<Author>;
    async fn authors_delete_by_id(&self, id: Uuid) -> AppResult<()>;

    async fn genres_find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn genres_find(&self, filter: GenreFilter) -> AppResult<Vec<Genre>>;
    async fn genres_count(&self, filter: GenreFilter) -> AppResult<i64>;
    async fn genres_save(&self, fields: GenreFields) -> AppResult<Genre>;
    async fn genres_update_by_id(&self, id: Uuid, fields: GenreFields) -> AppResult<Genre>;
    async fn genres_delete_by_id(&self, id: Uuid) -> AppResult<()>;

    async fn books_find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn books_find(&self, filter: BookFilter) -> AppResult<Vec<Book>>;
    async fn books_count(&self, filter: BookFilter) -> AppResult<i64>;
    async fn books_save(&self, fields: BookFields) -> AppResult<Book>;
    async fn books_update_by_id(&self, id: Uuid, fields: BookFields) -> AppResult<Book>;
    async fn books_delete_by_id(&self, id: Uuid) -> AppResult<()>;

    async fn book_instances_find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn book_instances_find(&self, filter: BookInstanceFilter) -> AppResult<Vec<BookInstance>>;
    async fn book_instances_count(&self, filter: BookInstanceFilter) -> AppResult<i64>;
    async fn book_instances_save(&self, fields: BookInstanceFields) -> AppResult<BookInstance>;
    async fn book_instances_update_by_id(
        &self,
        id: Uuid,
        fields: BookInstanceFields,
    ) -> AppResult<BookInstance>;
    async fn book_instances_delete_by_id(&self, id: Uuid) -> AppResult<()>;
}

/// Shared handle on whichever store backs the catalog
pub type Repository = Arc<dyn CatalogStore>;

/// PostgreSQL store, one sub-repository per table
#[derive(Clone)]
pub struct PgRepository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub genres: genres::GenresRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
}

impl PgRepository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for PgRepository {
    async fn authors_find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.authors.find_by_id(id).await
    }

    async fn authors_find(&self, filter: AuthorFilter) -> AppResult<Vec<Author>> {
        self.authors.find(&filter).await
    }

    async fn authors_count(&self, filter: AuthorFilter) -> AppResult<i64> {
        self.authors.count(&filter).await
    }

    async fn authors_save(&self, fields: AuthorFields) -> AppResult<Author> {
        self.authors.save(&fields).await
    }

    async fn authors_update_by_id(&self, id: Uuid, fields: AuthorFields) -> AppResult<Author> {
        self.authors.update_by_id(id, &fields).await
    }

    async fn authors_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.authors.delete_by_id(id).await
    }

    async fn genres_find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.genres.find_by_id(id).await
    }

    async fn genres_find(&self, filter: GenreFilter) -> AppResult<Vec<Genre>> {
        self.genres.find(&filter).await
    }

    async fn genres_count(&self, filter: GenreFilter) -> AppResult<i64> {
        self.genres.count(&filter).await
    }

    async fn genres_save(&self, fields: GenreFields) -> AppResult<Genre> {
        self.genres.save(&fields).await
    }

    async fn genres_update_by_id(&self, id: Uuid, fields: GenreFields) -> AppResult<Genre> {
        self.genres.update_by_id(id, &fields).await
    }

    async fn genres_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.genres.delete_by_id(id).await
    }

    async fn books_find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.books.find_by_id(id).await
    }

    async fn books_find(&self, filter: BookFilter) -> AppResult<Vec<Book>> {
        self.books.find(&filter).await
    }

    async fn books_count(&self, filter: BookFilter) -> AppResult<i64> {
        self.books.count(&filter).await
    }

    async fn books_save(&self, fields: BookFields) -> AppResult<Book> {
        self.books.save(&fields).await
    }

    async fn books_update_by_id(&self, id: Uuid, fields: BookFields) -> AppResult<Book> {
        self.books.update_by_id(id, &fields).await
    }

    async fn books_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.books.delete_by_id(id).await
    }

    async fn book_instances_find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.book_instances.find_by_id(id).await
    }

    async fn book_instances_find(&self, filter: BookInstanceFilter) -> AppResult<Vec<BookInstance>> {
        self.book_instances.find(&filter).await
    }

    async fn book_instances_count(&self, filter: BookInstanceFilter) -> AppResult<i64> {
        self.book_instances.count(&filter).await
    }

    async fn book_instances_save(&self, fields: BookInstanceFields) -> AppResult<BookInstance> {
        self.book_instances.save(&fields).await
    }

    async fn book_instances_update_by_id(
        &self,
        id: Uuid,
        fields: BookInstanceFields,
    ) -> AppResult<BookInstance> {
        self.book_instances.update_by_id(id, &fields).await
    }

    async fn book_instances_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.book_instances.delete_by_id(id).await
    }
}
