//! In-memory entity store for tests and demos
//!
//! Rows keep insertion order, which is the default listing order; authors are listed by
//! family name like the Postgres store does. No foreign keys are enforced here.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorFields, AuthorFilter, Book, BookFields, BookFilter, BookInstance,
        BookInstanceFields, BookInstanceFilter, Genre, GenreFields, GenreFilter,
    },
};

#[derive(Default)]
struct MemoryData {
    authors: IndexMap<Uuid, Author>,
    genres: IndexMap<Uuid, Genre>,
    books: IndexMap<Uuid, Book>,
    book_instances: IndexMap<Uuid, BookInstance>,
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn author_matches(_author: &Author, filter: &AuthorFilter) -> bool {
    match filter {
        AuthorFilter::All => true,
    }
}

fn genre_matches(genre: &Genre, filter: &GenreFilter) -> bool {
    match filter {
        GenreFilter::All => true,
        GenreFilter::ByName(name) => &genre.name == name,
        GenreFilter::Ids(ids) => ids.contains(&genre.id),
    }
}

fn book_matches(book: &Book, filter: &BookFilter) -> bool {
    match filter {
        BookFilter::All => true,
        BookFilter::ByAuthor(author_id) => book.author == *author_id,
        BookFilter::ByGenre(genre_id) => book.genre.contains(genre_id),
    }
}

fn book_instance_matches(instance: &BookInstance, filter: &BookInstanceFilter) -> bool {
    match filter {
        BookInstanceFilter::All => true,
        BookInstanceFilter::ByBook(book_id) => instance.book == *book_id,
        BookInstanceFilter::ByStatus(status) => instance.status == *status,
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[async_trait]
impl CatalogStore for MemoryRepository {
    async fn authors_find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.data.read().await.authors.get(&id).cloned())
    }

    async fn authors_find(&self, filter: AuthorFilter) -> AppResult<Vec<Author>> {
        let data = self.data.read().await;
        let mut authors: Vec<Author> = data
            .authors
            .values()
            .filter(|a| author_matches(a, &filter))
            .cloned()
            .collect();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn authors_count(&self, filter: AuthorFilter) -> AppResult<i64> {
        let data = self.data.read().await;
        Ok(data.authors.values().filter(|a| author_matches(a, &filter)).count() as i64)
    }

    async fn authors_save(&self, fields: AuthorFields) -> AppResult<Author> {
        let author = fields.into_author(Uuid::new_v4());
        self.data.write().await.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_update_by_id(&self, id: Uuid, fields: AuthorFields) -> AppResult<Author> {
        let mut data = self.data.write().await;
        let slot = data
            .authors
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        *slot = fields.into_author(id);
        Ok(slot.clone())
    }

    async fn authors_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.data
            .write()
            .await
            .authors
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn genres_find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.data.read().await.genres.get(&id).cloned())
    }

    async fn genres_find(&self, filter: GenreFilter) -> AppResult<Vec<Genre>> {
        let data = self.data.read().await;
        Ok(data
            .genres
            .values()
            .filter(|g| genre_matches(g, &filter))
            .cloned()
            .collect())
    }

    async fn genres_count(&self, filter: GenreFilter) -> AppResult<i64> {
        let data = self.data.read().await;
        Ok(data.genres.values().filter(|g| genre_matches(g, &filter)).count() as i64)
    }

    async fn genres_save(&self, fields: GenreFields) -> AppResult<Genre> {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: fields.name,
        };
        self.data.write().await.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn genres_update_by_id(&self, id: Uuid, fields: GenreFields) -> AppResult<Genre> {
        let mut data = self.data.write().await;
        let slot = data
            .genres
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?;
        slot.name = fields.name;
        Ok(slot.clone())
    }

    async fn genres_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.data
            .write()
            .await
            .genres
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    async fn books_find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.data.read().await.books.get(&id).cloned())
    }

    async fn books_find(&self, filter: BookFilter) -> AppResult<Vec<Book>> {
        let data = self.data.read().await;
        Ok(data
            .books
            .values()
            .filter(|b| book_matches(b, &filter))
            .cloned()
            .collect())
    }

    async fn books_count(&self, filter: BookFilter) -> AppResult<i64> {
        let data = self.data.read().await;
        Ok(data.books.values().filter(|b| book_matches(b, &filter)).count() as i64)
    }

    async fn books_save(&self, mut fields: BookFields) -> AppResult<Book> {
        fields.genre = dedup(fields.genre);
        let book = fields.into_book(Uuid::new_v4());
        self.data.write().await.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn books_update_by_id(&self, id: Uuid, mut fields: BookFields) -> AppResult<Book> {
        fields.genre = dedup(fields.genre);
        let mut data = self.data.write().await;
        let slot = data
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        *slot = fields.into_book(id);
        Ok(slot.clone())
    }

    async fn books_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.data
            .write()
            .await
            .books
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn book_instances_find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.data.read().await.book_instances.get(&id).cloned())
    }

    async fn book_instances_find(&self, filter: BookInstanceFilter) -> AppResult<Vec<BookInstance>> {
        let data = self.data.read().await;
        Ok(data
            .book_instances
            .values()
            .filter(|i| book_instance_matches(i, &filter))
            .cloned()
            .collect())
    }

    async fn book_instances_count(&self, filter: BookInstanceFilter) -> AppResult<i64> {
        let data = self.data.read().await;
        Ok(data
            .book_instances
            .values()
            .filter(|i| book_instance_matches(i, &filter))
            .count() as i64)
    }

    async fn book_instances_save(&self, fields: BookInstanceFields) -> AppResult<BookInstance> {
        let instance = fields.into_instance(Uuid::new_v4());
        self.data
            .write()
            .await
            .book_instances
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn book_instances_update_by_id(
        &self,
        id: Uuid,
        fields: BookInstanceFields,
    ) -> AppResult<BookInstance> {
        let mut data = self.data.write().await;
        let slot = data
            .book_instances
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;
        *slot = fields.into_instance(id);
        Ok(slot.clone())
    }

    async fn book_instances_delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.data
            .write()
            .await
            .book_instances
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }
}
