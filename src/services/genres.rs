//! Genre workflow
//!
//! Genre names are unique. Creating a genre whose name already exists lands on the existing
//! one; renaming a genre onto another genre's name is rejected as a field error.

use uuid::Uuid;

use super::relations::{book_summaries, RelationResolver};
use crate::{
    error::{AppError, AppResult},
    models::{genre::GENRE_LIST_URL, Book, Genre, GenreDraft, GenreFilter, GenreSummary},
    repository::Repository,
    validation::{rules::GENRE_RULES, validate, FieldError, RawFields},
    views::{GenreDeletePage, GenreDetailPage, GenreFormPage, GenreListPage, Outcome, View},
};

pub const DUPLICATE_NAME: &str = "A Genre with that name already exists.";

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
    relations: RelationResolver,
}

impl GenresService {
    pub fn new(repository: Repository, relations: RelationResolver) -> Self {
        Self { repository, relations }
    }

    pub async fn list(&self) -> AppResult<Outcome> {
        let genres = self.repository.genres_find(GenreFilter::All).await?;
        Ok(View::GenreList(GenreListPage {
            title: "Genre List".to_string(),
            genre_list: genres.iter().map(GenreSummary::from).collect(),
        })
        .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Outcome> {
        let (genre, books) = self
            .load_with_books(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(View::GenreDetail(GenreDetailPage {
            title: "Genre Detail".to_string(),
            genre: GenreSummary::from(&genre),
            genre_books: book_summaries(&books),
        })
        .into())
    }

    pub fn create_form(&self) -> Outcome {
        form("Create Genre", None, Vec::new())
    }

    pub async fn create(&self, raw: &RawFields) -> AppResult<Outcome> {
        let validated = validate(GENRE_RULES, raw);
        let draft = GenreDraft::from_sanitized(&validated.values, None);
        if !validated.is_valid() {
            return Ok(form("Create Genre", Some(draft), validated.errors));
        }

        if let Some(existing) = self.find_by_name(&draft.name).await? {
            tracing::info!(genre_id = %existing.id, name = %existing.name, "Genre already exists");
            return Ok(Outcome::redirect(existing.url()));
        }

        let genre = self.repository.genres_save(draft.into_fields()).await?;
        tracing::info!(genre_id = %genre.id, "Genre created");
        Ok(Outcome::redirect(genre.url()))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Outcome> {
        let genre = self
            .repository
            .genres_find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(form("Update Genre", Some(GenreDraft::from(&genre)), Vec::new()))
    }

    pub async fn update(&self, id: Uuid, raw: &RawFields) -> AppResult<Outcome> {
        let validated = validate(GENRE_RULES, raw);
        let draft = GenreDraft::from_sanitized(&validated.values, Some(id));
        if !validated.is_valid() {
            return Ok(form("Update Genre", Some(draft), validated.errors));
        }

        if let Some(existing) = self.find_by_name(&draft.name).await? {
            if existing.id != id {
                return Ok(form(
                    "Update Genre",
                    Some(draft),
                    vec![FieldError::new("name", DUPLICATE_NAME)],
                ));
            }
        }

        let genre = self
            .repository
            .genres_update_by_id(id, draft.into_fields())
            .await?;
        tracing::info!(genre_id = %genre.id, "Genre updated");
        Ok(Outcome::redirect(genre.url()))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Outcome> {
        match self.load_with_books(id).await? {
            None => Ok(Outcome::redirect(GENRE_LIST_URL)),
            Some((genre, books)) => Ok(delete_page(&genre, &books)),
        }
    }

    /// Delete the genre unless books are still filed under it
    pub async fn delete(&self, id: Uuid) -> AppResult<Outcome> {
        let Some((genre, books)) = self.load_with_books(id).await? else {
            return Ok(Outcome::redirect(GENRE_LIST_URL));
        };

        if !books.is_empty() {
            tracing::info!(genre_id = %id, books = books.len(), "Genre delete blocked by books");
            return Ok(delete_page(&genre, &books));
        }

        match self.repository.genres_delete_by_id(id).await {
            Ok(()) => tracing::info!(genre_id = %id, "Genre deleted"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        Ok(Outcome::redirect(GENRE_LIST_URL))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let found = self
            .repository
            .genres_find(GenreFilter::ByName(name.to_string()))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn load_with_books(&self, id: Uuid) -> AppResult<Option<(Genre, Vec<Book>)>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres_find_by_id(id),
            self.relations.genre_books(id),
        )?;
        Ok(genre.map(|genre| (genre, books)))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

fn form(title: &str, genre: Option<GenreDraft>, errors: Vec<FieldError>) -> Outcome {
    View::GenreForm(GenreFormPage {
        title: title.to_string(),
        genre,
        errors,
    })
    .into()
}

fn delete_page(genre: &Genre, books: &[Book]) -> Outcome {
    View::GenreDelete(GenreDeletePage {
        title: "Delete Genre".to_string(),
        genre: GenreSummary::from(genre),
        genre_books: book_summaries(books),
    })
    .into()
}
