//! Author workflow

use uuid::Uuid;

use super::relations::{book_summaries, RelationResolver};
use crate::{
    error::{AppError, AppResult},
    models::{author::AUTHOR_LIST_URL, Author, AuthorDraft, AuthorFilter, AuthorSummary, Book},
    repository::Repository,
    validation::{rules::AUTHOR_RULES, validate, FieldError, RawFields},
    views::{AuthorDeletePage, AuthorDetailPage, AuthorFormPage, AuthorListPage, Outcome, View},
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    relations: RelationResolver,
}

impl AuthorsService {
    pub fn new(repository: Repository, relations: RelationResolver) -> Self {
        Self { repository, relations }
    }

    /// All authors by family name
    pub async fn list(&self) -> AppResult<Outcome> {
        let authors = self.repository.authors_find(AuthorFilter::All).await?;
        Ok(View::AuthorList(AuthorListPage {
            title: "Author List".to_string(),
            author_list: authors.iter().map(AuthorSummary::from).collect(),
        })
        .into())
    }

    /// Author with the books they wrote
    pub async fn detail(&self, id: Uuid) -> AppResult<Outcome> {
        let (author, books) = self
            .load_with_books(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(View::AuthorDetail(AuthorDetailPage {
            title: "Author Detail".to_string(),
            author: AuthorSummary::from(&author),
            author_books: book_summaries(&books),
        })
        .into())
    }

    pub fn create_form(&self) -> Outcome {
        form("Create Author", None, Vec::new())
    }

    pub async fn create(&self, raw: &RawFields) -> AppResult<Outcome> {
        let validated = validate(AUTHOR_RULES, raw);
        let draft = AuthorDraft::from_sanitized(&validated.values, None);
        if !validated.is_valid() {
            return Ok(form("Create Author", Some(draft), validated.errors));
        }

        let author = self.repository.authors_save(draft.into_fields()).await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(Outcome::redirect(author.url()))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Outcome> {
        let author = self
            .repository
            .authors_find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(form("Update Author", Some(AuthorDraft::from(&author)), Vec::new()))
    }

    /// Replace every field of an existing author
    pub async fn update(&self, id: Uuid, raw: &RawFields) -> AppResult<Outcome> {
        let validated = validate(AUTHOR_RULES, raw);
        let draft = AuthorDraft::from_sanitized(&validated.values, Some(id));
        if !validated.is_valid() {
            return Ok(form("Update Author", Some(draft), validated.errors));
        }

        let author = self
            .repository
            .authors_update_by_id(id, draft.into_fields())
            .await?;
        tracing::info!(author_id = %author.id, "Author updated");
        Ok(Outcome::redirect(author.url()))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Outcome> {
        match self.load_with_books(id).await? {
            None => Ok(Outcome::redirect(AUTHOR_LIST_URL)),
            Some((author, books)) => Ok(delete_page(&author, &books)),
        }
    }

    /// Delete the author unless books still reference them
    pub async fn delete(&self, id: Uuid) -> AppResult<Outcome> {
        let Some((author, books)) = self.load_with_books(id).await? else {
            return Ok(Outcome::redirect(AUTHOR_LIST_URL));
        };

        if !books.is_empty() {
            tracing::info!(author_id = %id, books = books.len(), "Author delete blocked by books");
            return Ok(delete_page(&author, &books));
        }

        match self.repository.authors_delete_by_id(id).await {
            Ok(()) => tracing::info!(author_id = %id, "Author deleted"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        Ok(Outcome::redirect(AUTHOR_LIST_URL))
    }

    /// Author and its books, read concurrently
    async fn load_with_books(&self, id: Uuid) -> AppResult<Option<(Author, Vec<Book>)>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors_find_by_id(id),
            self.relations.author_books(id),
        )?;
        Ok(author.map(|author| (author, books)))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

fn form(title: &str, author: Option<AuthorDraft>, errors: Vec<FieldError>) -> Outcome {
    View::AuthorForm(AuthorFormPage {
        title: title.to_string(),
        author,
        errors,
    })
    .into()
}

fn delete_page(author: &Author, books: &[Book]) -> Outcome {
    View::AuthorDelete(AuthorDeletePage {
        title: "Delete Author".to_string(),
        author: AuthorSummary::from(author),
        author_books: book_summaries(books),
    })
    .into()
}
