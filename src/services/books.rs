//! Book workflow
//!
//! Books reference one author and any number of genres. Forms need the full author and genre
//! lists, with genres flagged when they belong to the book being edited.

use std::collections::HashSet;

use uuid::Uuid;

use super::relations::{books_with_authors, RelationResolver};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BOOK_LIST_URL, Author, AuthorFilter, AuthorSummary, Book, BookDetails, BookDraft,
        BookFields, BookFilter, BookInstance, BookInstanceSummary, BookSummary, Genre,
        GenreFilter, GenreOption, GenreSummary,
    },
    repository::Repository,
    validation::{rules::BOOK_RULES, validate, FieldError, RawFields},
    views::{BookDeletePage, BookDetailPage, BookFormPage, BookListPage, Outcome, View},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    relations: RelationResolver,
}

impl BooksService {
    pub fn new(repository: Repository, relations: RelationResolver) -> Self {
        Self { repository, relations }
    }

    /// All books with their authors
    pub async fn list(&self) -> AppResult<Outcome> {
        let (books, authors) = tokio::try_join!(
            self.repository.books_find(BookFilter::All),
            self.repository.authors_find(AuthorFilter::All),
        )?;
        Ok(View::BookList(BookListPage {
            title: "Book List".to_string(),
            book_list: books_with_authors(&books, &authors),
        })
        .into())
    }

    /// Book with author, genres and copies
    pub async fn detail(&self, id: Uuid) -> AppResult<Outcome> {
        let (book, instances) = self
            .load_with_instances(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        let details = self.details(&book).await?;

        Ok(View::BookDetail(BookDetailPage {
            title: book.title.clone(),
            book: details,
            book_instances: instance_summaries(&instances),
        })
        .into())
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        let (authors, genres) = self.choices().await?;
        Ok(form("Create Book", &authors, &genres, None, Vec::new()))
    }

    pub async fn create(&self, raw: &RawFields) -> AppResult<Outcome> {
        let draft = match self.check(raw, None).await? {
            Checked::Valid(fields) => {
                let book = self.repository.books_save(fields).await?;
                tracing::info!(book_id = %book.id, "Book created");
                return Ok(Outcome::redirect(book.url()));
            }
            Checked::Invalid(draft, errors) => (draft, errors),
        };
        self.redisplay("Create Book", draft).await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Outcome> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books_find_by_id(id),
            self.repository.authors_find(AuthorFilter::All),
            self.repository.genres_find(GenreFilter::All),
        )?;
        let book = book.ok_or_else(|| not_found(id))?;
        Ok(form(
            "Update Book",
            &authors,
            &genres,
            Some(BookDraft::from(&book)),
            Vec::new(),
        ))
    }

    /// Replace every field of an existing book, keeping its id
    pub async fn update(&self, id: Uuid, raw: &RawFields) -> AppResult<Outcome> {
        let draft = match self.check(raw, Some(id)).await? {
            Checked::Valid(fields) => {
                let book = self.repository.books_update_by_id(id, fields).await?;
                tracing::info!(book_id = %book.id, "Book updated");
                return Ok(Outcome::redirect(book.url()));
            }
            Checked::Invalid(draft, errors) => (draft, errors),
        };
        self.redisplay("Update Book", draft).await
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Outcome> {
        match self.load_with_instances(id).await? {
            None => Ok(Outcome::redirect(BOOK_LIST_URL)),
            Some((book, instances)) => self.delete_page(&book, &instances).await,
        }
    }

    /// Delete the book unless copies of it still exist
    pub async fn delete(&self, id: Uuid) -> AppResult<Outcome> {
        let Some((book, instances)) = self.load_with_instances(id).await? else {
            return Ok(Outcome::redirect(BOOK_LIST_URL));
        };

        if !instances.is_empty() {
            tracing::info!(book_id = %id, copies = instances.len(), "Book delete blocked by copies");
            return self.delete_page(&book, &instances).await;
        }

        match self.repository.books_delete_by_id(id).await {
            Ok(()) => tracing::info!(book_id = %id, "Book deleted"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        Ok(Outcome::redirect(BOOK_LIST_URL))
    }

    /// Validate a submission, then make sure the author and genres it names exist
    async fn check(&self, raw: &RawFields, id: Option<Uuid>) -> AppResult<Checked> {
        let validated = validate(BOOK_RULES, raw);
        let draft = BookDraft::from_sanitized(&validated.values, id);
        if !validated.is_valid() {
            return Ok(Checked::Invalid(draft, validated.errors));
        }

        let fields = draft.clone().into_fields()?;
        let wanted: HashSet<Uuid> = fields.genre.iter().copied().collect();
        let (author, genres) = tokio::try_join!(
            self.repository.authors_find_by_id(fields.author),
            self.repository.genres_count(GenreFilter::Ids(wanted.iter().copied().collect())),
        )?;

        let mut errors = Vec::new();
        if author.is_none() {
            errors.push(FieldError::new("author", "Author not found."));
        }
        if genres < wanted.len() as i64 {
            errors.push(FieldError::new("genre", "Genre not found."));
        }

        if errors.is_empty() {
            Ok(Checked::Valid(fields))
        } else {
            Ok(Checked::Invalid(draft, errors))
        }
    }

    /// Show the form again with the submitted book and its errors
    async fn redisplay(
        &self,
        title: &str,
        (draft, errors): (BookDraft, Vec<FieldError>),
    ) -> AppResult<Outcome> {
        let (authors, genres) = self.choices().await?;
        Ok(form(title, &authors, &genres, Some(draft), errors))
    }

    async fn choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.repository.authors_find(AuthorFilter::All),
            self.repository.genres_find(GenreFilter::All),
        )
    }

    /// Book and its copies, read concurrently
    async fn load_with_instances(&self, id: Uuid) -> AppResult<Option<(Book, Vec<BookInstance>)>> {
        let (book, instances) = tokio::try_join!(
            self.repository.books_find_by_id(id),
            self.relations.book_instances(id),
        )?;
        Ok(book.map(|book| (book, instances)))
    }

    /// Resolve the author and genres of a book
    async fn details(&self, book: &Book) -> AppResult<BookDetails> {
        let (author, genres) = tokio::try_join!(
            self.repository.authors_find_by_id(book.author),
            self.repository.genres_find(GenreFilter::Ids(book.genre.clone())),
        )?;
        Ok(BookDetails {
            book: BookSummary::new(book, author.as_ref().map(AuthorSummary::from)),
            genres: genres.iter().map(GenreSummary::from).collect(),
        })
    }

    async fn delete_page(&self, book: &Book, instances: &[BookInstance]) -> AppResult<Outcome> {
        let details = self.details(book).await?;
        Ok(View::BookDelete(BookDeletePage {
            title: "Delete Book".to_string(),
            book: details,
            book_instances: instance_summaries(instances),
        })
        .into())
    }
}

enum Checked {
    Valid(BookFields),
    Invalid(BookDraft, Vec<FieldError>),
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

fn instance_summaries(instances: &[BookInstance]) -> Vec<BookInstanceSummary> {
    instances
        .iter()
        .map(|instance| BookInstanceSummary::new(instance, None))
        .collect()
}

fn form(
    title: &str,
    authors: &[Author],
    genres: &[Genre],
    book: Option<BookDraft>,
    errors: Vec<FieldError>,
) -> Outcome {
    let options = match &book {
        Some(draft) => GenreOption::project(genres, &draft.genre),
        None => GenreOption::project::<String>(genres, &[]),
    };
    View::BookForm(BookFormPage {
        title: title.to_string(),
        authors: authors.iter().map(AuthorSummary::from).collect(),
        genres: options,
        book,
        errors,
    })
    .into()
}
