//! Book instance (copy) workflow
//!
//! Copies are leaves of the catalog: nothing references them, so deletion is unconditional.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::parse_reference, book_instance::BOOK_INSTANCE_LIST_URL, Book, BookFilter,
        BookInstance, BookInstanceDraft, BookInstanceFields, BookInstanceFilter,
        BookInstanceStatus, BookInstanceSummary, BookSummary,
    },
    repository::Repository,
    validation::{rules::BOOK_INSTANCE_RULES, validate, FieldError, RawFields},
    views::{
        BookInstanceDeletePage, BookInstanceDetailPage, BookInstanceFormPage,
        BookInstanceListPage, Outcome, View,
    },
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies with their books
    pub async fn list(&self) -> AppResult<Outcome> {
        let (instances, books) = tokio::try_join!(
            self.repository.book_instances_find(BookInstanceFilter::All),
            self.repository.books_find(BookFilter::All),
        )?;
        let by_id: HashMap<Uuid, &Book> = books.iter().map(|b| (b.id, b)).collect();

        let bookinstance_list = instances
            .iter()
            .map(|instance| {
                let book = by_id.get(&instance.book).map(|b| BookSummary::new(b, None));
                BookInstanceSummary::new(instance, book)
            })
            .collect();

        Ok(View::BookInstanceList(BookInstanceListPage {
            title: "Book Instance List".to_string(),
            bookinstance_list,
        })
        .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Outcome> {
        let (instance, book) = self.load(id).await?.ok_or_else(|| not_found(id))?;
        let title = match &book {
            Some(book) => format!("Copy: {}", book.title),
            None => "Copy".to_string(),
        };

        Ok(View::BookInstanceDetail(BookInstanceDetailPage {
            title,
            bookinstance: summary(&instance, book.as_ref()),
        })
        .into())
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        let books = self.books().await?;
        Ok(form("Create BookInstance", &books, None, Vec::new()))
    }

    pub async fn create(&self, raw: &RawFields) -> AppResult<Outcome> {
        let checked = self.check(raw, None).await?;
        match checked {
            Checked::Valid(fields) => {
                let instance = self.repository.book_instances_save(fields).await?;
                tracing::info!(book_instance_id = %instance.id, book_id = %instance.book, "Book instance created");
                Ok(Outcome::redirect(instance.url()))
            }
            Checked::Invalid(draft, errors) => {
                let books = self.books().await?;
                Ok(form("Create BookInstance", &books, Some(draft), errors))
            }
        }
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Outcome> {
        let (instance, books) = tokio::try_join!(
            self.repository.book_instances_find_by_id(id),
            self.books(),
        )?;
        let instance = instance.ok_or_else(|| not_found(id))?;
        Ok(form(
            "Update BookInstance",
            &books,
            Some(BookInstanceDraft::from(&instance)),
            Vec::new(),
        ))
    }

    /// Replace every field of an existing copy
    pub async fn update(&self, id: Uuid, raw: &RawFields) -> AppResult<Outcome> {
        let checked = self.check(raw, Some(id)).await?;
        match checked {
            Checked::Valid(fields) => {
                let instance = self.repository.book_instances_update_by_id(id, fields).await?;
                tracing::info!(book_instance_id = %instance.id, "Book instance updated");
                Ok(Outcome::redirect(instance.url()))
            }
            Checked::Invalid(draft, errors) => {
                let books = self.books().await?;
                Ok(form("Update BookInstance", &books, Some(draft), errors))
            }
        }
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Outcome> {
        let Some((instance, book)) = self.load(id).await? else {
            return Ok(Outcome::redirect(BOOK_INSTANCE_LIST_URL));
        };
        Ok(View::BookInstanceDelete(BookInstanceDeletePage {
            title: "Delete Copy".to_string(),
            bookinstance: summary(&instance, book.as_ref()),
        })
        .into())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Outcome> {
        match self.repository.book_instances_delete_by_id(id).await {
            Ok(()) => tracing::info!(book_instance_id = %id, "Book instance deleted"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        Ok(Outcome::redirect(BOOK_INSTANCE_LIST_URL))
    }

    async fn check(&self, raw: &RawFields, id: Option<Uuid>) -> AppResult<Checked> {
        let validated = validate(BOOK_INSTANCE_RULES, raw);
        let draft = BookInstanceDraft::from_sanitized(&validated.values, id);
        if !validated.is_valid() {
            return Ok(Checked::Invalid(draft, validated.errors));
        }

        let fields = draft.clone().into_fields()?;
        if self.repository.books_find_by_id(fields.book).await?.is_none() {
            let errors = vec![FieldError::new("book", "Book not found.")];
            return Ok(Checked::Invalid(draft, errors));
        }
        Ok(Checked::Valid(fields))
    }

    async fn books(&self) -> AppResult<Vec<Book>> {
        let mut books = self.repository.books_find(BookFilter::All).await?;
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    /// Copy and the book it belongs to
    async fn load(&self, id: Uuid) -> AppResult<Option<(BookInstance, Option<Book>)>> {
        let Some(instance) = self.repository.book_instances_find_by_id(id).await? else {
            return Ok(None);
        };
        let book = self.repository.books_find_by_id(instance.book).await?;
        Ok(Some((instance, book)))
    }
}

enum Checked {
    Valid(BookInstanceFields),
    Invalid(BookInstanceDraft, Vec<FieldError>),
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book copy {} not found", id))
}

fn summary(instance: &BookInstance, book: Option<&Book>) -> BookInstanceSummary {
    BookInstanceSummary::new(instance, book.map(|b| BookSummary::new(b, None)))
}

fn form(
    title: &str,
    books: &[Book],
    bookinstance: Option<BookInstanceDraft>,
    errors: Vec<FieldError>,
) -> Outcome {
    // Only a well-formed reference can pre-select a book
    let selected_book = bookinstance
        .as_ref()
        .and_then(|draft| parse_reference(&draft.book).ok())
        .map(|id| id.to_string());

    View::BookInstanceForm(BookInstanceFormPage {
        title: title.to_string(),
        book_list: books.iter().map(|b| BookSummary::new(b, None)).collect(),
        statuses: BookInstanceStatus::NAMES,
        selected_book,
        bookinstance,
        errors,
    })
    .into()
}
