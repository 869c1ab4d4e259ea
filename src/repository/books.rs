//! Books repository
//!
//! Genre links live in `book_genres`; they are read back as an array so a book row always
//! carries its full genre set in selection order.

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFields, BookFilter},
};

const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.author_id AS author, b.summary, b.isbn,
           ARRAY(
               SELECT bg.genre_id FROM book_genres bg
               WHERE bg.book_id = b.id
               ORDER BY bg.position
           ) AS genre
    FROM books b
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", SELECT_BOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    pub async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let rows = match filter {
            BookFilter::All => {
                sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.created_at", SELECT_BOOK))
                    .fetch_all(&self.pool)
                    .await?
            }
            BookFilter::ByAuthor(author_id) => {
                sqlx::query_as::<_, Book>(&format!(
                    "{} WHERE b.author_id = $1 ORDER BY b.created_at",
                    SELECT_BOOK
                ))
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            BookFilter::ByGenre(genre_id) => {
                sqlx::query_as::<_, Book>(&format!(
                    r#"{} WHERE EXISTS (
                        SELECT 1 FROM book_genres bg WHERE bg.book_id = b.id AND bg.genre_id = $1
                    ) ORDER BY b.created_at"#,
                    SELECT_BOOK
                ))
                .bind(genre_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let count: i64 = match filter {
            BookFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM books")
                    .fetch_one(&self.pool)
                    .await?
            }
            BookFilter::ByAuthor(author_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
                    .bind(author_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            BookFilter::ByGenre(genre_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_genres WHERE genre_id = $1")
                    .bind(genre_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    /// Insert a book and its genre links in one transaction
    pub async fn save(&self, fields: &BookFields) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&fields.title)
        .bind(fields.author)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .fetch_one(&mut *tx)
        .await?;

        link_genres(&mut tx, id, &fields.genre).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", id)))
    }

    /// Overwrite every field of a book, genre links included
    pub async fn update_by_id(&self, id: Uuid, fields: &BookFields) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books SET title = $2, author_id = $3, summary = $4, isbn = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(fields.author)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_genres(&mut tx, id, &fields.genre).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    book_id: Uuid,
    genres: &[Uuid],
) -> AppResult<()> {
    if genres.is_empty() {
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO book_genres (book_id, genre_id, position)
        SELECT $1, g.genre_id, g.ord::int
        FROM UNNEST($2::uuid[]) WITH ORDINALITY AS g(genre_id, ord)
        ON CONFLICT (book_id, genre_id) DO NOTHING
        "#,
    )
    .bind(book_id)
    .bind(genres)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
