//! Book instances (copies) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceFields, BookInstanceFilter},
};

const SELECT_INSTANCE: &str =
    "SELECT id, book_id AS book, imprint, status, due_back FROM book_instances";

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let instance =
            sqlx::query_as::<_, BookInstance>(&format!("{} WHERE id = $1", SELECT_INSTANCE))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(instance)
    }

    pub async fn find(&self, filter: &BookInstanceFilter) -> AppResult<Vec<BookInstance>> {
        let rows = match filter {
            BookInstanceFilter::All => {
                sqlx::query_as::<_, BookInstance>(&format!(
                    "{} ORDER BY created_at",
                    SELECT_INSTANCE
                ))
                .fetch_all(&self.pool)
                .await?
            }
            BookInstanceFilter::ByBook(book_id) => {
                sqlx::query_as::<_, BookInstance>(&format!(
                    "{} WHERE book_id = $1 ORDER BY created_at",
                    SELECT_INSTANCE
                ))
                .bind(book_id)
                .fetch_all(&self.pool)
                .await?
            }
            BookInstanceFilter::ByStatus(status) => {
                sqlx::query_as::<_, BookInstance>(&format!(
                    "{} WHERE status = $1 ORDER BY created_at",
                    SELECT_INSTANCE
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn count(&self, filter: &BookInstanceFilter) -> AppResult<i64> {
        let count: i64 = match filter {
            BookInstanceFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
                    .fetch_one(&self.pool)
                    .await?
            }
            BookInstanceFilter::ByBook(book_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE book_id = $1")
                    .bind(book_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            BookInstanceFilter::ByStatus(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn save(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id AS book, imprint, status, due_back
            "#,
        )
        .bind(fields.book)
        .bind(&fields.imprint)
        .bind(fields.status)
        .bind(fields.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        fields: &BookInstanceFields,
    ) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING id, book_id AS book, imprint, status, due_back
            "#,
        )
        .bind(id)
        .bind(fields.book)
        .bind(&fields.imprint)
        .bind(fields.status)
        .bind(fields.due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
