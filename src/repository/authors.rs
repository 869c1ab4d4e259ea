//! Authors repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorFields, AuthorFilter},
};

const SELECT_AUTHOR: &str =
    "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM authors";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!("{} WHERE id = $1", SELECT_AUTHOR))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    /// List authors sorted by family name
    pub async fn find(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>> {
        let rows = match filter {
            AuthorFilter::All => {
                sqlx::query_as::<_, Author>(&format!(
                    "{} ORDER BY family_name, first_name",
                    SELECT_AUTHOR
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn count(&self, filter: &AuthorFilter) -> AppResult<i64> {
        let count: i64 = match filter {
            AuthorFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM authors")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn save(&self, fields: &AuthorFields) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_by_id(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
