//! Genres repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreFields, GenreFilter},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(genre)
    }

    pub async fn find(&self, filter: &GenreFilter) -> AppResult<Vec<Genre>> {
        let rows = match filter {
            GenreFilter::All => {
                sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY created_at")
                    .fetch_all(&self.pool)
                    .await?
            }
            GenreFilter::ByName(name) => {
                sqlx::query_as::<_, Genre>(
                    "SELECT id, name FROM genres WHERE name = $1 ORDER BY created_at",
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            GenreFilter::Ids(ids) => {
                sqlx::query_as::<_, Genre>(
                    "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY created_at",
                )
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn count(&self, filter: &GenreFilter) -> AppResult<i64> {
        let count: i64 = match filter {
            GenreFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM genres")
                    .fetch_one(&self.pool)
                    .await?
            }
            GenreFilter::ByName(name) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE name = $1")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?
            }
            GenreFilter::Ids(ids) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE id = ANY($1)")
                    .bind(ids)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn save(&self, fields: &GenreFields) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&fields.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_by_id(&self, id: Uuid, fields: &GenreFields) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&fields.name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Genre {} not found", id)));
        }
        Ok(())
    }
}
