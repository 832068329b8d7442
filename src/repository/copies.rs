//! Book copies repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{map_copy_insert_error, CopyStore};
use crate::{
    error::{AppError, AppResult},
    models::copy::Copy,
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CopyStore for CopiesRepository {
    async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<Copy>> {
        let rows = sqlx::query_as::<_, Copy>(
            "SELECT id, book_id, available FROM book_copies WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Copy>> {
        let copy = sqlx::query_as::<_, Copy>(
            "SELECT id, book_id, available FROM book_copies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(copy)
    }

    async fn create(&self, book_id: i64, available: bool) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>(
            r#"
            INSERT INTO book_copies (book_id, available)
            VALUES ($1, $2)
            RETURNING id, book_id, available
            "#,
        )
        .bind(book_id)
        .bind(available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_copy_insert_error(e, book_id))
    }

    async fn update(&self, copy: &Copy) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>(
            r#"
            UPDATE book_copies SET available = $1
            WHERE id = $2
            RETURNING id, book_id, available
            "#,
        )
        .bind(copy.available)
        .bind(copy.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CopyNotFound(copy.id))
    }
}
