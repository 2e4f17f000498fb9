use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::OperationType;

/// Lookup and idempotent insert of operation type reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperationTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<OperationType>>;

    /// Inserts a row unless one with exactly this description exists.
    /// Returns true if a row was inserted.
    async fn create_if_absent(&self, description: &str) -> Result<bool>;

    /// Number of non-deleted rows.
    async fn count(&self) -> Result<i64>;
}

/// PostgreSQL-backed operation type repository.
pub struct PgOperationTypeRepository {
    pool: PgPool,
}

impl PgOperationTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationTypeRepository for PgOperationTypeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<OperationType>> {
        let row = sqlx::query_as::<_, OperationType>(
            r#"
            SELECT id, description, created_at, updated_at, deleted_at
            FROM operation_types
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    async fn create_if_absent(&self, description: &str) -> Result<bool> {
        // NOT EXISTS keeps the id sequence untouched on re-runs, so a fresh
        // store hands out ids 1..=4 in seeding order.
        let result = sqlx::query(
            r#"
            INSERT INTO operation_types (description)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM operation_types WHERE description = $1)
            ON CONFLICT (description) DO NOTHING
            "#,
        )
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM operation_types
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.0)
    }
}
