use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::Account;

/// Storage for Account rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts an account in a single atomic statement.
    ///
    /// Returns `Ok(None)` when a non-deleted account already holds
    /// `document_number`; the store's unique index is the source of truth.
    async fn create(&self, document_number: &str) -> Result<Option<Account>>;

    /// Finds a non-deleted account by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>>;
}

/// PostgreSQL-backed account repository.
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, document_number: &str) -> Result<Option<Account>> {
        // A concurrent duplicate that slips past ON CONFLICT still surfaces as
        // a unique violation, which AppError::from maps to Conflict.
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (document_number)
            VALUES ($1)
            ON CONFLICT (document_number) WHERE deleted_at IS NULL DO NOTHING
            RETURNING id, document_number, created_at, updated_at, deleted_at
            "#,
        )
        .bind(document_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, document_number, created_at, updated_at, deleted_at
            FROM accounts
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }
}
