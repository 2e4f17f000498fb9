use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{NewTransaction, Transaction, TransactionDetails, TransactionDetailsRow};

/// Storage for Transaction rows and their joined read projection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Inserts a transaction and returns the stored row.
    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction>;

    /// Reads a transaction joined with its account and operation type.
    async fn find_details_by_id(&self, id: i64) -> Result<Option<TransactionDetails>>;

    /// All transactions of an account, oldest first.
    async fn find_details_by_account(&self, account_id: i64) -> Result<Vec<TransactionDetails>>;
}

/// Shared SELECT for the joined projection. Callers append WHERE/ORDER BY.
const DETAILS_SELECT: &str = r#"
    SELECT t.id, t.account_id, t.operation_type_id, t.amount, t.event_date,
           t.created_at, t.updated_at, t.deleted_at,
           a.document_number AS account_document_number,
           a.created_at AS account_created_at,
           a.updated_at AS account_updated_at,
           a.deleted_at AS account_deleted_at,
           o.description AS operation_type_description,
           o.created_at AS operation_type_created_at,
           o.updated_at AS operation_type_updated_at,
           o.deleted_at AS operation_type_deleted_at
    FROM transactions t
    JOIN accounts a ON a.id = t.account_id
    JOIN operation_types o ON o.id = t.operation_type_id
"#;

/// PostgreSQL-backed transaction repository.
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (account_id, operation_type_id, amount, event_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, operation_type_id, amount, event_date, created_at, updated_at, deleted_at
            "#,
        )
        .bind(transaction.account_id)
        .bind(transaction.operation_type_id)
        .bind(transaction.amount)
        .bind(transaction.event_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    async fn find_details_by_id(&self, id: i64) -> Result<Option<TransactionDetails>> {
        let query = format!("{DETAILS_SELECT} WHERE t.id = $1 AND t.deleted_at IS NULL");

        let row = sqlx::query_as::<_, TransactionDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.map(TransactionDetails::from))
    }

    async fn find_details_by_account(&self, account_id: i64) -> Result<Vec<TransactionDetails>> {
        let query = format!(
            "{DETAILS_SELECT} WHERE t.account_id = $1 AND t.deleted_at IS NULL ORDER BY t.event_date, t.id"
        );

        let rows = sqlx::query_as::<_, TransactionDetailsRow>(&query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(TransactionDetails::from).collect())
    }
}
