use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{is_valid_document_number, Account, DOCUMENT_NUMBER_LEN};
use crate::observability::{get_metrics, mask_document_number};
use crate::repositories::AccountRepository;

/// Service for account management operations.
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Creates an account for `document_number`.
    ///
    /// Fails with `Conflict` when a non-deleted account already holds the
    /// number. Uniqueness is decided by the insert itself, not by a prior lookup.
    pub async fn create_account(&self, document_number: &str) -> Result<Account> {
        if !is_valid_document_number(document_number) {
            return Err(AppError::Validation(format!(
                "Document number must be exactly {} digits",
                DOCUMENT_NUMBER_LEN
            )));
        }

        match self.accounts.create(document_number).await? {
            Some(account) => {
                tracing::info!(
                    account_id = account.id,
                    document_number = %mask_document_number(document_number),
                    "Account created"
                );
                get_metrics().record_account_created();
                Ok(account)
            }
            None => {
                tracing::warn!(
                    document_number = %mask_document_number(document_number),
                    "Duplicate document number rejected"
                );
                get_metrics().record_account_conflict();
                Err(AppError::Conflict(
                    "An account with this document number already exists".to_string(),
                ))
            }
        }
    }

    /// Gets a non-deleted account by id.
    pub async fn get_account(&self, id: i64) -> Result<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockAccountRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn account(id: i64, document_number: &str) -> Account {
        let now = Utc::now();
        Account {
            id,
            document_number: document_number.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_account_returns_persisted_row() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .withf(|doc| doc == "12345678900")
            .times(1)
            .returning(|doc| Ok(Some(account(1, doc))));

        let service = AccountService::new(Arc::new(repo));
        let created = service.create_account("12345678900").await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.document_number, "12345678900");
    }

    #[tokio::test]
    async fn test_create_account_duplicate_is_conflict() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create().times(1).returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repo));
        let err = service.create_account("12345678900").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_account_rejects_malformed_number_without_insert() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create().never();

        let service = AccountService::new(Arc::new(repo));
        for bad in ["1234567890", "123456789012", "1234567890a", ""] {
            let err = service.create_account(bad).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn test_get_account_missing_is_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(99))
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repo));
        let err = service.get_account(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Account '99' not found");
    }

    #[tokio::test]
    async fn test_get_account_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(account(id, "12345678900"))));

        let service = AccountService::new(Arc::new(repo));
        assert_eq!(service.get_account(1).await.unwrap().id, 1);
    }
}
