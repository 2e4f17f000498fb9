use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::models::{max_amount, round_amount, AmountSign, NewTransaction, TransactionDetails};
use crate::observability::{get_metrics, mask_amount, LatencyTimer};
use crate::repositories::{AccountRepository, OperationTypeRepository, TransactionRepository};

/// Input for recording a transaction. `amount` is the positive value the
/// client sent; the stored sign comes from the operation type.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionCommand {
    pub account_id: i64,
    pub operation_type_id: i64,
    pub amount: Decimal,
}

/// Records signed transactions against existing accounts.
pub struct TransactionService {
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
    operation_types: Arc<dyn OperationTypeRepository>,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
        operation_types: Arc<dyn OperationTypeRepository>,
    ) -> Self {
        Self {
            transactions,
            accounts,
            operation_types,
        }
    }

    /// Validates references, signs the amount and persists the transaction.
    ///
    /// Nothing is written unless both the account and the operation type
    /// exist. The returned value is read back from the store.
    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<TransactionDetails> {
        let metrics = get_metrics();

        let amount = round_amount(command.amount);
        if amount <= Decimal::ZERO {
            metrics.record_transaction_rejected("invalid_amount");
            return Err(AppError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if amount > max_amount() {
            metrics.record_transaction_rejected("invalid_amount");
            return Err(AppError::Validation(format!(
                "Amount must not exceed {}",
                max_amount()
            )));
        }

        if self.accounts.find_by_id(command.account_id).await?.is_none() {
            metrics.record_transaction_rejected("account_not_found");
            return Err(AppError::AccountNotFound(command.account_id));
        }

        let operation_type = match self
            .operation_types
            .find_by_id(command.operation_type_id)
            .await?
        {
            Some(operation_type) => operation_type,
            None => {
                metrics.record_transaction_rejected("operation_type_not_found");
                return Err(AppError::OperationTypeNotFound(command.operation_type_id));
            }
        };

        let new_transaction = NewTransaction::signed(
            command.account_id,
            &operation_type,
            amount,
            Utc::now(),
        );

        let timer = LatencyTimer::new();
        let created = self.transactions.create(&new_transaction).await?;
        let details = self
            .transactions
            .find_details_by_id(created.id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow!(
                    "transaction {} missing after insert",
                    created.id
                ))
            })?;
        metrics.record_transaction_write_latency(timer.elapsed_ms());

        let category = operation_type
            .category()
            .map(|c| c.as_str())
            .unwrap_or("other");
        let sign = match new_transaction.sign() {
            AmountSign::Debit => "debit",
            AmountSign::Credit => "credit",
        };
        metrics.record_transaction_created(category, sign);

        tracing::info!(
            transaction_id = created.id,
            account_id = command.account_id,
            operation_type_id = command.operation_type_id,
            category,
            sign,
            amount = %mask_amount(&new_transaction.amount),
            "Transaction recorded"
        );

        Ok(details)
    }

    /// All transactions of an existing account, oldest first.
    pub async fn list_account_transactions(
        &self,
        account_id: i64,
    ) -> Result<Vec<TransactionDetails>> {
        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Account '{}' not found",
                account_id
            )));
        }

        self.transactions.find_details_by_account(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, OperationType, Transaction};
    use crate::repositories::{
        MockAccountRepository, MockOperationTypeRepository, MockTransactionRepository,
    };
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn account(id: i64) -> Account {
        let now = Utc::now();
        Account {
            id,
            document_number: "12345678900".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn operation_type(id: i64, description: &str) -> OperationType {
        let now = Utc::now();
        OperationType {
            id,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn stored(id: i64, new: &NewTransaction) -> Transaction {
        let now = Utc::now();
        Transaction {
            id,
            account_id: new.account_id,
            operation_type_id: new.operation_type_id,
            amount: new.amount,
            event_date: new.event_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Mocks that accept one insert of `expected_amount` and echo it back
    /// through the details read.
    fn service_expecting_amount(
        operation_type_id: i64,
        description: &'static str,
        expected_amount: Decimal,
    ) -> TransactionService {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(account(id))));

        let mut operation_types = MockOperationTypeRepository::new();
        operation_types
            .expect_find_by_id()
            .with(eq(operation_type_id))
            .returning(move |id| Ok(Some(operation_type(id, description))));

        let mut transactions = MockTransactionRepository::new();
        transactions
            .expect_create()
            .withf(move |tx| tx.amount == expected_amount && tx.account_id == 1)
            .times(1)
            .returning(|tx| Ok(stored(7, tx)));
        transactions
            .expect_find_details_by_id()
            .with(eq(7))
            .times(1)
            .returning(move |id| {
                let new = NewTransaction {
                    account_id: 1,
                    operation_type_id,
                    amount: expected_amount,
                    event_date: Utc::now(),
                };
                Ok(Some(TransactionDetails {
                    transaction: stored(id, &new),
                    account: account(1),
                    operation_type: operation_type(operation_type_id, description),
                }))
            });

        TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(operation_types),
        )
    }

    fn command(account_id: i64, operation_type_id: i64, amount: Decimal) -> CreateTransactionCommand {
        CreateTransactionCommand {
            account_id,
            operation_type_id,
            amount,
        }
    }

    #[tokio::test]
    async fn test_normal_purchase_is_stored_negative() {
        let service = service_expecting_amount(1, "Normal Purchase", dec!(-50.00));
        let details = service.create_transaction(command(1, 1, dec!(50.00))).await.unwrap();

        assert_eq!(details.transaction.id, 7);
        assert_eq!(details.transaction.amount, dec!(-50.00));
        assert_eq!(details.operation_type.description, "Normal Purchase");
    }

    #[tokio::test]
    async fn test_installments_and_withdrawal_are_stored_negative() {
        let service = service_expecting_amount(2, "Purchase with installments", dec!(-23.50));
        service.create_transaction(command(1, 2, dec!(23.50))).await.unwrap();

        let service = service_expecting_amount(3, "Withdrawal", dec!(-18.70));
        service.create_transaction(command(1, 3, dec!(18.70))).await.unwrap();
    }

    #[tokio::test]
    async fn test_amount_is_rounded_to_cents_before_signing() {
        let service = service_expecting_amount(1, "Normal Purchase", dec!(-10.01));
        service.create_transaction(command(1, 1, dec!(10.005))).await.unwrap();
    }

    #[tokio::test]
    async fn test_credit_voucher_is_stored_as_given() {
        let service = service_expecting_amount(4, "Credit Voucher", dec!(50.00));
        let details = service.create_transaction(command(1, 4, dec!(50.00))).await.unwrap();

        assert_eq!(details.transaction.amount, dec!(50.00));
        assert_eq!(details.account.id, 1);
    }

    #[tokio::test]
    async fn test_unknown_account_persists_nothing() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|_| Ok(None));
        let mut operation_types = MockOperationTypeRepository::new();
        operation_types.expect_find_by_id().never();
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_create().never();

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(operation_types),
        );
        let err = service
            .create_transaction(command(404, 1, dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound(404)));
    }

    #[tokio::test]
    async fn test_unknown_operation_type_persists_nothing() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|id| Ok(Some(account(id))));
        let mut operation_types = MockOperationTypeRepository::new();
        operation_types.expect_find_by_id().returning(|_| Ok(None));
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_create().never();

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(operation_types),
        );
        let err = service
            .create_transaction(command(1, 99, dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::OperationTypeNotFound(99)));
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_before_lookup() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().never();
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_create().never();

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(MockOperationTypeRepository::new()),
        );

        for amount in [dec!(0), dec!(-5.00), dec!(0.004), dec!(10000000000000000)] {
            let err = service
                .create_transaction(command(1, 1, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_missing_row_after_insert_is_internal() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|id| Ok(Some(account(id))));
        let mut operation_types = MockOperationTypeRepository::new();
        operation_types
            .expect_find_by_id()
            .returning(|id| Ok(Some(operation_type(id, "Withdrawal"))));
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_create().returning(|tx| Ok(stored(3, tx)));
        transactions.expect_find_details_by_id().returning(|_| Ok(None));

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(operation_types),
        );
        let err = service
            .create_transaction(command(1, 3, dec!(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_list_for_unknown_account_is_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|_| Ok(None));
        let mut transactions = MockTransactionRepository::new();
        transactions.expect_find_details_by_account().never();

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(MockOperationTypeRepository::new()),
        );
        let err = service.list_account_transactions(5).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_for_account_delegates_to_repository() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|id| Ok(Some(account(id))));
        let mut transactions = MockTransactionRepository::new();
        transactions
            .expect_find_details_by_account()
            .with(eq(1))
            .returning(|_| Ok(Vec::new()));

        let service = TransactionService::new(
            Arc::new(transactions),
            Arc::new(accounts),
            Arc::new(MockOperationTypeRepository::new()),
        );

        assert!(service.list_account_transactions(1).await.unwrap().is_empty());
    }
}
