//! In-memory repositories for exercising services and the router without PostgreSQL.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{Account, NewTransaction, OperationCategory, OperationType, Transaction, TransactionDetails};
use crate::repositories::{AccountRepository, OperationTypeRepository, TransactionRepository};
use crate::services::{AccountService, TransactionService};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    operation_types: Vec<OperationType>,
    transactions: Vec<Transaction>,
}

/// Shared backing tables. Each repository handle sees the same rows.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the four operation types already seeded as ids 1..=4.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut tables = store.lock();
            for (index, category) in OperationCategory::ALL.into_iter().enumerate() {
                let now = Utc::now();
                tables.operation_types.push(OperationType {
                    id: index as i64 + 1,
                    description: category.description().to_string(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                });
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn accounts(&self) -> Arc<InMemoryAccountRepository> {
        Arc::new(InMemoryAccountRepository { store: self.clone() })
    }

    pub fn operation_types(&self) -> Arc<InMemoryOperationTypeRepository> {
        Arc::new(InMemoryOperationTypeRepository { store: self.clone() })
    }

    pub fn transactions(&self) -> Arc<InMemoryTransactionRepository> {
        Arc::new(InMemoryTransactionRepository { store: self.clone() })
    }

    /// Number of stored transactions, deleted or not.
    pub fn transaction_count(&self) -> usize {
        self.lock().transactions.len()
    }

    /// Handler state wired to this store, without metrics or health checks.
    pub fn app_state(&self) -> AppState {
        let account_service = AccountService::new(self.accounts());
        let transaction_service =
            TransactionService::new(self.transactions(), self.accounts(), self.operation_types());
        AppState::new(Arc::new(account_service), Arc::new(transaction_service))
    }
}

pub struct InMemoryAccountRepository {
    store: InMemoryStore,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, document_number: &str) -> Result<Option<Account>> {
        let mut tables = self.store.lock();
        let taken = tables
            .accounts
            .iter()
            .any(|a| !a.is_deleted() && a.document_number == document_number);
        if taken {
            return Ok(None);
        }

        let now = Utc::now();
        let account = Account {
            id: tables.accounts.len() as i64 + 1,
            document_number: document_number.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.accounts.push(account.clone());
        Ok(Some(account))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        Ok(self
            .store
            .lock()
            .accounts
            .iter()
            .find(|a| a.id == id && !a.is_deleted())
            .cloned())
    }
}

pub struct InMemoryOperationTypeRepository {
    store: InMemoryStore,
}

#[async_trait]
impl OperationTypeRepository for InMemoryOperationTypeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<OperationType>> {
        Ok(self
            .store
            .lock()
            .operation_types
            .iter()
            .find(|o| o.id == id && o.deleted_at.is_none())
            .cloned())
    }

    async fn create_if_absent(&self, description: &str) -> Result<bool> {
        let mut tables = self.store.lock();
        if tables.operation_types.iter().any(|o| o.description == description) {
            return Ok(false);
        }

        let now = Utc::now();
        let id = tables.operation_types.len() as i64 + 1;
        tables.operation_types.push(OperationType {
            id,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        Ok(true)
    }

    async fn count(&self) -> Result<i64> {
        let tables = self.store.lock();
        Ok(tables
            .operation_types
            .iter()
            .filter(|o| o.deleted_at.is_none())
            .count() as i64)
    }
}

pub struct InMemoryTransactionRepository {
    store: InMemoryStore,
}

impl InMemoryTransactionRepository {
    fn join(tables: &Tables, transaction: &Transaction) -> Result<TransactionDetails> {
        let account = tables
            .accounts
            .iter()
            .find(|a| a.id == transaction.account_id)
            .cloned()
            .ok_or(AppError::AccountNotFound(transaction.account_id))?;
        let operation_type = tables
            .operation_types
            .iter()
            .find(|o| o.id == transaction.operation_type_id)
            .cloned()
            .ok_or(AppError::OperationTypeNotFound(transaction.operation_type_id))?;

        Ok(TransactionDetails {
            transaction: transaction.clone(),
            account,
            operation_type,
        })
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let mut tables = self.store.lock();
        let now = Utc::now();
        let row = Transaction {
            id: tables.transactions.len() as i64 + 1,
            account_id: transaction.account_id,
            operation_type_id: transaction.operation_type_id,
            amount: transaction.amount,
            event_date: transaction.event_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.transactions.push(row.clone());
        Ok(row)
    }

    async fn find_details_by_id(&self, id: i64) -> Result<Option<TransactionDetails>> {
        let tables = self.store.lock();
        tables
            .transactions
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .map(|t| Self::join(&tables, t))
            .transpose()
    }

    async fn find_details_by_account(&self, account_id: i64) -> Result<Vec<TransactionDetails>> {
        let tables = self.store.lock();
        let mut rows: Vec<&Transaction> = tables
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id && t.deleted_at.is_none())
            .collect();
        rows.sort_by_key(|t| (t.event_date, t.id));

        rows.into_iter().map(|t| Self::join(&tables, t)).collect()
    }
}
