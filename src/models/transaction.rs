use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Account, AmountSign, OperationType};

/// Decimal places kept by the `amount` column.
pub const AMOUNT_SCALE: u32 = 2;

/// Rounds to cents, half away from zero, the way NUMERIC(18, 2) stores it.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest value a NUMERIC(18, 2) column holds.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999_999_999, AMOUNT_SCALE)
}

/// Whether a client-supplied amount is storable once rounded to cents.
pub fn is_valid_amount(amount: Decimal) -> bool {
    let rounded = round_amount(amount);
    rounded > Decimal::ZERO && rounded <= max_amount()
}

/// A signed money movement against an account. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub operation_type_id: i64,
    /// Signed amount as stored. Negative for debits.
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert payload for a transaction. The amount is already signed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: i64,
    pub operation_type_id: i64,
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

impl NewTransaction {
    /// Builds an insert payload, signing a positive `amount` for `operation_type`.
    pub fn signed(
        account_id: i64,
        operation_type: &OperationType,
        amount: Decimal,
        event_date: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            operation_type_id: operation_type.id,
            amount: operation_type.amount_sign().apply(amount),
            event_date,
        }
    }

    pub fn sign(&self) -> AmountSign {
        if self.amount.is_sign_negative() {
            AmountSign::Debit
        } else {
            AmountSign::Credit
        }
    }
}

/// A transaction read back together with its account and operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: Transaction,
    pub account: Account,
    pub operation_type: OperationType,
}

/// Flat row produced by the transaction/account/operation type join.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionDetailsRow {
    pub id: i64,
    pub account_id: i64,
    pub operation_type_id: i64,
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub account_document_number: String,
    pub account_created_at: DateTime<Utc>,
    pub account_updated_at: DateTime<Utc>,
    pub account_deleted_at: Option<DateTime<Utc>>,
    pub operation_type_description: String,
    pub operation_type_created_at: DateTime<Utc>,
    pub operation_type_updated_at: DateTime<Utc>,
    pub operation_type_deleted_at: Option<DateTime<Utc>>,
}

impl From<TransactionDetailsRow> for TransactionDetails {
    fn from(row: TransactionDetailsRow) -> Self {
        Self {
            account: Account {
                id: row.account_id,
                document_number: row.account_document_number,
                created_at: row.account_created_at,
                updated_at: row.account_updated_at,
                deleted_at: row.account_deleted_at,
            },
            operation_type: OperationType {
                id: row.operation_type_id,
                description: row.operation_type_description,
                created_at: row.operation_type_created_at,
                updated_at: row.operation_type_updated_at,
                deleted_at: row.operation_type_deleted_at,
            },
            transaction: Transaction {
                id: row.id,
                account_id: row.account_id,
                operation_type_id: row.operation_type_id,
                amount: row.amount,
                event_date: row.event_date,
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_at: row.deleted_at,
            },
        }
    }
}
