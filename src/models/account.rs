use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of digits in an account holder's document number.
pub const DOCUMENT_NUMBER_LEN: usize = 11;

/// Returns true if `value` is exactly eleven ASCII digits.
pub fn is_valid_document_number(value: &str) -> bool {
    value.len() == DOCUMENT_NUMBER_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// An account holder, keyed by a unique document number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub document_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tombstone. Deleted accounts release their document number.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
