use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Description keywords that mark an operation as money leaving the account.
const DEBIT_KEYWORDS: [&str; 2] = ["purchase", "withdrawal"];

/// Direction in which an operation moves money, relative to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmountSign {
    /// Stored negative.
    Debit,
    /// Stored as given.
    Credit,
}

impl AmountSign {
    /// Classifies an operation type description.
    ///
    /// Case-insensitive substring match: any description containing
    /// "purchase" or "withdrawal" is a debit, everything else a credit.
    /// This is deliberately loose so that reference rows added outside the
    /// seeded set are classified the same way.
    pub fn for_description(description: &str) -> Self {
        let lowered = description.to_lowercase();
        if DEBIT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            AmountSign::Debit
        } else {
            AmountSign::Credit
        }
    }

    /// Applies the sign to a client-supplied positive amount.
    pub fn apply(self, amount: Decimal) -> Decimal {
        match self {
            AmountSign::Debit => -amount,
            AmountSign::Credit => amount,
        }
    }
}

/// The fixed set of operation categories seeded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationCategory {
    NormalPurchase,
    PurchaseWithInstallments,
    Withdrawal,
    CreditVoucher,
}

impl OperationCategory {
    /// Seeding order. A fresh store assigns ids 1 through 4 in this order.
    pub const ALL: [OperationCategory; 4] = [
        OperationCategory::NormalPurchase,
        OperationCategory::PurchaseWithInstallments,
        OperationCategory::Withdrawal,
        OperationCategory::CreditVoucher,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            OperationCategory::NormalPurchase => "Normal Purchase",
            OperationCategory::PurchaseWithInstallments => "Purchase with installments",
            OperationCategory::Withdrawal => "Withdrawal",
            OperationCategory::CreditVoucher => "Credit Voucher",
        }
    }

    pub fn sign(&self) -> AmountSign {
        match self {
            OperationCategory::NormalPurchase
            | OperationCategory::PurchaseWithInstallments
            | OperationCategory::Withdrawal => AmountSign::Debit,
            OperationCategory::CreditVoucher => AmountSign::Credit,
        }
    }

    /// Exact match against the seeded descriptions.
    pub fn from_description(description: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.description() == description)
    }

    /// Label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::NormalPurchase => "normal_purchase",
            OperationCategory::PurchaseWithInstallments => "purchase_with_installments",
            OperationCategory::Withdrawal => "withdrawal",
            OperationCategory::CreditVoucher => "credit_voucher",
        }
    }
}

/// Reference row describing the nature of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OperationType {
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl OperationType {
    pub fn amount_sign(&self) -> AmountSign {
        AmountSign::for_description(&self.description)
    }

    /// The seeded category this row corresponds to, if any.
    pub fn category(&self) -> Option<OperationCategory> {
        OperationCategory::from_description(&self.description)
    }
}
