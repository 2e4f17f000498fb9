use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, FieldError};
use crate::models::{Account, OperationType, TransactionDetails};

/// Envelope for every error body: `{"error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorResponse,
}

/// Error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Validation error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

impl From<FieldError> for ValidationErrorDetail {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed: {}", self);
        }

        let mut response = ErrorResponse::new(self.code(), self.public_message());
        if let AppError::InvalidRequest { details } = self {
            response = response.with_details(details.into_iter().map(Into::into).collect());
        }

        (status, Json(ErrorBody { error: response })).into_response()
    }
}

/// Liveness body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Account response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account_id: i64,
    pub document_number: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            document_number: account.document_number,
        }
    }
}

/// Account as embedded in a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: i64,
    pub document_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            document_number: account.document_number,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Operation type as embedded in a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationTypeSummary {
    pub operation_type_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OperationType> for OperationTypeSummary {
    fn from(operation_type: OperationType) -> Self {
        Self {
            operation_type_id: operation_type.id,
            description: operation_type.description,
            created_at: operation_type.created_at,
            updated_at: operation_type.updated_at,
        }
    }
}

/// Transaction response DTO. `amount` carries the stored sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: i64,
    pub account_id: i64,
    pub operation_type_id: i64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub account: AccountSummary,
    pub operation_type: OperationTypeSummary,
}

impl From<TransactionDetails> for TransactionResponse {
    fn from(details: TransactionDetails) -> Self {
        let transaction = details.transaction;
        Self {
            transaction_id: transaction.id,
            account_id: transaction.account_id,
            operation_type_id: transaction.operation_type_id,
            amount: transaction.amount,
            event_date: transaction.event_date,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
            account: details.account.into(),
            operation_type: details.operation_type.into(),
        }
    }
}
