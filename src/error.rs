use http::StatusCode;
use thiserror::Error;

/// Postgres SQLSTATE raised when a unique index rejects a row.
const UNIQUE_VIOLATION: &str = "23505";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Request validation failed")]
    InvalidRequest { details: Vec<FieldError> },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Account '{0}' not found")]
    AccountNotFound(i64),

    #[error("Operation type '{0}' not found")]
    OperationTypeNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::Conflict(db_err.message().to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidRequest { .. }
            | AppError::Conflict(_)
            | AppError::AccountNotFound(_)
            | AppError::OperationTypeNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest { .. } => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AppError::OperationTypeNotFound(_) => "OPERATION_TYPE_NOT_FOUND",
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients. Internal failures stay opaque.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct UniqueViolation;

    impl fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl StdError for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"idx_accounts_document_number_active\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(UNIQUE_VIOLATION))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = AppError::from(sqlx::Error::Database(Box::new(UniqueViolation)));

        assert!(matches!(err, AppError::Conflict(ref message) if message.contains("duplicate key")));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(AppError::Validation("bad".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AccountNotFound(9).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OperationTypeNotFound(9).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::NotFound("Account '3' not found".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.public_message(), "Account '3' not found");
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.public_message(), "An internal error occurred");

        let err = AppError::Internal(anyhow::anyhow!("pool exhausted"));
        assert_eq!(err.public_message(), "An internal error occurred");
    }

    #[test]
    fn test_non_constraint_sqlx_error_stays_database() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_reference_errors_name_the_id() {
        assert_eq!(AppError::AccountNotFound(42).to_string(), "Account '42' not found");
        assert_eq!(
            AppError::OperationTypeNotFound(7).to_string(),
            "Operation type '7' not found"
        );
    }
}
