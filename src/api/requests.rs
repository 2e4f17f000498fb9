use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{is_valid_amount, is_valid_document_number, max_amount};

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(custom = "validate_document_number")]
    pub document_number: String,
}

/// Request to record a transaction. `amount` is always sent positive.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    #[validate(range(min = 1, message = "account_id must be a positive integer"))]
    pub account_id: i64,
    #[validate(range(min = 1, message = "operation_type_id must be a positive integer"))]
    pub operation_type_id: i64,
    #[validate(custom = "validate_amount")]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

fn validate_document_number(document_number: &str) -> Result<(), ValidationError> {
    if is_valid_document_number(document_number) {
        Ok(())
    } else {
        let mut error = ValidationError::new("document_number");
        error.message = Some(Cow::from("document_number must be exactly 11 digits"));
        Err(error)
    }
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if is_valid_amount(*amount) {
        return Ok(());
    }

    let mut error = ValidationError::new("amount");
    let message = if *amount > max_amount() {
        format!("amount must not exceed {}", max_amount())
    } else {
        "amount must be greater than zero".to_string()
    };
    error.message = Some(Cow::from(message));
    Err(error)
}
