use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::extract::ValidatedJson;
use crate::api::requests::{CreateAccountRequest, CreateTransactionRequest};
use crate::api::responses::{
    AccountResponse, ErrorBody, ErrorResponse, HealthResponse, TransactionResponse,
};
use crate::error::AppError;
use crate::services::CreateTransactionCommand;

use super::routes::AppState;

/// Resolves an `{id}` path segment, rejecting anything but a positive integer.
fn positive_id(path: Result<Path<i64>, PathRejection>, what: &str) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) if id > 0 => Ok(id),
        _ => Err(AppError::Validation(format!(
            "{} id must be a positive integer",
            what
        ))),
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Detailed health check with dependency status.
pub async fn detailed_health_check(State(state): State<AppState>) -> Response {
    let Some(checker) = state.health_checker.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody {
                error: ErrorResponse::new("UNAVAILABLE", "Health checker not configured"),
            }),
        )
            .into_response();
    };

    let health = checker.check_all().await;
    let status = if health.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(health)).into_response()
}

/// Readiness check endpoint.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.health_checker.as_ref() {
        Some(checker) if !checker.is_ready().await => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus scrape endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics_handle.as_ref() {
        Some(handle) => (
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// Account Handlers
// ============================================================================

/// Create a new account.
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = state
        .account_service
        .create_account(&request.document_number)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Get account by ID.
pub async fn get_account(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let id = positive_id(path, "Account")?;
    let account = state.account_service.get_account(id).await?;

    Ok(Json(AccountResponse::from(account)))
}

/// List an account's transactions, oldest first.
pub async fn list_account_transactions(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let id = positive_id(path, "Account")?;
    let transactions = state
        .transaction_service
        .list_account_transactions(id)
        .await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

// ============================================================================
// Transaction Handlers
// ============================================================================

/// Record a transaction.
pub async fn create_transaction(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let details = state
        .transaction_service
        .create_transaction(CreateTransactionCommand {
            account_id: request.account_id,
            operation_type_id: request.operation_type_id,
            amount: request.amount,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(details))))
}
