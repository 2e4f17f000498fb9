use std::sync::Arc;

use anyhow::Context;
use payment_service::api::{create_router, AppState};
use payment_service::config::Settings;
use payment_service::db;
use payment_service::observability::{init_logging, init_metrics, HealthChecker};
use payment_service::repositories::{
    PgAccountRepository, PgOperationTypeRepository, PgTransactionRepository,
};
use payment_service::services::{seed_operation_types, AccountService, TransactionService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // Initialize logging
    init_logging(&settings.application.log_config());
    info!("Configuration loaded");

    let metrics_handle = if settings.application.metrics_enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    // Connect to PostgreSQL
    info!("Connecting to database...");
    let pool = db::create_pool(&settings.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    db::run_migrations(&pool).await?;
    info!("Migrations applied successfully");

    let accounts = Arc::new(PgAccountRepository::new(pool.clone()));
    let operation_types = Arc::new(PgOperationTypeRepository::new(pool.clone()));
    let transactions = Arc::new(PgTransactionRepository::new(pool.clone()));

    let report = seed_operation_types(operation_types.as_ref()).await?;
    info!(
        inserted = report.inserted,
        total = report.total,
        "Operation types ready"
    );

    let account_service = AccountService::new(accounts.clone());
    let transaction_service = TransactionService::new(transactions, accounts, operation_types);

    let mut state = AppState::new(Arc::new(account_service), Arc::new(transaction_service))
        .with_health_checker(Arc::new(HealthChecker::new(pool)));
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }

    let app = create_router(state);

    let address = settings.application.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
