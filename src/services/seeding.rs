use crate::error::Result;
use crate::models::OperationCategory;
use crate::observability::get_metrics;
use crate::repositories::OperationTypeRepository;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows written by this run.
    pub inserted: u64,
    /// Non-deleted rows present afterwards.
    pub total: i64,
}

/// Ensures every seeded operation category exists, in `OperationCategory::ALL` order.
///
/// Safe to run on every start; existing descriptions are left untouched.
pub async fn seed_operation_types(repo: &dyn OperationTypeRepository) -> Result<SeedReport> {
    let mut inserted = 0;
    for category in OperationCategory::ALL {
        if repo.create_if_absent(category.description()).await? {
            tracing::debug!(description = category.description(), "Seeded operation type");
            inserted += 1;
        }
    }

    let total = repo.count().await?;
    get_metrics().record_operation_types_seeded(inserted);
    tracing::info!(inserted, total, "Operation types seeded");

    Ok(SeedReport { inserted, total })
}
