use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics recorder facade for the payment service.
///
/// Recording before `init_metrics` is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Metrics;

impl Metrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_account_created(&self) {
        counter!("payment_accounts_created_total").increment(1);
    }

    pub fn record_account_conflict(&self) {
        counter!("payment_accounts_conflicts_total").increment(1);
    }

    pub fn record_transaction_created(&self, category: &str, sign: &str) {
        counter!("payment_transactions_created_total", "category" => category.to_string(), "sign" => sign.to_string()).increment(1);
    }

    pub fn record_transaction_rejected(&self, reason: &str) {
        counter!("payment_transactions_rejected_total", "reason" => reason.to_string()).increment(1);
    }

    pub fn record_transaction_write_latency(&self, duration_ms: f64) {
        histogram!("payment_transaction_write_duration_ms").record(duration_ms);
    }

    pub fn record_operation_types_seeded(&self, inserted: u64) {
        counter!("payment_operation_types_seeded_total").increment(inserted);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the Prometheus recorder once and returns its handle.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    METRICS.get_or_init(Metrics::new);

    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

fn describe_metrics() {
    describe_counter!("payment_accounts_created_total", Unit::Count, "Total number of accounts created");
    describe_counter!("payment_accounts_conflicts_total", Unit::Count, "Account creations rejected for a duplicate document number");

    describe_counter!("payment_transactions_created_total", Unit::Count, "Total number of transactions created");
    describe_counter!("payment_transactions_rejected_total", Unit::Count, "Transactions rejected before persistence");
    describe_histogram!("payment_transaction_write_duration_ms", Unit::Milliseconds, "Transaction insert and read-back latency in milliseconds");

    describe_counter!("payment_operation_types_seeded_total", Unit::Count, "Operation type rows inserted by startup seeding");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
