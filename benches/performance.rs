use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request},
};
use payment_service::api::create_router;
use payment_service::models::{is_valid_document_number, AmountSign, OperationCategory};
use payment_service::observability::LatencyTimer;
use payment_service::test_utils::InMemoryStore;
use tower::ServiceExt;

fn benchmark_sign_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign_normalization");

    let descriptions: Vec<&str> = OperationCategory::ALL
        .iter()
        .map(|c| c.description())
        .chain(["ATM Withdrawal Fee", "Chargeback Refund"])
        .collect();

    for description in descriptions {
        group.bench_with_input(
            BenchmarkId::new("for_description", description),
            description,
            |b, description| {
                b.iter(|| {
                    let sign = AmountSign::for_description(black_box(description));
                    black_box(sign.apply(Decimal::new(5000, 2)))
                });
            },
        );
    }

    group.finish();
}

fn benchmark_document_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_validation");

    for input in ["12345678900", "1234567890", "1234567890a", "١٢٣٤٥6"] {
        group.bench_with_input(BenchmarkId::new("is_valid", input), input, |b, input| {
            b.iter(|| black_box(is_valid_document_number(black_box(input))));
        });
    }

    group.finish();
}

fn benchmark_create_transaction_request(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let store = InMemoryStore::seeded();
    let app = create_router(store.app_state());

    runtime.block_on(async {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/accounts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"document_number":"12345678900"}"#))
            .expect("request");
        app.clone().oneshot(request).await.expect("create account");
    });

    let mut group = c.benchmark_group("http");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("post_transaction_in_memory", |b| {
        b.to_async(&runtime).iter(|| {
            let app = app.clone();
            async move {
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/transactions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"account_id":1,"operation_type_id":1,"amount":50.00}"#,
                    ))
                    .expect("request");
                black_box(app.oneshot(request).await.expect("response"))
            }
        });
    });

    group.finish();
}

fn benchmark_latency_timer(c: &mut Criterion) {
    c.bench_function("latency_timer_overhead", |b| {
        b.iter(|| {
            let timer = LatencyTimer::new();
            black_box(timer.elapsed_ms())
        });
    });
}

criterion_group!(
    benches,
    benchmark_sign_normalization,
    benchmark_document_validation,
    benchmark_create_transaction_request,
    benchmark_latency_timer,
);
criterion_main!(benches);
