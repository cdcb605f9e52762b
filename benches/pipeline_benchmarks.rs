//! Performance benchmarks for the receipt engine.
//!
//! Covers the pure stages (parsing, building, correction, splitting) and one
//! end-to-end request through the HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use receipt_engine::api::{AppState, create_router};
use receipt_engine::config::ConfigLoader;
use receipt_engine::extraction::{RecordBuilder, parse_model_response};
use receipt_engine::models::{LineItem, Money, ReceiptRecord};
use receipt_engine::pipeline::{BoxError, PreparedImage, ReceiptPipeline};
use receipt_engine::reconciliation::{DEFAULT_RECONCILIATION_TOLERANCE, correct_record};
use receipt_engine::split::{Claim, split_bill};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Builds model text for a receipt with `item_count` items whose tip is missing.
fn model_text_with_items(item_count: usize) -> String {
    let items: Vec<serde_json::Value> = (0..item_count)
        .map(|i| {
            serde_json::json!({
                "name": format!("Dish {}", i + 1),
                "quantity": 1,
                "unit_price": "$12.50",
                "total_price": "$12.50"
            })
        })
        .collect();
    let subtotal = Decimal::new(1250, 2) * Decimal::from(item_count as u64);
    let tax = subtotal * Decimal::new(9, 2);
    let total = subtotal + tax + Decimal::from(5);

    let payload = serde_json::json!({
        "restaurant_name": "Bench Bistro",
        "date": "2026-01-15",
        "items": items,
        "subtotal": subtotal.to_string(),
        "tax": tax.round_dp(2).to_string(),
        "tip": 0,
        "total": total.round_dp(2).to_string(),
        "confidence_score": 0.9
    });
    format!("Here is the receipt:\n```json\n{}\n```", payload)
}

fn record_with_items(item_count: usize) -> ReceiptRecord {
    let items: Vec<LineItem> = (0..item_count)
        .map(|i| LineItem::new(format!("Dish {}", i + 1), 1, Money::from(12), Money::from(12)))
        .collect();
    let subtotal: Money = items.iter().map(|item| item.total_price).sum();
    ReceiptRecord {
        restaurant_name: "Bench Bistro".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or_default(),
        items,
        subtotal,
        tax: Money::from(3),
        tip: Money::from(7),
        total: subtotal + Money::from(13),
        confidence_score: 0.9,
        provenance_text: String::new(),
    }
}

/// Benchmark: Extracting and building a record from model text.
fn bench_parse_and_build(c: &mut Criterion) {
    let builder = RecordBuilder::default();
    let mut group = c.benchmark_group("parse_and_build");

    for item_count in [1usize, 10, 50] {
        let text = model_text_with_items(item_count);
        group.throughput(Throughput::Elements(item_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(item_count), &text, |b, text| {
            b.iter(|| {
                let payload = parse_model_response(black_box(text)).unwrap();
                black_box(builder.build(&payload, text))
            })
        });
    }

    group.finish();
}

/// Benchmark: Proportional correction of an inconsistent record.
fn bench_correction(c: &mut Criterion) {
    let record = record_with_items(10);

    c.bench_function("correct_proportional", |b| {
        b.iter(|| {
            let mut record = record.clone();
            black_box(correct_record(&mut record, DEFAULT_RECONCILIATION_TOLERANCE))
        })
    });
}

/// Benchmark: Splitting a receipt among several participants.
fn bench_split(c: &mut Criterion) {
    let record = record_with_items(20);
    let claims: Vec<Claim> = (0..20)
        .flat_map(|i| {
            [
                Claim::new(format!("p{}", i % 4), i, Decimal::new(5, 1)),
                Claim::new(format!("p{}", (i + 1) % 4), i, Decimal::new(5, 1)),
            ]
        })
        .collect();

    c.bench_function("split_20_items_4_people", |b| {
        b.iter(|| black_box(split_bill(black_box(&record), black_box(&claims)).unwrap()))
    });
}

/// Benchmark: One text request through the router.
fn bench_text_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/pipeline.yaml")
        .expect("Failed to load config")
        .into_config();
    let model = |_image: &PreparedImage| -> Result<String, BoxError> { Err("unused".into()) };
    let router = create_router(AppState::new(ReceiptPipeline::new(config, Arc::new(model))));
    let body = serde_json::json!({ "response_text": model_text_with_items(10) }).to_string();

    c.bench_function("text_endpoint_10_items", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/receipts/text")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_parse_and_build,
    bench_correction,
    bench_split,
    bench_text_endpoint
);
criterion_main!(benches);
