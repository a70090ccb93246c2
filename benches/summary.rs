use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hisab_core::engine::summarize;
use hisab_core::ledger::{Category, CategoryKind, CategoryRef, Ledger, Transaction};

fn build_sample_ledger(txn_count: usize) -> Ledger {
    let mut ledger = Ledger::with_default_categories("Benchmark");
    let category_ids: Vec<String> = ledger.categories.iter().map(|c| c.id.clone()).collect();

    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let category = if idx % 7 == 0 {
            None
        } else {
            Some(CategoryRef::Id(
                category_ids[idx % category_ids.len()].clone(),
            ))
        };
        let kind = if idx % 5 == 0 {
            CategoryKind::Income
        } else {
            CategoryKind::Expense
        };
        ledger.add_transaction(Transaction::new(
            10.0 + (idx % 90) as f64,
            kind,
            category,
            date,
            format!("txn {idx}"),
        ));
    }
    ledger
}

fn bench_summarize(c: &mut Criterion) {
    let small = build_sample_ledger(100);
    let large = build_sample_ledger(10_000);
    let mut wide = build_sample_ledger(10_000);
    for idx in 0..200 {
        wide.add_category(Category::new(
            format!("extra {idx}"),
            CategoryKind::Expense,
            50.0,
        ));
    }

    c.bench_function("summarize 100 txns", |b| {
        b.iter(|| summarize(black_box(&small.categories), black_box(&small.transactions)))
    });
    c.bench_function("summarize 10k txns", |b| {
        b.iter(|| summarize(black_box(&large.categories), black_box(&large.transactions)))
    });
    c.bench_function("summarize 10k txns, 205 categories", |b| {
        b.iter(|| summarize(black_box(&wide.categories), black_box(&wide.transactions)))
    });
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
