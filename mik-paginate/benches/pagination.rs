//! Benchmarks for token handling and page traversal.
//!
//! Run with: cargo bench -p mik-paginate

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mik_paginate::prelude::*;
use mik_paginate::{Postgres, Statement};
use std::hint::black_box;

// =============================================================================
// Token Benchmarks
// =============================================================================

fn bench_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokens");

    let tokens = [
        ("small", PageToken::new(4, 3)),
        ("text", PageToken::new("2024-01-15T10:30:00Z", 1_234_567)),
        ("float", PageToken::new(99.5, -12)),
    ];

    for (name, token) in &tokens {
        group.bench_with_input(BenchmarkId::new("encode", name), token, |b, t| {
            b.iter(|| black_box(t).encode(&ObfuscatedCodec))
        });

        let encoded = token.encode(&ObfuscatedCodec);
        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, s| {
            b.iter(|| PageToken::decode(black_box(s), &ObfuscatedCodec))
        });
    }

    let oversized = "A".repeat(8 * 1024);
    group.bench_function("decode_oversized", |b| {
        b.iter(|| PageToken::decode(black_box(&oversized), &ObfuscatedCodec))
    });

    group.finish();
}

// =============================================================================
// Traversal Benchmarks
// =============================================================================

fn dataset(rows: i64) -> MemoryQuery {
    MemoryQuery::new((1..=rows).map(|i| {
        Row::new()
            .with("id", i)
            .with("created", i / 3)
            .with("title", format!("post {i}"))
    }))
}

fn bench_cursor_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    for rows in [100_i64, 1_000] {
        let query = dataset(rows);
        let config = CursorConfig::new()
            .primary_sort("created", SortDirection::Descending)
            .backup_sort("id", SortDirection::Descending)
            .limit(25);

        group.bench_with_input(BenchmarkId::new("first_page", rows), &query, |b, q| {
            b.iter(|| paginate_cursor(black_box(q), &config))
        });

        let middle = PageToken::new(rows / 6, rows / 2).encode(&ObfuscatedCodec);
        let after = config.clone().after(middle.clone());
        group.bench_with_input(BenchmarkId::new("after_token", rows), &query, |b, q| {
            b.iter(|| paginate_cursor(black_box(q), &after))
        });

        let before = config.clone().before(middle);
        group.bench_with_input(BenchmarkId::new("before_token", rows), &query, |b, q| {
            b.iter(|| paginate_cursor(black_box(q), &before))
        });
    }

    group.finish();
}

fn bench_offset_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset");
    let query = dataset(1_000);

    for page in [1_i64, 20, 40] {
        let config = OffsetConfig::new()
            .primary_sort("created", "desc")
            .backup_sort("id", "desc")
            .per_page(25)
            .page(page);
        group.bench_with_input(BenchmarkId::new("page", page), &config, |b, cfg| {
            b.iter(|| paginate_offset(&query, black_box(cfg)))
        });
    }

    group.finish();
}

// =============================================================================
// SQL Rendering Benchmarks
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Discard;

impl Connection for Discard {
    type Error = std::io::Error;

    fn fetch_all(&self, _: &Statement) -> Result<Vec<Row>, Self::Error> {
        Ok(Vec::new())
    }
}

fn bench_sql_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql");

    let mut keyset = SqlQuery::new(Postgres, Discard, "posts")
        .fields(&["id", "created", "title"])
        .filter(Predicate::compare("published", Comparison::Eq, "published"))
        .bind("published", true)
        .filter(Predicate::or(vec![
            Predicate::compare("created", Comparison::Lt, "primaryValue"),
            Predicate::and(vec![
                Predicate::compare("created", Comparison::Eq, "primaryValue"),
                Predicate::compare("id", Comparison::Lt, "backupValue"),
            ]),
        ]))
        .bind("primaryValue", 100)
        .bind("backupValue", 301);
    keyset.order_by("created", SortDirection::Descending);
    keyset.add_order_by("id", SortDirection::Descending);
    keyset.set_limit(Some(25));

    group.bench_function("keyset_select", |b| b.iter(|| black_box(&keyset).build()));

    // Discard returns no rows, so only the main statement is rendered
    let config = CursorConfig::new()
        .primary_sort("created", "desc")
        .backup_sort("id", "desc")
        .after("100|301")
        .encode_tokens(false);
    let base = postgres(Discard, "posts");
    group.bench_function("cursor_page", |b| {
        b.iter(|| paginate_cursor(black_box(&base), &config))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokens,
    bench_cursor_pagination,
    bench_offset_pagination,
    bench_sql_rendering,
);

criterion_main!(benches);
