//! Criterion benchmarks for the layout state codec.
//!
//! `are_different` runs on every grid change event before a save is
//! scheduled, so it has to stay cheap for wide grids.
//!
//! Run with:
//! ```bash
//! cargo bench --package layout-sync-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use layout_sync_core::{are_different, normalize};
use serde_json::{json, Value};

// ── Fixture builders ──────────────────────────────────────────────────────────

/// Builds a grid state with `n` columns plus sort and filter models.
fn build_state_with_n_columns(n: usize) -> Value {
    let columns: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "colId": format!("col-{i}"),
                "width": 80 + i,
                "hide": i % 3 == 0,
                "pinned": null,
                "sort": if i == 0 { json!("asc") } else { Value::Null },
                "flex": 1,
                "aggFunc": null,
            })
        })
        .collect();
    json!({
        "columnState": columns,
        "sortModel": [{ "colId": "col-0", "sort": "asc" }],
        "filterModel": { "col-1": { "type": "contains", "filter": "abc" } },
    })
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for n in [10usize, 50, 200] {
        let state = build_state_with_n_columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, s| {
            b.iter(|| normalize(black_box(s)))
        });
    }
    group.finish();
}

fn bench_are_different(c: &mut Criterion) {
    let mut group = c.benchmark_group("are_different");
    for n in [10usize, 50, 200] {
        let a = build_state_with_n_columns(n);
        let mut b = a.clone();
        // Swap the last two columns: a reorder, detected only at the tail.
        if let Some(cols) = b["columnState"].as_array_mut() {
            cols.swap(n - 1, n - 2);
        }
        group.bench_with_input(BenchmarkId::new("reorder", n), &(a.clone(), b), |bench, (x, y)| {
            bench.iter(|| are_different(black_box(x), black_box(y)))
        });
        group.bench_with_input(BenchmarkId::new("identical", n), &a, |bench, x| {
            bench.iter(|| are_different(black_box(x), black_box(x)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_are_different);
criterion_main!(benches);
