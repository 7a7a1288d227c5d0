//! Criterion measurement of turning scanned text cells into display rows.
//! No database is involved; the dataset is generated once per size so the
//! numbers reflect materialization cost only.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_session::QueryResult;
use std::hint::black_box;

const COLUMNS: usize = 8;

/// Resolve the row counts to benchmark, overridable through `BENCH_ROWS`.
fn row_counts() -> Vec<usize> {
    std::env::var("BENCH_ROWS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map_or_else(|| vec![10, 1_000, 10_000], |rows| vec![rows])
}

fn dataset(rows: usize) -> (Vec<String>, Vec<Vec<Option<String>>>) {
    let columns = (0..COLUMNS).map(|c| format!("col_{c}")).collect();
    let data = (0..rows)
        .map(|r| {
            (0..COLUMNS)
                // every third cell is NULL
                .map(|c| ((r + c) % 3 != 0).then(|| format!("value-{r}-{c}")))
                .collect()
        })
        .collect();
    (columns, data)
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    for rows in row_counts() {
        let (columns, data) = dataset(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                let result = QueryResult::from_text_rows(columns.clone(), data.clone())
                    .expect("generated rows match the column count");
                black_box(result)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_materialize);
criterion_main!(benches);
