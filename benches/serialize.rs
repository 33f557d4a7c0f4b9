//! Benchmarks for worksheet serialization.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::expect_fun_call,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlsheet::{Worksheet, WorksheetOptions};

/// Fill `rows x cols` with alternating numbers, repeated strings and formulas.
fn fill(ws: &mut Worksheet, rows: u32, cols: u32) {
    for row in 0..rows {
        for col in 0..cols {
            match col % 3 {
                0 => ws.write_number(row, col, f64::from(row * cols + col), None),
                1 => ws.write_string(row, col, &format!("item {}", row % 100), None),
                _ => ws.write_formula(row, col, &format!("=A{}*2", row + 1), None, None),
            }
            .expect("Failed to write cell");
        }
    }
}

fn sheet(constant_memory: bool) -> Worksheet {
    Worksheet::new(WorksheetOptions {
        constant_memory,
        ..WorksheetOptions::default()
    })
    .expect("Failed to create worksheet")
}

/// Store and assemble a buffered sheet
fn bench_buffered(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffered");
    for rows in [100u32, 1_000, 10_000] {
        group.throughput(Throughput::Elements(u64::from(rows) * 10));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut ws = sheet(false);
                fill(&mut ws, rows, 10);
                black_box(ws.assemble_xml().expect("Failed to assemble"))
            })
        });
    }
    group.finish();
}

/// Same data through the spill file
fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    for rows in [100u32, 1_000, 10_000] {
        group.throughput(Throughput::Elements(u64::from(rows) * 10));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut ws = sheet(true);
                fill(&mut ws, rows, 10);
                black_box(ws.assemble_xml().expect("Failed to assemble"))
            })
        });
    }
    group.finish();
}

/// Assemble only, on a sheet with overlays
fn bench_assemble_overlays(c: &mut Criterion) {
    let mut ws = sheet(false);
    fill(&mut ws, 2_000, 10);
    for row in (0..2_000).step_by(20) {
        ws.merge_range(row, 10, row, 12, "merged", None)
            .expect("Failed to merge");
        ws.write_url(row, 13, &format!("http://example.com/{row}"), None, None, None)
            .expect("Failed to write url");
    }
    ws.autofilter(0, 0, 1_999, 9).expect("Failed to add autofilter");
    ws.freeze_panes(1, 0, None, None).expect("Failed to freeze");

    let size = ws.assemble_xml().expect("Failed to assemble").len();
    let mut group = c.benchmark_group("overlays");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("assemble_2000x14", |b| {
        b.iter(|| black_box(ws.assemble_xml().expect("Failed to assemble")))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_buffered,
    bench_streaming,
    bench_assemble_overlays
);
criterion_main!(benches);
