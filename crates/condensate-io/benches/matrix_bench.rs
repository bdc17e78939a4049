// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Matrix I/O Benchmarks
// ─────────────────────────────────────────────────────────────────────

use std::io::sink;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex64;

use condensate_io::{
    read_matrix_from, write_history_to, write_matrix_to, HistoryRecord, MatrixLayout, MatrixWindow,
};

fn field(n: usize) -> Vec<Complex64> {
    (0..n * n)
        .map(|i| Complex64::from_polar(1.0 / (1.0 + i as f64), i as f64 * 0.01))
        .collect()
}

// ── Matrix codec ────────────────────────────────────────────────────

fn bench_write_400(c: &mut Criterion) {
    let layout = MatrixLayout::square(400, 100.0, 200.0 / 399.0);
    let buffer = field(400);
    let window = MatrixWindow::full(&layout);
    c.bench_function("write_matrix_400x400_complex", |b| {
        b.iter(|| write_matrix_to(&mut sink(), black_box(&buffer), &layout, &window))
    });
}

fn bench_read_400(c: &mut Criterion) {
    let layout = MatrixLayout::square(400, 100.0, 200.0 / 399.0);
    let buffer = field(400);
    let mut text = Vec::new();
    let _ = write_matrix_to(&mut text, &buffer, &layout, &MatrixWindow::full(&layout));
    let mut target = vec![Complex64::new(0.0, 0.0); buffer.len()];
    c.bench_function("read_matrix_400x400_complex", |b| {
        b.iter(|| read_matrix_from(black_box(text.as_slice()), &mut target, "bench"))
    });
}

// ── History ─────────────────────────────────────────────────────────

fn bench_history_downsample(c: &mut Criterion) {
    let mut record = HistoryRecord::new();
    for _ in 0..2000 {
        record.push(field(20));
    }
    c.bench_function("write_history_2000x400", |b| {
        b.iter(|| write_history_to(&mut sink(), black_box(&record), 200, 200))
    });
}

criterion_group!(
    benches,
    bench_write_400,
    bench_read_400,
    bench_history_downsample,
);
criterion_main!(benches);
