use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rolling_window::{rolling_mean, rolling_std, Ddof};

fn price_series(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 1000.0 + (i as f64 * 0.37).sin() * 25.0 + i as f64 * 0.1)
        .collect()
}

fn bench_rolling(c: &mut Criterion) {
    let prices = price_series(5_000);

    c.bench_function("rolling_mean_50", |b| {
        b.iter(|| rolling_mean(black_box(&prices), 50, 1))
    });

    c.bench_function("rolling_std_30_sample", |b| {
        b.iter(|| rolling_std(black_box(&prices), 30, 2, Ddof::Sample))
    });
}

criterion_group!(benches, bench_rolling);
criterion_main!(benches);
