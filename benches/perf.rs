use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cfb_sim_terminal::api::parse_series_json;
use cfb_sim_terminal::histogram;
use cfb_sim_terminal::series;
use cfb_sim_terminal::state::{SamplesDetail, SeriesResult};

fn margin_samples(n: usize) -> Vec<f64> {
    // Deterministic pseudo-scores spread across a realistic margin range.
    (0..n)
        .map(|i| ((i * 31 + 7) % 97) as f64 - 48.0)
        .collect()
}

fn bench_histogram_bin(c: &mut Criterion) {
    let samples = margin_samples(5_000);
    c.bench_function("histogram_bin", |b| {
        b.iter(|| {
            let bins = histogram::bin(black_box(&samples), histogram::DEFAULT_BIN_COUNT);
            black_box(bins.len());
        })
    });
}

fn bench_series_summarize(c: &mut Criterion) {
    let result = SeriesResult {
        samples: Some(5_000),
        home_win_pct: 0.57,
        samples_detail: Some(SamplesDetail {
            home: margin_samples(5_000),
            away: margin_samples(5_000),
        }),
        ..SeriesResult::default()
    };
    c.bench_function("series_summarize", |b| {
        b.iter(|| {
            let summary = series::summarize(black_box(&result)).unwrap();
            black_box(summary.margin_samples.len());
        })
    });
}

fn bench_series_parse(c: &mut Criterion) {
    c.bench_function("series_parse", |b| {
        b.iter(|| {
            let result = parse_series_json(black_box(SERIES_JSON)).unwrap();
            black_box(result.home_win_pct);
        })
    });
}

criterion_group!(
    perf,
    bench_histogram_bin,
    bench_series_summarize,
    bench_series_parse
);
criterion_main!(perf);

static SERIES_JSON: &str = include_str!("../tests/fixtures/series_result.json");
