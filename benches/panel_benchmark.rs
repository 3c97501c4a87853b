/// Benchmarks for building dashboard panels and rasterizing charts.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use repocast::app::dashboard_panels;
use repocast::catalog::DEFAULT_REPOSITORY;
use repocast::plotting::{bar_chart, render_chart, stacked_bar_chart};
use repocast::types::{AnalyticsResult, DataPoint, NamedSeries};
use repocast::utils::downsample;

/// Two years of weekly points, with closed issues missing every third week
fn synthetic_result() -> AnalyticsResult {
    let weeks: Vec<DataPoint> = (0..104)
        .map(|w| DataPoint::new(format!("W{w:03}"), (w * 37 % 200) as u64))
        .collect();
    let closed: Vec<DataPoint> = weeks
        .iter()
        .filter(|p| !p.label.ends_with('0'))
        .map(|p| DataPoint::new(p.label.clone(), p.count / 2))
        .collect();

    AnalyticsResult {
        created: weeks.clone(),
        closed_week: closed.clone(),
        star_count: weeks.clone(),
        fork_count: weeks.clone(),
        stacked: vec![
            NamedSeries {
                name: "Created".to_string(),
                data: weeks,
            },
            NamedSeries {
                name: "Closed".to_string(),
                data: closed,
            },
        ],
        ..Default::default()
    }
}

fn bench_panels(c: &mut Criterion) {
    let result = synthetic_result();
    let mut group = c.benchmark_group("panels");

    group.bench_function("dashboard_panels", |b| {
        b.iter(|| dashboard_panels(black_box(&DEFAULT_REPOSITORY), black_box(&result)))
    });

    group.bench_function("stacked_alignment", |b| {
        b.iter(|| stacked_bar_chart("stacked", black_box(&result.stacked)))
    });

    let long: Vec<DataPoint> = (0..5_000)
        .map(|i| DataPoint::new(format!("D{i}"), i as u64 % 97))
        .collect();
    let long_spec = bar_chart("long", &long);
    group.bench_function("downsample_5000", |b| {
        b.iter(|| downsample(black_box(&long_spec), 500))
    });

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let result = synthetic_result();
    let mut group = c.benchmark_group("rendering");
    group.sample_size(20);

    let bars = bar_chart("Weekly Closed Issues", &result.closed_week);
    group.bench_function("render_bar_chart", |b| {
        b.iter(|| render_chart(black_box(&bars), 960, 420))
    });

    let stacked = stacked_bar_chart("Created and Closed Issues", &result.stacked);
    group.bench_function("render_stacked_chart", |b| {
        b.iter(|| render_chart(black_box(&stacked), 960, 420))
    });

    group.finish();
}

criterion_group!(benches, bench_panels, bench_rendering);
criterion_main!(benches);
