//! Line Rendering Benchmarks
//!
//! Measures the layout engine across line widths and widget mixes, and the
//! template renderer on its own.

use progressline_core::format::render;
use progressline_core::widgets::{
    AdaptiveEta, AdaptiveTransferSpeed, Bar, BouncingBar, Eta, FormatLabel, Percentage,
};
use progressline_core::{ExtraData, ProgressSnapshot, Widget, render_line};
use progressline_test_utils::SnapshotBuilder;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn snapshot() -> ProgressSnapshot {
    SnapshotBuilder::new()
        .value(4_200.0)
        .max_value(10_000.0)
        .elapsed(37.5)
        .updates(420)
        .build()
}

/// Benchmark the default percentage/bar/ETA line at several widths
fn bench_line_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_widths");
    let widgets: Vec<Widget> = vec![
        Percentage::new().into(),
        " ".into(),
        Bar::new().into(),
        " ".into(),
        Eta::new().into(),
    ];
    let snapshot = snapshot();

    for &width in &[40usize, 80, 200, 1000] {
        group.bench_with_input(BenchmarkId::new("default", width), &width, |b, &width| {
            let mut extra = ExtraData::new();
            b.iter(|| {
                let line = render_line(&widgets, width, &snapshot, &mut extra).unwrap();
                black_box(line);
            });
        });
    }

    group.finish();
}

/// Benchmark widget mixes, including the sampling widgets
fn bench_widget_mixes(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget_mixes");
    let mixes: Vec<(&str, Vec<Widget>)> = vec![
        (
            "transfer",
            vec![
                Percentage::new().into(),
                " ".into(),
                Bar::new().into(),
                " ".into(),
                AdaptiveTransferSpeed::new().into(),
                " ".into(),
                AdaptiveEta::new().into(),
            ],
        ),
        (
            "bounce",
            vec![BouncingBar::new().into(), " ".into(), BouncingBar::new().into()],
        ),
        (
            "label",
            vec![
                FormatLabel::new("{value}/{max} after {elapsed}").into(),
                " ".into(),
                Bar::new().into(),
            ],
        ),
    ];
    let snapshot = snapshot();

    for (name, widgets) in &mixes {
        group.bench_with_input(BenchmarkId::new("render", name), widgets, |b, widgets| {
            let mut extra = ExtraData::new();
            b.iter(|| {
                let line = render_line(widgets, 120, &snapshot, &mut extra).unwrap();
                black_box(line);
            });
        });
    }

    group.finish();
}

/// Benchmark template rendering against the full field set
fn bench_template(c: &mut Criterion) {
    let fields = snapshot().fields();

    c.bench_function("template_render", |b| {
        b.iter(|| {
            let text = render(
                black_box("{percentage:3d}% {value:>8.1f} of {max_value:d} [{time_elapsed}]"),
                &fields,
            )
            .unwrap();
            black_box(text);
        });
    });
}

criterion_group!(benches, bench_line_widths, bench_widget_mixes, bench_template);
criterion_main!(benches);
