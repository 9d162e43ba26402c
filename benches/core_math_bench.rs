use chartkit::core::{DataValue, Easing, Point, spline_curve};
use chartkit::render::RecordingSurface;
use chartkit::{Chart, ChartConfig, DatasetConfig};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn series_config(len: usize) -> ChartConfig {
    let labels = (0..len).map(|i| format!("L{i}")).collect();
    let data: Vec<DataValue> = (0..len)
        .map(|i| (100.0 + (i as f64 * 0.7).sin() * 40.0).into())
        .collect();
    ChartConfig::new("line")
        .with_labels(labels)
        .with_dataset(DatasetConfig::new("series", data))
}

fn bench_chart_update_1k(c: &mut Criterion) {
    let surface = RecordingSurface::new();
    let mut chart = Chart::new(1920, 1080, series_config(1_000)).expect("chart init");

    c.bench_function("chart_update_1k", |b| {
        b.iter(|| {
            chart.update(black_box(&surface)).expect("update");
        })
    });
}

fn bench_full_frame_draw_1k(c: &mut Criterion) {
    let mut surface = RecordingSurface::new();
    let mut chart = Chart::new(1920, 1080, series_config(1_000)).expect("chart init");
    chart.update(&surface).expect("update");

    c.bench_function("full_frame_draw_1k", |b| {
        b.iter(|| {
            surface.reset();
            chart.draw(black_box(&mut surface), 1.0).expect("draw");
        })
    });
}

fn bench_spline_control_points_10k(c: &mut Criterion) {
    let points: Vec<Point> = (0..10_000)
        .map(|i| Point::new(i as f64, (i as f64 * 0.3).cos() * 50.0))
        .collect();

    c.bench_function("spline_control_points_10k", |b| {
        b.iter(|| {
            for window in points.windows(3) {
                let _ = spline_curve(
                    black_box(window[0]),
                    false,
                    black_box(window[1]),
                    black_box(window[2]),
                    false,
                    0.4,
                );
            }
        })
    });
}

fn bench_easing_sweep(c: &mut Criterion) {
    c.bench_function("easing_sweep", |b| {
        b.iter(|| {
            let mut accumulated = 0.0;
            for step in 0..1_000 {
                let t = step as f64 / 999.0;
                accumulated += Easing::EaseOutQuart.apply(black_box(t));
            }
            black_box(accumulated)
        })
    });
}

criterion_group!(
    benches,
    bench_chart_update_1k,
    bench_full_frame_draw_1k,
    bench_spline_control_points_10k,
    bench_easing_sweep
);
criterion_main!(benches);
