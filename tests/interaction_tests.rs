use std::sync::{Arc, Mutex};

use chartkit::api::AnimationScheduler;
use chartkit::interaction::{ElementRef, HitMode, PointerEvent, PointerEventKind, SurfaceGeometry};
use chartkit::render::RecordingSurface;
use chartkit::{Chart, ChartConfig, DatasetConfig};

fn hover_chart(surface: &RecordingSurface) -> Chart {
    let config = ChartConfig::new("line")
        .with_labels(vec!["L0".to_owned(), "L1".to_owned(), "L2".to_owned()])
        .with_dataset(
            DatasetConfig::new("series", vec![5.0.into(), 20.0.into(), 10.0.into()])
                .with_colors("rgba(30, 144, 255, 0.4)", "rgb(30, 144, 255)"),
        );
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(surface).expect("update should succeed");
    chart
}

fn point_position(chart: &Chart, index: usize) -> (f64, f64) {
    let model = chart.dataset_meta(0).expect("meta").points[index].model();
    (model.x, model.y)
}

fn mouse_move(x: f64, y: f64) -> PointerEvent {
    PointerEvent {
        kind: PointerEventKind::MouseMove,
        page_x: x,
        page_y: y,
    }
}

#[test]
fn hovering_a_point_applies_the_emphasis_style() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let (x, y) = point_position(&chart, 1);
    let changed = chart
        .handle_event(&mouse_move(x, y), geometry, &mut scheduler)
        .expect("event should succeed");

    assert!(changed);
    let model = chart.dataset_meta(0).expect("meta").points[1].model();
    assert_eq!(model.radius, 4.0);
}

#[test]
fn mouse_out_restores_the_base_style() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let (x, y) = point_position(&chart, 1);
    chart
        .handle_event(&mouse_move(x, y), geometry, &mut scheduler)
        .expect("hover should succeed");

    let out = PointerEvent {
        kind: PointerEventKind::MouseOut,
        page_x: x,
        page_y: y,
    };
    chart
        .handle_event(&out, geometry, &mut scheduler)
        .expect("mouseout should succeed");

    let model = chart.dataset_meta(0).expect("meta").points[1].model();
    assert_eq!(model.radius, 3.0);
}

#[test]
fn hovering_empty_space_changes_nothing() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let changed = chart
        .handle_event(&mouse_move(1.0, 1.0), geometry, &mut scheduler)
        .expect("event should succeed");

    assert!(!changed);
    assert!(!scheduler.is_animating(chart.id()));
}

#[test]
fn unlisted_event_kinds_are_ignored() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    chart.config_mut().options.events = vec![PointerEventKind::Click];
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let (x, y) = point_position(&chart, 1);
    let changed = chart
        .handle_event(&mouse_move(x, y), geometry, &mut scheduler)
        .expect("event should succeed");

    assert!(!changed);
    let model = chart.dataset_meta(0).expect("meta").points[1].model();
    assert_eq!(model.radius, 3.0);
}

#[test]
fn click_reports_the_active_elements() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let seen: Arc<Mutex<Vec<ElementRef>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    chart.set_on_click(Box::new(move |_event, active| {
        sink.lock().expect("lock").extend_from_slice(active);
    }));

    let (x, y) = point_position(&chart, 2);
    let click = PointerEvent {
        kind: PointerEventKind::Click,
        page_x: x,
        page_y: y,
    };
    chart
        .handle_event(&click, geometry, &mut scheduler)
        .expect("click should succeed");

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].dataset_index, 0);
    assert_eq!(seen[0].index, 2);
}

#[test]
fn display_scaling_maps_page_coordinates_to_surface_pixels() {
    let surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    // Surface displayed at half its backing resolution, offset on the page.
    let geometry = SurfaceGeometry {
        left: 100.0,
        top: 50.0,
        display_width: 320.0,
        display_height: 240.0,
        render_width: 640.0,
        render_height: 480.0,
    };

    let (x, y) = point_position(&chart, 1);
    let event = mouse_move(100.0 + x / 2.0, 50.0 + y / 2.0);
    let changed = chart
        .handle_event(&event, geometry, &mut scheduler)
        .expect("event should succeed");

    assert!(changed);
    let model = chart.dataset_meta(0).expect("meta").points[1].model();
    assert_eq!(model.radius, 4.0);
}

#[test]
fn label_lookup_requires_a_direct_hit() {
    let surface = RecordingSurface::new();
    let chart = hover_chart(&surface);

    let (x, y) = point_position(&chart, 1);
    // Same x as the point, but well outside its hit circle.
    assert!(chart.get_elements_at_position(x, y + 60.0).is_empty());
    assert!(!chart.get_elements_at_position(x, y).is_empty());
}

#[test]
fn label_lookup_collects_the_shared_index_across_datasets() {
    let config = ChartConfig::new("line")
        .with_labels(vec!["L0".to_owned(), "L1".to_owned(), "L2".to_owned()])
        .with_dataset(DatasetConfig::new(
            "alpha",
            vec![5.0.into(), 20.0.into(), 10.0.into()],
        ))
        .with_dataset(DatasetConfig::new(
            "beta",
            vec![8.0.into(), 14.0.into(), 2.0.into()],
        ));
    let surface = RecordingSurface::new();
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(&surface).expect("update should succeed");

    let (x, y) = point_position(&chart, 1);
    let hits = chart.get_elements_at_position(x, y);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|hit| hit.index == 1));
    assert_eq!(hits[0].dataset_index, 0);
    assert_eq!(hits[1].dataset_index, 1);
}

#[test]
fn dataset_lookup_matches_on_the_horizontal_band() {
    let surface = RecordingSurface::new();
    let chart = hover_chart(&surface);

    let (x, y) = point_position(&chart, 1);
    // Vertically far from any point, yet x-aligned with one.
    let hits = chart.get_dataset_at_position(x, y + 60.0);
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|hit| hit.dataset_index == 0));

    assert!(chart.get_dataset_at_position(1.0, y).is_empty());
}

#[test]
fn dataset_tooltip_redraws_without_a_direct_hover_hit() {
    let surface = RecordingSurface::new();
    let mut config = ChartConfig::new("line")
        .with_labels(vec!["L0".to_owned(), "L1".to_owned(), "L2".to_owned()])
        .with_dataset(DatasetConfig::new(
            "series",
            vec![5.0.into(), 20.0.into(), 10.0.into()],
        ));
    config.options.tooltips.mode = HitMode::Dataset;
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(&surface).expect("update should succeed");
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    // No point under the pointer, but the x-band puts the whole
    // dataset in the tooltip.
    let (x, y) = point_position(&chart, 1);
    let changed = chart
        .handle_event(&mouse_move(x, y + 60.0), geometry, &mut scheduler)
        .expect("event should succeed");
    assert!(changed);

    let repeated = chart
        .handle_event(&mouse_move(x, y + 60.0), geometry, &mut scheduler)
        .expect("event should succeed");
    assert!(!repeated);
}

#[test]
fn tooltip_shows_title_and_body_after_hover() {
    let mut surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let (x, y) = point_position(&chart, 1);
    chart
        .handle_event(&mouse_move(x, y), geometry, &mut scheduler)
        .expect("hover should succeed");

    surface.reset();
    chart.draw(&mut surface, 1.0).expect("draw should succeed");

    let texts = surface.texts();
    assert!(texts.iter().any(|text| *text == "L1"));
    assert!(texts.iter().any(|text| *text == "series: 20"));
}

#[test]
fn tooltip_disappears_after_mouse_out() {
    let mut surface = RecordingSurface::new();
    let mut chart = hover_chart(&surface);
    let mut scheduler = AnimationScheduler::new();
    let geometry = SurfaceGeometry::simple(640.0, 480.0);

    let (x, y) = point_position(&chart, 1);
    chart
        .handle_event(&mouse_move(x, y), geometry, &mut scheduler)
        .expect("hover should succeed");
    let out = PointerEvent {
        kind: PointerEventKind::MouseOut,
        page_x: x,
        page_y: y,
    };
    chart
        .handle_event(&out, geometry, &mut scheduler)
        .expect("mouseout should succeed");

    surface.reset();
    chart.draw(&mut surface, 1.0).expect("draw should succeed");
    assert!(!surface.texts().iter().any(|text| *text == "series: 20"));
}
