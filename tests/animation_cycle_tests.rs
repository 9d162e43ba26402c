use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chartkit::api::{AnimationScheduler, FRAME_DURATION_MS};
use chartkit::render::RecordingSurface;
use chartkit::{Chart, ChartConfig, DatasetConfig};

fn animated_chart(surface: &RecordingSurface) -> Chart {
    let config = ChartConfig::new("line")
        .with_labels(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        .with_dataset(DatasetConfig::new(
            "series",
            vec![1.0.into(), 5.0.into(), 3.0.into()],
        ));
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(surface).expect("update should succeed");
    chart
}

#[test]
fn full_render_cycle_completes() {
    let mut surface = RecordingSurface::new();
    let mut chart = animated_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    let progress: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let progress_sink = Arc::clone(&progress);
    chart.set_on_progress(Box::new(move |event| {
        progress_sink.lock().expect("lock").push(event.progress);
    }));

    let completions = Arc::new(AtomicUsize::new(0));
    let completion_sink = Arc::clone(&completions);
    chart.set_on_complete(Box::new(move |_event| {
        completion_sink.fetch_add(1, Ordering::SeqCst);
    }));

    assert!(chart.render(&mut scheduler, 500, false));

    let mut now = 0.0;
    let mut frames = 0;
    while scheduler.has_animations() {
        for event in scheduler.tick(now) {
            chart
                .apply_frame(&mut surface, &event)
                .expect("frame should succeed");
        }
        now += FRAME_DURATION_MS;
        frames += 1;
        assert!(frames < 100, "animation should finish promptly");
    }

    // 500ms at 16.66ms a step rounds up to 31 frames.
    assert_eq!(frames, 31);
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    let progress = progress.lock().expect("lock");
    assert_eq!(progress.len(), frames);
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*progress.last().expect("at least one frame"), 1.0);
}

#[test]
fn zero_duration_render_draws_immediately() {
    let mut surface = RecordingSurface::new();
    let mut chart = animated_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    assert!(!chart.render(&mut scheduler, 0, false));
    assert!(!scheduler.has_animations());

    // The host draws at full ease when no animation was queued.
    chart.draw(&mut surface, 1.0).expect("draw should succeed");
    assert!(surface.arc_count() >= 3);
}

#[test]
fn frames_for_other_charts_leave_the_surface_untouched() {
    let mut surface = RecordingSurface::new();
    let mut first = animated_chart(&surface);
    let mut second = animated_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    assert!(second.render(&mut scheduler, 100, false));
    let events = scheduler.tick(0.0);
    assert_eq!(events.len(), 1);

    surface.reset();
    first
        .apply_frame(&mut surface, &events[0])
        .expect("frame should succeed");
    assert_eq!(surface.count(|_| true), 0);
}

#[test]
fn rescheduling_mid_flight_restarts_from_the_pivot() {
    let mut surface = RecordingSurface::new();
    let mut chart = animated_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    assert!(chart.render(&mut scheduler, 1000, false));
    let events = scheduler.tick(0.0);
    chart
        .apply_frame(&mut surface, &events[0])
        .expect("frame should succeed");
    assert!(events[0].progress < 0.1);

    // A new render takes over the queue slot.
    assert!(chart.render(&mut scheduler, 100, false));
    let mut now = FRAME_DURATION_MS;
    let mut frames = 0;
    while scheduler.has_animations() {
        scheduler.tick(now);
        now += FRAME_DURATION_MS;
        frames += 1;
        assert!(frames < 100, "animation should finish promptly");
    }
    // 100ms at 16.66ms a step rounds up to 7 frames.
    assert_eq!(frames, 7);
}

#[test]
fn stop_freezes_the_animation_queue() {
    let surface = RecordingSurface::new();
    let mut chart = animated_chart(&surface);
    let mut scheduler = AnimationScheduler::new();

    assert!(chart.render(&mut scheduler, 1000, false));
    scheduler.tick(0.0);
    chart.stop(&mut scheduler);

    assert!(!scheduler.has_animations());
    assert!(scheduler.tick(FRAME_DURATION_MS).is_empty());
}
