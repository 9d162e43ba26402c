use chartkit::core::{AxisKind, AxisPosition, DataValue, Easing};
use chartkit::render::RecordingSurface;
use chartkit::{Chart, ChartConfig, DatasetConfig, ScalarOrVec};

#[test]
fn full_config_round_trips_through_json() {
    let config = ChartConfig::new("line")
        .with_labels(vec!["a".to_owned(), "b".to_owned()])
        .with_dataset(
            DatasetConfig::new("series", vec![1.0.into(), DataValue::Null])
                .with_colors("rgba(10, 20, 30, 0.5)", "#0a141e"),
        );

    let json = serde_json::to_string(&config).expect("serialize");
    let back: ChartConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(config, back);
}

#[test]
fn axis_options_use_camel_case_keys() {
    let config: ChartConfig = serde_json::from_str(
        r#"{
            "type": "line",
            "options": {
                "scales": {
                    "yAxes": [{
                        "type": "linear",
                        "position": "right",
                        "ticks": {"beginAtZero": true, "maxTicksLimit": 6},
                        "gridLines": {"offsetGridLines": true, "zeroLineWidth": 2}
                    }]
                }
            }
        }"#,
    )
    .expect("deserialize");

    let axis = &config.options.scales.y_axes[0];
    assert_eq!(axis.kind, AxisKind::Linear);
    assert_eq!(axis.position, AxisPosition::Right);
    assert!(axis.ticks.begin_at_zero);
    assert_eq!(axis.ticks.max_ticks_limit, Some(6));
    assert!(axis.grid_lines.offset_grid_lines);
    assert_eq!(axis.grid_lines.zero_line_width, 2.0);

    // Unspecified sections keep the stock axes.
    assert_eq!(config.options.scales.x_axes[0].kind, AxisKind::Category);
}

#[test]
fn dataset_styling_uses_camel_case_keys() {
    let config: ChartConfig = serde_json::from_str(
        r##"{
            "data": {
                "labels": ["a"],
                "datasets": [{
                    "label": "styled",
                    "data": [4],
                    "borderColor": "#ff0000",
                    "backgroundColor": "rgba(255, 0, 0, 0.4)",
                    "pointRadius": 6,
                    "pointHoverRadius": 9,
                    "yAxisID": "y-axis-0"
                }]
            }
        }"##,
    )
    .expect("deserialize");

    let dataset = &config.data.datasets[0];
    assert_eq!(dataset.border_color.as_deref(), Some("#ff0000"));
    assert_eq!(dataset.point_radius, Some(ScalarOrVec::Scalar(6.0)));
    assert_eq!(
        dataset.point_hover_radius,
        Some(ScalarOrVec::Scalar(9.0))
    );
    assert_eq!(dataset.y_axis_id.as_deref(), Some("y-axis-0"));
}

#[test]
fn easing_names_match_the_stock_vocabulary() {
    let options: ChartConfig = serde_json::from_str(
        r#"{"options": {"animation": {"duration": 250, "easing": "easeInOutCubic"}}}"#,
    )
    .expect("deserialize");
    assert_eq!(options.options.animation.duration, 250);
    assert_eq!(options.options.animation.easing, Easing::EaseInOutCubic);
}

#[test]
fn point_pairs_resolve_per_axis_orientation() {
    let value: DataValue = serde_json::from_str(r#"{"x": 2.0, "y": 7.5}"#).expect("deserialize");
    assert_eq!(value.resolve(true), Some(2.0));
    assert_eq!(value.resolve(false), Some(7.5));

    let null: DataValue = serde_json::from_str("null").expect("deserialize");
    assert_eq!(null.resolve(false), None);
}

#[test]
fn deserialized_config_drives_a_chart() {
    let config: ChartConfig = serde_json::from_str(
        r#"{
            "type": "line",
            "data": {
                "labels": ["q1", "q2", "q3"],
                "datasets": [{"label": "bookings", "data": [12, 19, 7]}]
            },
            "options": {"animation": {"duration": 0}}
        }"#,
    )
    .expect("deserialize");

    let surface = RecordingSurface::new();
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(&surface).expect("update should succeed");
    assert_eq!(chart.dataset_meta(0).expect("meta").points.len(), 3);
}
