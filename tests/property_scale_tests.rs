use chartkit::core::DataValue;
use chartkit::render::RecordingSurface;
use chartkit::{Chart, ChartConfig, DatasetConfig};
use proptest::prelude::*;

fn chart_for(values: &[i32]) -> Chart {
    let labels = (0..values.len()).map(|i| format!("L{i}")).collect();
    let data: Vec<DataValue> = values.iter().map(|v| f64::from(*v).into()).collect();
    let config = ChartConfig::new("line")
        .with_labels(labels)
        .with_dataset(DatasetConfig::new("series", data));
    let surface = RecordingSurface::new();
    let mut chart = Chart::new(640, 480, config).expect("chart init");
    chart.update(&surface).expect("chart update");
    chart
}

proptest! {
    #[test]
    fn linear_domain_covers_the_data(values in prop::collection::vec(-1000i32..1000, 2..24)) {
        let chart = chart_for(&values);
        let state = chart.scale("y-axis-0").expect("y scale").state();

        let data_min = f64::from(*values.iter().min().expect("non-empty"));
        let data_max = f64::from(*values.iter().max().expect("non-empty"));
        // Tick spacing is rounded to four decimals, so allow that slack.
        prop_assert!(state.min <= data_min + 1e-3);
        prop_assert!(state.max >= data_max - 1e-3);
    }

    #[test]
    fn linear_tick_count_stays_within_bounds(values in prop::collection::vec(-1000i32..1000, 2..24)) {
        let chart = chart_for(&values);
        let state = chart.scale("y-axis-0").expect("y scale").state();
        prop_assert!(state.tick_values.len() >= 2);
        prop_assert!(state.tick_values.len() <= 12);
    }

    #[test]
    fn larger_values_never_map_below_smaller_ones(
        values in prop::collection::vec(-1000i32..1000, 2..24),
        probe_a in -1000i32..1000,
        probe_b in -1000i32..1000,
    ) {
        let chart = chart_for(&values);
        let scale = chart.scale("y-axis-0").expect("y scale");

        let (small, large) = if probe_a <= probe_b { (probe_a, probe_b) } else { (probe_b, probe_a) };
        let low_px = scale.get_pixel_for_value(f64::from(small).into(), 0, false);
        let high_px = scale.get_pixel_for_value(f64::from(large).into(), 0, false);
        // Vertical axis: bigger values sit at smaller pixel rows.
        prop_assert!(high_px <= low_px);
    }

    #[test]
    fn linear_pixels_stay_near_the_plot(values in prop::collection::vec(-1000i32..1000, 2..24)) {
        let chart = chart_for(&values);
        let scale = chart.scale("y-axis-0").expect("y scale");
        let state = scale.state();

        for tick in &state.tick_values {
            let px = scale.get_pixel_for_value((*tick).into(), 0, false);
            prop_assert!(px >= state.top - 1.0);
            prop_assert!(px <= state.bottom + 1.0);
        }
    }

    #[test]
    fn category_tick_pixels_are_monotonic(count in 2usize..30) {
        let values: Vec<i32> = (0..count as i32).collect();
        let chart = chart_for(&values);
        let scale = chart.scale("x-axis-0").expect("x scale");

        let pixels: Vec<f64> = (0..count)
            .map(|index| scale.get_pixel_for_tick(index, false))
            .collect();
        prop_assert!(pixels.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn point_rows_fall_inside_the_chart_area(values in prop::collection::vec(-1000i32..1000, 2..24)) {
        let chart = chart_for(&values);
        let area = chart.chart_area();
        let meta = chart.dataset_meta(0).expect("meta");

        for point in &meta.points {
            let model = point.model();
            prop_assert!(model.x >= area.left - 1.0);
            prop_assert!(model.x <= area.right + 1.0);
            prop_assert!(model.y >= area.top - 1.0);
            prop_assert!(model.y <= area.bottom + 1.0);
        }
    }
}
