//! Per-dataset controller: owns the line and point elements for one series
//! and keeps their models in sync with the data and scales.

use indexmap::IndexMap;
use tracing::trace;

use crate::api::config::{ChartConfig, DatasetConfig, ScalarOrVec};
use crate::core::color::Color;
use crate::core::element::Element;
use crate::core::line::LineModel;
use crate::core::math::{Point, spline_curve};
use crate::core::point::PointModel;
use crate::core::scale::Scale;
use crate::core::types::{DataValue, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::DrawingSurface;

/// Everything a controller needs from the chart for one update pass.
pub struct DatasetContext<'a> {
    pub config: &'a ChartConfig,
    pub scales: &'a IndexMap<String, Box<dyn Scale>>,
    pub chart_area: Rect,
}

impl<'a> DatasetContext<'a> {
    fn scale(&self, axis_id: &str, dataset_index: usize) -> ChartResult<&dyn Scale> {
        self.scales
            .get(axis_id)
            .map(|scale| scale.as_ref())
            .ok_or_else(|| ChartError::MissingScale {
                axis_id: axis_id.to_owned(),
                dataset_index,
            })
    }
}

/// Element state for one dataset.
#[derive(Debug, Clone)]
pub struct DatasetMeta {
    pub index: usize,
    pub x_axis_id: String,
    pub y_axis_id: String,
    pub line: Element<LineModel>,
    pub points: Vec<Element<PointModel>>,
}

fn is_visible(dataset: &DatasetConfig) -> bool {
    !dataset.hidden
}

/// Index-wise lookup into a value-or-array style option.
fn indexed<T: Copy>(option: &Option<ScalarOrVec<T>>, index: usize) -> Option<T> {
    option.as_ref().and_then(|values| values.at(index)).copied()
}

fn indexed_str(option: &Option<ScalarOrVec<String>>, index: usize) -> Option<&str> {
    option
        .as_ref()
        .and_then(|values| values.at(index))
        .map(String::as_str)
}

impl DatasetMeta {
    /// Links the dataset to its axes, falling back to the first axis of each
    /// orientation when the dataset names none.
    pub fn new(index: usize, config: &ChartConfig) -> ChartResult<Self> {
        let dataset = config.data.datasets.get(index).ok_or_else(|| {
            ChartError::InvalidData(format!("dataset index {index} out of range"))
        })?;

        let fallback_x = config
            .options
            .scales
            .x_axes
            .first()
            .and_then(|axis| axis.id.clone())
            .unwrap_or_else(|| "x-axis-0".to_owned());
        let fallback_y = config
            .options
            .scales
            .y_axes
            .first()
            .and_then(|axis| axis.id.clone())
            .unwrap_or_else(|| "y-axis-0".to_owned());

        Ok(Self {
            index,
            x_axis_id: dataset.x_axis_id.clone().unwrap_or(fallback_x),
            y_axis_id: dataset.y_axis_id.clone().unwrap_or(fallback_y),
            line: Element::new(LineModel::default()),
            points: Vec::new(),
        })
    }

    fn dataset<'a>(&self, config: &'a ChartConfig) -> &'a DatasetConfig {
        &config.data.datasets[self.index]
    }

    /// Grows or shrinks the element list to match the data length. New
    /// elements are reset so they animate in from the scale base.
    pub fn build_or_update_elements(&mut self, ctx: &DatasetContext<'_>) -> ChartResult<()> {
        let num_data = self.dataset(ctx.config).data.len();
        let num_points = self.points.len();

        if num_data < num_points {
            self.points.truncate(num_data);
        } else if num_data > num_points {
            for index in num_points..num_data {
                self.points.push(Element::new(PointModel::default()));
                self.update_element(index, true, ctx)?;
            }
            self.update_bezier_control_points(ctx.chart_area);
        }

        trace!(dataset = self.index, points = self.points.len(), "elements built");
        Ok(())
    }

    /// Pixel row new and resetting points animate from: zero when the domain
    /// spans it, otherwise the domain edge closest to zero.
    fn scale_base(&self, y_scale: &dyn Scale) -> f64 {
        let state = y_scale.state();
        let base_value = if state.min < 0.0 && state.max < 0.0 {
            state.max
        } else if state.min > 0.0 && state.max > 0.0 {
            state.min
        } else {
            0.0
        };
        y_scale.get_pixel_for_value(base_value.into(), 0, false)
    }

    /// Refreshes the line model and every point model from the data.
    pub fn update(&mut self, ctx: &DatasetContext<'_>, reset: bool) -> ChartResult<()> {
        let dataset = self.dataset(ctx.config);
        let line_defaults = &ctx.config.options.elements.line;
        let y_scale = ctx.scale(&self.y_axis_id, self.index)?;

        let background_color = Color::parse_or(
            dataset
                .background_color
                .as_deref()
                .unwrap_or(&line_defaults.background_color),
            Color::default_element(),
        );
        let border_color = Color::parse_or(
            dataset
                .border_color
                .as_deref()
                .unwrap_or(&line_defaults.border_color),
            Color::default_element(),
        );

        let model = LineModel {
            tension: dataset.tension.unwrap_or(line_defaults.tension),
            background_color,
            border_color,
            border_width: dataset.border_width.unwrap_or(line_defaults.border_width),
            border_cap: line_defaults.border_cap_style,
            border_dash: dataset
                .border_dash
                .clone()
                .unwrap_or_else(|| line_defaults.border_dash.clone()),
            border_dash_offset: line_defaults.border_dash_offset,
            border_join: line_defaults.border_join_style,
            fill: dataset.fill.unwrap_or(line_defaults.fill),
            scale_top: y_scale.state().top,
            scale_bottom: y_scale.state().bottom,
            scale_zero: self.scale_base(y_scale),
        };
        self.line.set_model(model);
        self.line.pivot();

        for index in 0..self.points.len() {
            self.update_element(index, reset, ctx)?;
        }
        self.update_bezier_control_points(ctx.chart_area);

        Ok(())
    }

    fn update_element(
        &mut self,
        index: usize,
        reset: bool,
        ctx: &DatasetContext<'_>,
    ) -> ChartResult<()> {
        let dataset = self.dataset(ctx.config);
        let point_defaults = &ctx.config.options.elements.point;
        let line_defaults = &ctx.config.options.elements.line;
        let x_scale = ctx.scale(&self.x_axis_id, self.index)?;
        let y_scale = ctx.scale(&self.y_axis_id, self.index)?;

        let value = dataset
            .data
            .get(index)
            .copied()
            .unwrap_or(DataValue::Null);
        let x = x_scale.get_pixel_for_value(value, index, false);
        let y = if reset {
            self.scale_base(y_scale)
        } else {
            self.calculate_point_y(value, index, ctx, y_scale)
        };

        let background_color = Color::parse_or(
            indexed_str(&dataset.point_background_color, index)
                .or(dataset.background_color.as_deref())
                .unwrap_or(&point_defaults.background_color),
            Color::default_element(),
        );
        let border_color = Color::parse_or(
            indexed_str(&dataset.point_border_color, index)
                .or(dataset.border_color.as_deref())
                .unwrap_or(&point_defaults.border_color),
            Color::default_element(),
        );
        let border_width = indexed(&dataset.point_border_width, index)
            .or(dataset.border_width)
            .unwrap_or(point_defaults.border_width);

        let element = &mut self.points[index];
        let model = element.model_mut();
        model.x = x;
        model.y = y;
        model.tension = dataset.tension.unwrap_or(line_defaults.tension);
        model.radius = indexed(&dataset.point_radius, index).unwrap_or(point_defaults.radius);
        model.background_color = background_color;
        model.border_color = border_color;
        model.border_width = border_width;
        model.hit_radius =
            indexed(&dataset.point_hit_radius, index).unwrap_or(point_defaults.hit_radius);
        model.skip = x.is_nan() || y.is_nan();

        Ok(())
    }

    /// Vertical pixel of one value; stacked axes add the sums of the datasets
    /// drawn behind this one (later dataset indices paint first).
    fn calculate_point_y(
        &self,
        value: DataValue,
        index: usize,
        ctx: &DatasetContext<'_>,
        y_scale: &dyn Scale,
    ) -> f64 {
        let Some(resolved) = value.resolve(false) else {
            return f64::NAN;
        };

        if y_scale.state().options.stacked {
            let mut sum_pos = 0.0;
            let mut sum_neg = 0.0;
            let datasets = &ctx.config.data.datasets;
            for behind in (self.index + 1..datasets.len()).rev() {
                let other = &datasets[behind];
                if !is_visible(other) {
                    continue;
                }
                let Some(other_value) =
                    other.data.get(index).and_then(|raw| raw.resolve(false))
                else {
                    continue;
                };
                if other_value < 0.0 {
                    sum_neg += other_value;
                } else {
                    sum_pos += other_value;
                }
            }

            let stacked = if resolved < 0.0 {
                sum_neg + resolved
            } else {
                sum_pos + resolved
            };
            return y_scale.get_pixel_for_value(stacked.into(), index, false);
        }

        y_scale.get_pixel_for_value(value, index, false)
    }

    /// Recomputes spline control points from each point's neighbors, clamped
    /// to the plot area, then pivots every point for animation.
    pub fn update_bezier_control_points(&mut self, chart_area: Rect) {
        let count = self.points.len();
        let anchors: Vec<(Point, bool, f64)> = self
            .points
            .iter()
            .map(|element| {
                let model = element.model();
                (Point::new(model.x, model.y), model.skip, model.tension)
            })
            .collect();

        for index in 0..count {
            let previous = anchors[index.saturating_sub(1)];
            let current = anchors[index];
            let next = anchors[(index + 1).min(count - 1)];

            let controls = spline_curve(
                previous.0, previous.1, current.0, next.0, next.1, current.2,
            );

            let element = &mut self.points[index];
            let model = element.model_mut();
            model.control_point_previous = Point::new(
                chart_area.clamp_x(controls.previous.x),
                chart_area.clamp_y(controls.previous.y),
            );
            model.control_point_next = Point::new(
                chart_area.clamp_x(controls.next.x),
                chart_area.clamp_y(controls.next.y),
            );

            element.pivot();
        }
    }

    /// Advances every element toward its model and paints the dataset.
    pub fn draw(&mut self, surface: &mut dyn DrawingSurface, ease: f64) {
        let point_views: Vec<PointModel> = self
            .points
            .iter_mut()
            .map(|point| point.transition(ease).clone())
            .collect();

        let line_view = self.line.transition(ease).clone();
        line_view.draw(surface, &point_views);

        for view in &point_views {
            view.draw(surface);
        }
    }

    /// Applies the hover emphasis to one point. Colors without an explicit
    /// hover override are derived from the current fill.
    pub fn set_hover_style(&mut self, index: usize, config: &ChartConfig) {
        let dataset = &config.data.datasets[self.index];
        let point_defaults = &config.options.elements.point;
        let Some(element) = self.points.get_mut(index) else {
            return;
        };

        let model = element.model_mut();
        model.radius = indexed(&dataset.point_hover_radius, index)
            .unwrap_or(point_defaults.hover_radius);
        model.background_color = match indexed_str(&dataset.point_hover_background_color, index) {
            Some(color) => Color::parse_or(color, model.background_color),
            None => model.background_color.emphasized(),
        };
        model.border_color = match indexed_str(&dataset.point_hover_border_color, index) {
            Some(color) => Color::parse_or(color, model.border_color),
            None => model.border_color.emphasized(),
        };
        model.border_width =
            indexed(&dataset.point_hover_border_width, index).unwrap_or(model.border_width);
    }

    /// Restores the configured styling after a hover ends.
    pub fn remove_hover_style(&mut self, index: usize, config: &ChartConfig) {
        let dataset = &config.data.datasets[self.index];
        let point_defaults = &config.options.elements.point;
        let Some(element) = self.points.get_mut(index) else {
            return;
        };

        let background_color = Color::parse_or(
            indexed_str(&dataset.point_background_color, index)
                .or(dataset.background_color.as_deref())
                .unwrap_or(&point_defaults.background_color),
            Color::default_element(),
        );
        let border_color = Color::parse_or(
            indexed_str(&dataset.point_border_color, index)
                .or(dataset.border_color.as_deref())
                .unwrap_or(&point_defaults.border_color),
            Color::default_element(),
        );

        let model = element.model_mut();
        model.radius = indexed(&dataset.point_radius, index).unwrap_or(point_defaults.radius);
        model.background_color = background_color;
        model.border_color = border_color;
        model.border_width = indexed(&dataset.point_border_width, index)
            .or(dataset.border_width)
            .unwrap_or(point_defaults.border_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{ChartConfig, DatasetConfig};
    use crate::api::layout::layout_scales;
    use crate::api::registry::ScaleRegistry;
    use crate::core::scale::{ScaleContext, SeriesView};
    use crate::render::RecordingSurface;

    fn config_with(values: Vec<f64>) -> ChartConfig {
        let data: Vec<DataValue> = values.into_iter().map(DataValue::from).collect();
        ChartConfig::new("line")
            .with_labels((0..4).map(|i| format!("L{i}")).collect())
            .with_dataset(DatasetConfig::new("series", data))
    }

    fn build_scales(config: &ChartConfig) -> (IndexMap<String, Box<dyn Scale>>, Rect) {
        let registry = ScaleRegistry::default();
        let mut scales: IndexMap<String, Box<dyn Scale>> = IndexMap::new();
        for axis in config
            .options
            .scales
            .x_axes
            .iter()
            .chain(&config.options.scales.y_axes)
        {
            let id = axis.id.clone().unwrap_or_default();
            let scale = registry.create(axis.kind.name(), id.clone(), axis.clone()).unwrap();
            scales.insert(id, scale);
        }

        let series: Vec<SeriesView<'_>> = config
            .data
            .datasets
            .iter()
            .map(|dataset| SeriesView {
                values: &dataset.data,
                visible: !dataset.hidden,
                kind: dataset.kind.as_deref().unwrap_or(&config.kind),
                x_axis_id: dataset.x_axis_id.as_deref().unwrap_or("x-axis-0"),
                y_axis_id: dataset.y_axis_id.as_deref().unwrap_or("y-axis-0"),
            })
            .collect();
        let context = ScaleContext {
            labels: &config.data.labels,
            series,
        };
        let surface = RecordingSurface::new();
        let area = layout_scales(&mut scales, &context, &surface, 400.0, 300.0);
        (scales, area)
    }

    #[test]
    fn grow_keeps_existing_elements_and_appends_reset_ones() {
        let mut config = config_with(vec![1.0, 2.0, 3.0]);
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();

        {
            let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
            meta.build_or_update_elements(&ctx).unwrap();
            meta.update(&ctx, false).unwrap();
        }
        assert_eq!(meta.points.len(), 3);
        let first_x = meta.points[0].model().x;

        config.data.datasets[0].data.push(4.0.into());
        config.data.datasets[0].data.push(5.0.into());
        {
            let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
            meta.build_or_update_elements(&ctx).unwrap();
        }
        assert_eq!(meta.points.len(), 5);
        assert_eq!(meta.points[0].model().x, first_x);

        config.data.datasets[0].data.truncate(2);
        {
            let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
            meta.build_or_update_elements(&ctx).unwrap();
        }
        assert_eq!(meta.points.len(), 2);
    }

    #[test]
    fn reset_pins_points_to_the_scale_base() {
        let config = config_with(vec![10.0, 20.0, 30.0, 40.0]);
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();
        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };

        meta.build_or_update_elements(&ctx).unwrap();
        meta.update(&ctx, true).unwrap();

        let base = meta.points[0].model().y;
        assert!(meta.points.iter().all(|p| p.model().y == base));

        meta.update(&ctx, false).unwrap();
        let ys: Vec<f64> = meta.points.iter().map(|p| p.model().y).collect();
        // Larger values sit higher on a left axis.
        for pair in ys.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn missing_values_become_skip_markers() {
        let mut config = config_with(vec![1.0, 2.0, 3.0, 4.0]);
        config.data.datasets[0].data[2] = DataValue::Null;
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();
        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };

        meta.build_or_update_elements(&ctx).unwrap();
        meta.update(&ctx, false).unwrap();

        assert!(meta.points[2].model().skip);
        assert!(!meta.points[1].model().skip);
    }

    #[test]
    fn control_points_stay_inside_the_chart_area() {
        let config = config_with(vec![0.0, 100.0, 0.0, 100.0]);
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();
        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };

        meta.build_or_update_elements(&ctx).unwrap();
        meta.update(&ctx, false).unwrap();

        for point in &meta.points {
            let model = point.model();
            for control in [model.control_point_previous, model.control_point_next] {
                assert!(control.x >= area.left && control.x <= area.right);
                assert!(control.y >= area.top && control.y <= area.bottom);
            }
        }
    }

    #[test]
    fn hover_style_round_trips() {
        let config = config_with(vec![1.0, 2.0, 3.0, 4.0]);
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();
        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
        meta.build_or_update_elements(&ctx).unwrap();
        meta.update(&ctx, false).unwrap();

        let plain_radius = meta.points[1].model().radius;
        meta.set_hover_style(1, &config);
        assert_eq!(
            meta.points[1].model().radius,
            config.options.elements.point.hover_radius
        );

        meta.remove_hover_style(1, &config);
        assert_eq!(meta.points[1].model().radius, plain_radius);
    }

    #[test]
    fn per_point_style_arrays_resolve_index_wise() {
        let mut config = config_with(vec![1.0, 2.0, 3.0, 4.0]);
        config.data.datasets[0].point_radius = Some(ScalarOrVec::Vec(vec![2.0, 6.0]));
        config.data.datasets[0].point_background_color = Some(ScalarOrVec::Vec(vec![
            "#ff0000".to_owned(),
            "#00ff00".to_owned(),
        ]));
        config.data.datasets[0].point_hover_radius = Some(ScalarOrVec::Vec(vec![9.0, 11.0]));
        let (scales, area) = build_scales(&config);
        let mut meta = DatasetMeta::new(0, &config).unwrap();
        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
        meta.build_or_update_elements(&ctx).unwrap();
        meta.update(&ctx, false).unwrap();

        assert_eq!(meta.points[0].model().radius, 2.0);
        assert_eq!(meta.points[1].model().radius, 6.0);
        // Indices past the end of the array use the element default.
        assert_eq!(
            meta.points[2].model().radius,
            config.options.elements.point.radius
        );
        assert_eq!(
            meta.points[0].model().background_color,
            Color::rgb(1.0, 0.0, 0.0)
        );
        assert_eq!(
            meta.points[1].model().background_color,
            Color::rgb(0.0, 1.0, 0.0)
        );

        meta.set_hover_style(1, &config);
        assert_eq!(meta.points[1].model().radius, 11.0);
        meta.set_hover_style(3, &config);
        assert_eq!(
            meta.points[3].model().radius,
            config.options.elements.point.hover_radius
        );

        meta.remove_hover_style(1, &config);
        assert_eq!(meta.points[1].model().radius, 6.0);
    }

    #[test]
    fn stacked_points_sit_on_the_running_sum() {
        let mut config = ChartConfig::new("line")
            .with_labels(vec!["a".to_owned(), "b".to_owned()])
            .with_dataset(DatasetConfig::new("top", vec![1.0.into(), 1.0.into()]))
            .with_dataset(DatasetConfig::new("base", vec![2.0.into(), 2.0.into()]));
        config.options.scales.y_axes[0].stacked = true;
        let (scales, area) = build_scales(&config);

        let ctx = DatasetContext { config: &config, scales: &scales, chart_area: area };
        let mut top = DatasetMeta::new(0, &config).unwrap();
        top.build_or_update_elements(&ctx).unwrap();
        top.update(&ctx, false).unwrap();

        let mut base = DatasetMeta::new(1, &config).unwrap();
        base.build_or_update_elements(&ctx).unwrap();
        base.update(&ctx, false).unwrap();

        // Dataset 0 stacks on dataset 1, so its point is the pixel of 1+2.
        let y_scale = scales.get("y-axis-0").unwrap();
        let expected = y_scale.get_pixel_for_value(3.0.into(), 0, false);
        assert_eq!(top.points[0].model().y, expected);
        assert_eq!(
            base.points[0].model().y,
            y_scale.get_pixel_for_value(2.0.into(), 0, false)
        );
    }
}
