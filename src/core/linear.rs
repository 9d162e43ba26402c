//! Linear numeric scale: domain scan (with stacked accumulation), evenly
//! spaced tick generation and proportional pixel mapping.

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::scale::{AxisOptions, Scale, ScaleContext, ScaleState};
use crate::core::types::DataValue;

/// Caller-supplied tick label override.
pub type TickFormatter = Box<dyn Fn(f64, usize, &[f64]) -> String + Send + Sync>;

pub struct LinearScale {
    state: ScaleState,
    formatter: Option<TickFormatter>,
}

impl fmt::Debug for LinearScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearScale")
            .field("state", &self.state)
            .field("has_formatter", &self.formatter.is_some())
            .finish()
    }
}

impl LinearScale {
    #[must_use]
    pub fn new(id: impl Into<String>, options: AxisOptions) -> Self {
        Self {
            state: ScaleState::new(id, options),
            formatter: None,
        }
    }

    pub fn set_formatter(&mut self, formatter: TickFormatter) {
        self.formatter = Some(formatter);
    }

    fn is_bound_series(&self, series: &crate::core::scale::SeriesView<'_>) -> bool {
        let bound_id = if self.state.is_horizontal() {
            series.x_axis_id
        } else {
            series.y_axis_id
        };
        series.visible && bound_id == self.state.id
    }

    /// Scans bound datasets for the raw min/max, summing positive and
    /// negative values per index and per chart kind when stacked.
    fn compute_range(&mut self, data: &ScaleContext<'_>) {
        let horizontal = self.state.is_horizontal();
        let stacked = self.state.options.stacked;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        if stacked {
            struct StackSums {
                positive: Vec<f64>,
                negative: Vec<f64>,
            }
            let mut sums_per_kind: IndexMap<&str, StackSums> = IndexMap::new();

            for series in &data.series {
                if !self.is_bound_series(series) {
                    continue;
                }
                let sums = sums_per_kind.entry(series.kind).or_insert(StackSums {
                    positive: Vec::new(),
                    negative: Vec::new(),
                });
                for (index, raw) in series.values.iter().enumerate() {
                    let Some(value) = raw.resolve(horizontal) else {
                        continue;
                    };
                    if sums.positive.len() <= index {
                        sums.positive.resize(index + 1, 0.0);
                        sums.negative.resize(index + 1, 0.0);
                    }
                    if value < 0.0 {
                        sums.negative[index] += value;
                    } else {
                        sums.positive[index] += value;
                    }
                }
            }

            for sums in sums_per_kind.values() {
                for value in sums.positive.iter().chain(&sums.negative) {
                    min = Some(min.map_or(*value, |m| m.min(*value)));
                    max = Some(max.map_or(*value, |m| m.max(*value)));
                }
            }
        } else {
            for series in &data.series {
                if !self.is_bound_series(series) {
                    continue;
                }
                for raw in series.values {
                    let Some(value) = raw.resolve(horizontal) else {
                        continue;
                    };
                    min = Some(min.map_or(value, |m| m.min(value)));
                    max = Some(max.map_or(value, |m| m.max(value)));
                }
            }
        }

        self.state.min = min.unwrap_or(0.0);
        self.state.max = max.unwrap_or(1.0);
    }

    fn max_tick_count(&self) -> usize {
        let ticks = &self.state.options.ticks;
        let limit = ticks.max_ticks_limit.unwrap_or(11);
        let by_space = if self.state.is_horizontal() {
            (self.state.width / 50.0).ceil()
        } else {
            // The factor of 2 on the font size is an empirical fit.
            (self.state.height / (2.0 * ticks.font_size)).ceil()
        };
        limit.min(by_space.max(0.0) as usize).max(2)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Decimal places derived from the tick delta, so 0..=2.5 shows "0.5" but
/// 0..=100 shows "20".
fn default_tick_string(value: f64, ticks: &[f64]) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }

    let mut delta = if ticks.len() > 1 {
        ticks[1] - ticks[0]
    } else {
        value
    };
    if delta.abs() > 1.0 && value != value.floor() {
        delta = value - value.floor();
    }
    if delta == 0.0 {
        delta = 1.0;
    }

    let log_delta = delta.abs().log10();
    let num_decimal = (-log_delta.floor()).clamp(0.0, 20.0) as usize;
    format!("{value:.num_decimal$}")
}

impl Scale for LinearScale {
    fn state(&self) -> &ScaleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        &mut self.state
    }

    fn build_ticks(&mut self, data: &ScaleContext<'_>) {
        self.compute_range(data);

        let ticks_options = self.state.options.ticks.clone();

        // Begin-at-zero only pulls the near side to zero; a domain already
        // spanning zero is left alone.
        if ticks_options.begin_at_zero {
            if self.state.min < 0.0 && self.state.max < 0.0 {
                self.state.max = 0.0;
            } else if self.state.min > 0.0 && self.state.max > 0.0 {
                self.state.min = 0.0;
            }
        }

        if let Some(suggested_min) = ticks_options.suggested_min {
            self.state.min = self.state.min.min(suggested_min);
        }
        if let Some(suggested_max) = ticks_options.suggested_max {
            self.state.max = self.state.max.max(suggested_max);
        }

        if self.state.min == self.state.max {
            self.state.min -= 1.0;
            self.state.max += 1.0;
        }

        let max_ticks = self.max_tick_count();
        let range = self.state.max - self.state.min;
        let spacing = round4(range / (max_ticks - 1) as f64);
        let num_spaces = if spacing > 0.0 {
            (range / spacing).round() as usize
        } else {
            1
        };

        let mut values = Vec::with_capacity(num_spaces + 1);
        for step in 0..=num_spaces {
            values.push(round4(self.state.min + step as f64 * spacing));
        }

        // Vertical axes list ticks top down.
        if !self.state.is_horizontal() {
            values.reverse();
        }

        self.state.min = values.iter().copied().fold(f64::INFINITY, f64::min);
        self.state.max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if ticks_options.reverse {
            values.reverse();
            self.state.start = self.state.max;
            self.state.end = self.state.min;
        } else {
            self.state.start = self.state.min;
            self.state.end = self.state.max;
        }

        self.state.zero_line_index = values.iter().position(|tick| *tick == 0.0);
        self.state.tick_values = values;

        trace!(
            id = %self.state.id,
            min = self.state.min,
            max = self.state.max,
            ticks = self.state.tick_values.len(),
            "linear ticks built"
        );
    }

    fn format_tick(&self, value: f64, index: usize) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value, index, &self.state.tick_values),
            None => default_tick_string(value, &self.state.tick_values),
        }
    }

    fn get_pixel_for_value(&self, value: DataValue, _index: usize, _include_offset: bool) -> f64 {
        let state = &self.state;
        let Some(resolved) = value.resolve(state.is_horizontal()) else {
            return f64::NAN;
        };

        let range = state.end - state.start;
        if range == 0.0 {
            return f64::NAN;
        }

        if state.is_horizontal() {
            let pixel = state.left + state.inner_width() / range * (resolved - state.start);
            (pixel + state.padding_left).round()
        } else {
            let pixel = (state.bottom - state.padding_bottom)
                - state.inner_height() / range * (resolved - state.start);
            pixel.round()
        }
    }

    fn get_label_for_index(
        &self,
        index: usize,
        dataset_index: usize,
        data: &ScaleContext<'_>,
    ) -> String {
        let value = data
            .series
            .get(dataset_index)
            .and_then(|series| series.values.get(index))
            .and_then(|raw| raw.resolve(self.state.is_horizontal()));
        match value {
            Some(value) => crate::core::scale::format_float(value),
            None => String::new(),
        }
    }
}
