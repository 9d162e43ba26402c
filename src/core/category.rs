//! Categorical scale: one tick per data label, pixels by index.

use crate::core::scale::{AxisOptions, AxisPosition, Scale, ScaleContext, ScaleState};
use crate::core::types::DataValue;

#[derive(Debug, Clone)]
pub struct CategoryScale {
    state: ScaleState,
}

impl CategoryScale {
    #[must_use]
    pub fn new(id: impl Into<String>, mut options: AxisOptions) -> Self {
        if options.position == AxisPosition::ChartArea {
            options.position = AxisPosition::Bottom;
        }
        Self {
            state: ScaleState::new(id, options),
        }
    }
}

impl Scale for CategoryScale {
    fn state(&self) -> &ScaleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        &mut self.state
    }

    fn build_ticks(&mut self, data: &ScaleContext<'_>) {
        self.state.tick_values.clear();
        self.state.tick_labels = data.labels.to_vec();
        // The first grid line doubles as the axis edge line.
        self.state.zero_line_index = Some(0);
    }

    fn get_pixel_for_value(&self, _value: DataValue, index: usize, include_offset: bool) -> f64 {
        let state = &self.state;
        let offset_grid_lines = state.options.grid_lines.offset_grid_lines;
        let label_count = state.tick_labels.len();
        let slots = if offset_grid_lines {
            label_count
        } else {
            label_count.saturating_sub(1)
        }
        .max(1);

        if state.is_horizontal() {
            let value_width = state.inner_width() / slots as f64;
            let mut width_offset = value_width * index as f64 + state.padding_left;
            if offset_grid_lines && include_offset {
                width_offset += value_width / 2.0;
            }
            state.left + width_offset.round()
        } else {
            let value_height = state.inner_height() / slots as f64;
            let mut height_offset = value_height * index as f64 + state.padding_top;
            if offset_grid_lines && include_offset {
                height_offset += value_height / 2.0;
            }
            state.top + height_offset.round()
        }
    }

    fn get_label_for_index(
        &self,
        index: usize,
        _dataset_index: usize,
        _data: &ScaleContext<'_>,
    ) -> String {
        self.state
            .tick_labels
            .get(index)
            .cloned()
            .unwrap_or_default()
    }
}
