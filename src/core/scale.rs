//! Axis abstraction: staged self-measurement pipeline, tick plumbing,
//! value-to-pixel mapping and axis drawing.
//!
//! Concrete variants override the tick-building stage (and pixel mapping);
//! every other stage ships with a default so a variant hooks only what it
//! needs, mirroring the before/core/after split of the update contract.

use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::core::math::alias_pixel;
use crate::core::types::{DataValue, Margins, Rect, Size};
use crate::render::{DrawingSurface, TextAlign, TextBaseline, longest_text};

/// Edge a scale is attached to, or the overlay position covering the plot
/// rectangle (radial-style axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AxisPosition {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
    ChartArea,
}

/// Concrete scale variant selector, resolved through the scale registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    #[default]
    Category,
    Linear,
}

impl AxisKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Linear => "linear",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridLineOptions {
    pub show: bool,
    pub color: String,
    pub line_width: f64,
    pub draw_on_chart_area: bool,
    pub draw_ticks: bool,
    pub zero_line_width: f64,
    pub zero_line_color: String,
    /// Shift grid lines half a cell so bars center between lines.
    pub offset_grid_lines: bool,
}

impl Default for GridLineOptions {
    fn default() -> Self {
        Self {
            show: true,
            color: "rgba(0, 0, 0, 0.1)".to_owned(),
            line_width: 1.0,
            draw_on_chart_area: true,
            draw_ticks: true,
            zero_line_width: 1.0,
            zero_line_color: "rgba(0, 0, 0, 0.25)".to_owned(),
            offset_grid_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisTitleOptions {
    pub show: bool,
    pub label: String,
    pub font_size: f64,
    pub font_color: String,
}

impl Default for AxisTitleOptions {
    fn default() -> Self {
        Self {
            show: false,
            label: String::new(),
            font_size: 12.0,
            font_color: "#666".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TickOptions {
    pub show: bool,
    pub begin_at_zero: bool,
    pub font_size: f64,
    pub font_color: String,
    /// Upper bound for the label rotation search, in degrees.
    pub max_rotation: f64,
    /// Draw labels inside the plot area instead of reserving outside space.
    pub mirror: bool,
    pub padding: f64,
    pub reverse: bool,
    pub max_ticks_limit: Option<usize>,
    pub suggested_min: Option<f64>,
    pub suggested_max: Option<f64>,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            show: true,
            begin_at_zero: false,
            font_size: 12.0,
            font_color: "#666".to_owned(),
            max_rotation: 90.0,
            mirror: false,
            padding: 10.0,
            reverse: false,
            max_ticks_limit: None,
            suggested_min: None,
            suggested_max: None,
        }
    }
}

/// Full option set for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub position: AxisPosition,
    pub display: bool,
    pub stacked: bool,
    pub grid_lines: GridLineOptions,
    pub scale_label: AxisTitleOptions,
    pub ticks: TickOptions,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            id: None,
            kind: AxisKind::default(),
            position: AxisPosition::default(),
            display: true,
            stacked: false,
            grid_lines: GridLineOptions::default(),
            scale_label: AxisTitleOptions::default(),
            ticks: TickOptions::default(),
        }
    }
}

/// One dataset as seen by a scale during domain computation.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    pub values: &'a [DataValue],
    pub visible: bool,
    /// Chart kind of the series; stacked accumulation groups by it.
    pub kind: &'a str,
    pub x_axis_id: &'a str,
    pub y_axis_id: &'a str,
}

/// Read-only view of chart data handed to scales while they build ticks.
#[derive(Debug, Clone, Default)]
pub struct ScaleContext<'a> {
    pub labels: &'a [String],
    pub series: Vec<SeriesView<'a>>,
}

/// State shared by every scale variant.
#[derive(Debug, Clone)]
pub struct ScaleState {
    pub id: String,
    pub options: AxisOptions,

    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,

    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,

    pub max_width: f64,
    pub max_height: f64,
    pub margins: Margins,

    pub tick_values: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub label_rotation: f64,
    pub label_width: f64,
    pub min_size: Size,

    pub min: f64,
    pub max: f64,
    /// Domain value mapped to the low-pixel end of the axis.
    pub start: f64,
    /// Domain value mapped to the high-pixel end of the axis.
    pub end: f64,
    pub zero_line_index: Option<usize>,
}

impl ScaleState {
    #[must_use]
    pub fn new(id: impl Into<String>, options: AxisOptions) -> Self {
        Self {
            id: id.into(),
            options,
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            width: 0.0,
            height: 0.0,
            padding_left: 0.0,
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            max_width: 0.0,
            max_height: 0.0,
            margins: Margins::default(),
            tick_values: Vec::new(),
            tick_labels: Vec::new(),
            label_rotation: 0.0,
            label_width: 0.0,
            min_size: Size::default(),
            min: 0.0,
            max: 1.0,
            start: 0.0,
            end: 1.0,
            zero_line_index: None,
        }
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        matches!(
            self.options.position,
            AxisPosition::Top | AxisPosition::Bottom
        )
    }

    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.width - (self.padding_left + self.padding_right)
    }

    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.height - (self.padding_top + self.padding_bottom)
    }
}

/// An axis: converts data values/indices to pixels, generates and fits tick
/// labels, measures its own minimum footprint, and draws itself.
pub trait Scale {
    fn state(&self) -> &ScaleState;
    fn state_mut(&mut self) -> &mut ScaleState;

    /// Variant-specific tick generation.
    fn build_ticks(&mut self, data: &ScaleContext<'_>);

    /// Maps a raw value (or its index, for categorical axes) to a pixel.
    ///
    /// Unresolvable values map to NaN, which downstream element updates turn
    /// into skip markers.
    fn get_pixel_for_value(&self, value: DataValue, index: usize, include_offset: bool) -> f64;

    /// Display text for the data at `index` of `dataset_index`, used by
    /// tooltips.
    fn get_label_for_index(
        &self,
        index: usize,
        dataset_index: usize,
        data: &ScaleContext<'_>,
    ) -> String;

    // Stage hooks; every default is a no-op so variants hook selectively.
    fn before_update(&mut self) {}
    fn after_update(&mut self) {}
    fn before_set_dimensions(&mut self) {}
    fn after_set_dimensions(&mut self) {}
    fn before_build_ticks(&mut self) {}
    fn after_build_ticks(&mut self) {}
    fn before_tick_to_label_conversion(&mut self) {}
    fn after_tick_to_label_conversion(&mut self) {}
    fn before_calculate_tick_rotation(&mut self) {}
    fn after_calculate_tick_rotation(&mut self) {}
    fn before_fit(&mut self) {}
    fn after_fit(&mut self) {}

    /// Formats one numeric tick; variants override for type-aware defaults.
    fn format_tick(&self, value: f64, _index: usize) -> String {
        format_float(value)
    }

    /// Converts numeric ticks to display labels. Variants whose ticks are
    /// already textual leave `tick_values` empty and keep their labels.
    fn convert_ticks_to_labels(&mut self) {
        if self.state().tick_values.is_empty() {
            return;
        }
        let labels: Vec<String> = self
            .state()
            .tick_values
            .iter()
            .enumerate()
            .map(|(index, value)| self.format_tick(*value, index))
            .collect();
        self.state_mut().tick_labels = labels;
    }

    /// Runs the full measurement pipeline and reports the minimum footprint.
    ///
    /// Re-invocable: the layout coordinator calls it multiple times with
    /// progressively tighter allocations.
    fn update(
        &mut self,
        surface: &dyn DrawingSurface,
        data: &ScaleContext<'_>,
        max_width: f64,
        max_height: f64,
        margins: Option<Margins>,
    ) -> Size {
        self.before_update();

        {
            let state = self.state_mut();
            state.max_width = max_width;
            state.max_height = max_height;
            state.margins = margins.unwrap_or_default();
        }

        self.before_set_dimensions();
        self.set_dimensions();
        self.after_set_dimensions();

        self.before_build_ticks();
        self.build_ticks(data);
        self.after_build_ticks();

        self.before_tick_to_label_conversion();
        self.convert_ticks_to_labels();
        self.after_tick_to_label_conversion();

        self.before_calculate_tick_rotation();
        self.calculate_tick_rotation(surface);
        self.after_calculate_tick_rotation();

        self.before_fit();
        self.fit(surface);
        self.after_fit();

        self.after_update();

        self.state().min_size
    }

    /// Sets the unconstrained dimension and resets padding before fitting.
    fn set_dimensions(&mut self) {
        let state = self.state_mut();
        if state.is_horizontal() {
            state.width = state.max_width;
            state.left = 0.0;
            state.right = state.width;
        } else {
            state.height = state.max_height;
            state.top = 0.0;
            state.bottom = state.height;
        }

        state.padding_left = 0.0;
        state.padding_top = 0.0;
        state.padding_right = 0.0;
        state.padding_bottom = 0.0;
    }

    /// Iteratively rotates horizontal labels until they fit the per-tick
    /// spacing, backing off one degree as soon as the vertical projection
    /// would exceed the available height.
    fn calculate_tick_rotation(&mut self, surface: &dyn DrawingSurface) {
        let font_size = self.state().options.ticks.font_size;
        let display = self.state().options.display;
        let horizontal = self.state().is_horizontal();
        let max_rotation = self.state().options.ticks.max_rotation;

        if self.state().tick_labels.is_empty() {
            let state = self.state_mut();
            state.label_rotation = 0.0;
            state.label_width = 0.0;
            state.padding_left = 0.0;
            state.padding_right = 0.0;
            return;
        }

        let first_width = surface.measure_text(&self.state().tick_labels[0], font_size);
        let last_label = self
            .state()
            .tick_labels
            .last()
            .cloned()
            .unwrap_or_default();
        let last_width = surface.measure_text(&last_label, font_size);

        {
            let state = self.state_mut();
            state.padding_right = last_width / 2.0 + 3.0;
            state.padding_left = first_width / 2.0 + 3.0;
            state.label_rotation = 0.0;
        }

        if display && horizontal {
            let longest = longest_text(surface, font_size, &self.state().tick_labels);
            self.state_mut().label_width = longest;

            // 3 px padding either side of each label for readability.
            let tick_width = if self.state().tick_labels.len() > 1 {
                self.get_pixel_for_tick(1, false) - self.get_pixel_for_tick(0, false) - 6.0
            } else {
                self.state().inner_width() - 6.0
            };

            while self.state().label_width > tick_width
                && self.state().label_rotation <= max_rotation
            {
                let rotation_radians = self.state().label_rotation.to_radians();
                let cos_rotation = rotation_radians.cos();
                let sin_rotation = rotation_radians.sin();

                self.state_mut().padding_right = font_size / 2.0;

                if sin_rotation * longest > self.state().max_height {
                    // Too tall even rotated; back off a step and stop.
                    self.state_mut().label_rotation -= 1.0;
                    break;
                }

                let state = self.state_mut();
                state.label_rotation += 1.0;
                state.label_width = cos_rotation * longest;
            }
        } else {
            let state = self.state_mut();
            state.label_width = 0.0;
            state.padding_left = 0.0;
            state.padding_right = 0.0;
        }

        let state = self.state_mut();
        state.padding_left = (state.padding_left - state.margins.left).max(0.0);
        state.padding_right = (state.padding_right - state.margins.right).max(0.0);
    }

    /// Derives the minimum occupied size from ticks, title and grid options.
    fn fit(&mut self, surface: &dyn DrawingSurface) {
        let horizontal = self.state().is_horizontal();
        let display = self.state().options.display;
        let grid_shown = self.state().options.grid_lines.show;
        let title = self.state().options.scale_label.clone();
        let ticks = self.state().options.ticks.clone();

        let mut min_size = Size::default();

        min_size.width = if horizontal {
            self.state().max_width
        } else if grid_shown && display {
            10.0
        } else {
            0.0
        };

        min_size.height = if horizontal {
            if grid_shown && display { 10.0 } else { 0.0 }
        } else {
            self.state().max_height
        };

        if title.show {
            if horizontal {
                min_size.height += title.font_size * 1.5;
            } else {
                min_size.width += title.font_size * 1.5;
            }
        }

        if ticks.show && display && !self.state().tick_labels.is_empty() {
            let longest = longest_text(surface, ticks.font_size, &self.state().tick_labels);

            if horizontal {
                let rotation_radians = self.state().label_rotation.to_radians();
                let label_height = rotation_radians.sin() * longest + 1.5 * ticks.font_size;
                min_size.height = self
                    .state()
                    .max_height
                    .min(min_size.height + label_height);

                let first_width =
                    surface.measure_text(&self.state().tick_labels[0], ticks.font_size);
                let last_label = self
                    .state()
                    .tick_labels
                    .last()
                    .cloned()
                    .unwrap_or_default();
                let last_width = surface.measure_text(&last_label, ticks.font_size);

                // Rotated ticks are right aligned; keep the first label inside
                // the canvas and reserve half the last one on the right.
                let state = self.state_mut();
                state.padding_left = if state.label_rotation != 0.0 {
                    rotation_radians.cos() * first_width + 3.0
                } else {
                    first_width / 2.0 + 3.0
                };
                state.padding_right = last_width / 2.0 + 4.0;
            } else {
                let max_label_width = self.state().max_width - min_size.width;
                let mut largest = longest;
                if !ticks.mirror {
                    largest += ticks.padding;
                }

                if largest < max_label_width {
                    min_size.width += largest;
                } else {
                    min_size.width = self.state().max_width;
                }

                let state = self.state_mut();
                state.padding_top = ticks.font_size / 2.0;
                state.padding_bottom = ticks.font_size / 2.0;
            }
        }

        let state = self.state_mut();
        state.padding_left = (state.padding_left - state.margins.left).max(0.0);
        state.padding_top = (state.padding_top - state.margins.top).max(0.0);
        state.padding_right = (state.padding_right - state.margins.right).max(0.0);
        state.padding_bottom = (state.padding_bottom - state.margins.bottom).max(0.0);

        state.min_size = min_size;
        state.width = min_size.width;
        state.height = min_size.height;
    }

    /// Pixel position of tick `index`, evenly subdividing the inner extent.
    fn get_pixel_for_tick(&self, index: usize, include_offset: bool) -> f64 {
        let state = self.state();
        let tick_count = state.tick_labels.len().max(1);

        if state.is_horizontal() {
            let slots = if state.options.grid_lines.offset_grid_lines {
                tick_count
            } else {
                tick_count.saturating_sub(1)
            }
            .max(1);
            let tick_width = state.inner_width() / slots as f64;
            let mut pixel = tick_width * index as f64 + state.padding_left;
            if include_offset {
                pixel += tick_width / 2.0;
            }
            state.left + pixel.round()
        } else {
            let slots = tick_count.saturating_sub(1).max(1);
            state.top + state.padding_top + index as f64 * (state.inner_height() / slots as f64)
        }
    }

    /// Pixel position of a fraction of the full axis extent.
    fn get_pixel_for_decimal(&self, decimal: f64) -> f64 {
        let state = self.state();
        if state.is_horizontal() {
            state.left + (state.inner_width() * decimal + state.padding_left).round()
        } else {
            state.top + decimal * state.height
        }
    }

    /// Draws grid lines, tick labels and the axis title.
    fn draw(&self, surface: &mut dyn DrawingSurface, chart_area: Rect) {
        let state = self.state();
        if !state.options.display {
            return;
        }

        let ticks = &state.options.ticks;
        let grid = &state.options.grid_lines;
        let title = &state.options.scale_label;

        let tick_font_color = Color::parse_or(&ticks.font_color, Color::rgb(0.4, 0.4, 0.4));
        let grid_color = Color::parse_or(&grid.color, Color::default_element());
        let zero_color = Color::parse_or(&grid.zero_line_color, Color::rgba(0.0, 0.0, 0.0, 0.25));

        if state.is_horizontal() {
            let (y_tick_start, y_tick_end) = if state.options.position == AxisPosition::Bottom {
                (state.top, state.top + 5.0)
            } else {
                (state.bottom - 5.0, state.bottom)
            };

            // Thin labels when they cannot all fit side by side.
            let inner_width = state.inner_width();
            let needed = (ticks.font_size + 4.0) * state.tick_labels.len() as f64;
            let skip_ratio = if needed > inner_width && inner_width > 0.0 {
                1 + (needed / inner_width) as usize
            } else {
                1
            };

            for (index, label) in state.tick_labels.iter().enumerate() {
                let last = index == state.tick_labels.len() - 1;
                if skip_ratio > 1 && index % skip_ratio != 0 && !last {
                    continue;
                }

                let mut x_line = self.get_pixel_for_tick(index, false);
                let x_label = self.get_pixel_for_tick(index, grid.offset_grid_lines);

                if grid.show {
                    let (line_width, line_color) = if state.zero_line_index == Some(index) {
                        (grid.zero_line_width, zero_color)
                    } else {
                        (grid.line_width, grid_color)
                    };
                    surface.set_line_width(line_width);
                    surface.set_stroke_color(line_color);

                    x_line += alias_pixel(line_width);

                    surface.begin_path();
                    if grid.draw_ticks {
                        surface.move_to(x_line, y_tick_start);
                        surface.line_to(x_line, y_tick_end);
                    }
                    if grid.draw_on_chart_area {
                        surface.move_to(x_line, chart_area.top);
                        surface.line_to(x_line, chart_area.bottom);
                    }
                    surface.stroke();
                }

                if ticks.show {
                    let rotated = state.label_rotation != 0.0;
                    let label_y = if state.options.position == AxisPosition::Top {
                        state.bottom - 10.0
                    } else {
                        state.top + 10.0
                    };

                    surface.save();
                    surface.translate(x_label, label_y);
                    surface.rotate(-state.label_rotation.to_radians());
                    surface.set_fill_color(tick_font_color);
                    surface.fill_text(
                        label,
                        0.0,
                        0.0,
                        ticks.font_size,
                        if rotated {
                            TextAlign::Right
                        } else {
                            TextAlign::Center
                        },
                        if state.options.position == AxisPosition::Top {
                            TextBaseline::Bottom
                        } else {
                            TextBaseline::Top
                        },
                    );
                    surface.restore();
                }
            }

            if title.show {
                let title_x = (state.left + state.right) / 2.0;
                let title_y = if state.options.position == AxisPosition::Bottom {
                    state.bottom - title.font_size / 2.0
                } else {
                    state.top + title.font_size / 2.0
                };
                surface.set_fill_color(Color::parse_or(
                    &title.font_color,
                    Color::rgb(0.4, 0.4, 0.4),
                ));
                surface.fill_text(
                    &title.label,
                    title_x,
                    title_y,
                    title.font_size,
                    TextAlign::Center,
                    TextBaseline::Middle,
                );
            }
        } else {
            for (index, label) in state.tick_labels.iter().enumerate() {
                let mut y_line = self.get_pixel_for_tick(index, false);

                if grid.show {
                    let (line_width, line_color) = if state.zero_line_index == Some(index) {
                        (grid.zero_line_width, zero_color)
                    } else {
                        (grid.line_width, grid_color)
                    };
                    surface.set_line_width(line_width);
                    surface.set_stroke_color(line_color);

                    y_line += alias_pixel(line_width);

                    surface.begin_path();
                    if grid.draw_on_chart_area {
                        surface.move_to(chart_area.left, y_line);
                        surface.line_to(chart_area.right, y_line);
                    }
                    surface.stroke();
                }

                if ticks.show {
                    let y_label = self.get_pixel_for_tick(index, grid.offset_grid_lines);
                    let (x_label, align) = if state.options.position == AxisPosition::Left {
                        if ticks.mirror {
                            (state.right + ticks.padding, TextAlign::Left)
                        } else {
                            (state.right - ticks.padding, TextAlign::Right)
                        }
                    } else if ticks.mirror {
                        (state.left - ticks.padding, TextAlign::Right)
                    } else {
                        (state.left + ticks.padding, TextAlign::Left)
                    };

                    surface.set_fill_color(tick_font_color);
                    surface.fill_text(
                        label,
                        x_label,
                        y_label,
                        ticks.font_size,
                        align,
                        TextBaseline::Middle,
                    );
                }
            }

            if title.show {
                let title_x = if state.options.position == AxisPosition::Left {
                    state.left + title.font_size / 2.0
                } else {
                    state.right - title.font_size / 2.0
                };
                let title_y = (state.top + state.bottom) / 2.0;
                let rotation = if state.options.position == AxisPosition::Left {
                    -0.5 * std::f64::consts::PI
                } else {
                    0.5 * std::f64::consts::PI
                };

                surface.save();
                surface.translate(title_x, title_y);
                surface.rotate(rotation);
                surface.set_fill_color(Color::parse_or(
                    &title.font_color,
                    Color::rgb(0.4, 0.4, 0.4),
                ));
                surface.fill_text(
                    &title.label,
                    0.0,
                    0.0,
                    title.font_size,
                    TextAlign::Center,
                    TextBaseline::Middle,
                );
                surface.restore();
            }
        }
    }
}

impl std::fmt::Debug for dyn Scale + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scale").field("state", self.state()).finish_non_exhaustive()
    }
}

/// Compact float formatting without trailing zeros.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{value:.4}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}
