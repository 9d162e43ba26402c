//! Tooltip: layered text callbacks, model/view animation and canvas-bound
//! placement.

use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::core::element::{Animatable, Element, lerp};
use crate::core::math::Point;
use crate::core::types::Size;
use crate::interaction::{ElementRef, HitMode};
use crate::render::{DrawingSurface, TextAlign, TextBaseline, trace_rounded_rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipOptions {
    pub enabled: bool,
    pub mode: HitMode,
    pub background_color: String,
    pub title_font_size: f64,
    pub title_spacing: f64,
    pub title_margin_bottom: f64,
    pub title_color: String,
    pub body_font_size: f64,
    pub body_spacing: f64,
    pub body_color: String,
    pub footer_font_size: f64,
    pub footer_spacing: f64,
    pub footer_margin_top: f64,
    pub footer_color: String,
    pub x_padding: f64,
    pub y_padding: f64,
    pub caret_size: f64,
    pub corner_radius: f64,
    pub multi_key_background: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: HitMode::Single,
            background_color: "rgba(0, 0, 0, 0.8)".to_owned(),
            title_font_size: 12.0,
            title_spacing: 2.0,
            title_margin_bottom: 6.0,
            title_color: "#fff".to_owned(),
            body_font_size: 12.0,
            body_spacing: 2.0,
            body_color: "#fff".to_owned(),
            footer_font_size: 12.0,
            footer_spacing: 2.0,
            footer_margin_top: 6.0,
            footer_color: "#fff".to_owned(),
            x_padding: 6.0,
            y_padding: 6.0,
            caret_size: 5.0,
            corner_radius: 6.0,
            multi_key_background: "#fff".to_owned(),
        }
    }
}

/// One active element's labels, as handed to the text callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipItem {
    pub x_label: String,
    pub y_label: String,
    pub index: usize,
    pub dataset_index: usize,
}

/// Slice of chart data the text callbacks may consult.
#[derive(Debug, Clone, Default)]
pub struct TooltipDataView<'a> {
    pub labels: &'a [String],
    pub dataset_labels: Vec<&'a str>,
}

/// Layered text pipeline; override any layer, the rest keep their defaults.
/// Returned lines are concatenated in before/core/after order.
pub trait TooltipCallbacks {
    fn before_title(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn title(&self, items: &[TooltipItem], data: &TooltipDataView<'_>) -> Vec<String> {
        let Some(first) = items.first() else {
            return Vec::new();
        };
        if !first.x_label.is_empty() {
            vec![first.x_label.clone()]
        } else if first.index < data.labels.len() {
            vec![data.labels[first.index].clone()]
        } else {
            Vec::new()
        }
    }

    fn after_title(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn before_body(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn before_label(&self, _item: &TooltipItem, _data: &TooltipDataView<'_>) -> String {
        String::new()
    }

    fn label(&self, item: &TooltipItem, data: &TooltipDataView<'_>) -> String {
        let dataset_label = data
            .dataset_labels
            .get(item.dataset_index)
            .copied()
            .unwrap_or_default();
        format!("{dataset_label}: {}", item.y_label)
    }

    fn after_label(&self, _item: &TooltipItem, _data: &TooltipDataView<'_>) -> String {
        String::new()
    }

    fn after_body(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn before_footer(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn footer(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }

    fn after_footer(&self, _items: &[TooltipItem], _data: &TooltipDataView<'_>) -> Vec<String> {
        Vec::new()
    }
}

/// The stock pipeline: first x-label as title, "dataset: value" body lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTooltipCallbacks;

impl TooltipCallbacks for DefaultTooltipCallbacks {}

/// Swatch colors for one body line in multi mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelColors {
    pub background_color: Color,
    pub border_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipModel {
    pub x: f64,
    pub y: f64,
    pub caret_padding: f64,
    pub opacity: f64,
    pub background_color: Color,
    pub title_lines: Vec<String>,
    pub before_body_lines: Vec<String>,
    pub body_lines: Vec<String>,
    pub after_body_lines: Vec<String>,
    pub footer_lines: Vec<String>,
    pub label_colors: Vec<LabelColors>,
    /// Body lines carry color swatches when set.
    pub multi: bool,
}

impl TooltipModel {
    #[must_use]
    pub fn hidden(background_color: Color) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            caret_padding: 2.0,
            opacity: 0.0,
            background_color,
            title_lines: Vec::new(),
            before_body_lines: Vec::new(),
            body_lines: Vec::new(),
            after_body_lines: Vec::new(),
            footer_lines: Vec::new(),
            label_colors: Vec::new(),
            multi: false,
        }
    }
}

impl Animatable for TooltipModel {
    fn interpolate(start: &Self, target: &Self, ease: f64) -> Self {
        Self {
            x: lerp(start.x, target.x, ease),
            y: lerp(start.y, target.y, ease),
            caret_padding: target.caret_padding,
            opacity: lerp(start.opacity, target.opacity, ease),
            background_color: Color::mix(start.background_color, target.background_color, ease),
            title_lines: target.title_lines.clone(),
            before_body_lines: target.before_body_lines.clone(),
            body_lines: target.body_lines.clone(),
            after_body_lines: target.after_body_lines.clone(),
            footer_lines: target.footer_lines.clone(),
            label_colors: target.label_colors.clone(),
            multi: target.multi,
        }
    }
}

/// Inputs the chart assembles for one tooltip refresh.
#[derive(Debug, Clone, Default)]
pub struct TooltipUpdateInput<'a> {
    pub items: Vec<TooltipItem>,
    /// Anchor position and caret padding of each active element.
    pub positions: Vec<(Point, f64)>,
    /// Overrides the averaged y in multi mode (mid-axis pinning).
    pub pinned_y: Option<f64>,
    pub label_colors: Vec<LabelColors>,
    pub data: TooltipDataView<'a>,
}

/// The tooltip element: holds an animated model plus its active references.
#[derive(Debug, Clone)]
pub struct Tooltip {
    element: Element<TooltipModel>,
    options: TooltipOptions,
    pub active: Vec<ElementRef>,
}

fn extend_lines(base: &mut Vec<String>, extra: Vec<String>) {
    for line in extra {
        if !line.is_empty() {
            base.push(line);
        }
    }
}

fn faded(color: Color, opacity: f64) -> Color {
    color.with_alpha_scaled(opacity)
}

impl Tooltip {
    #[must_use]
    pub fn new(options: TooltipOptions) -> Self {
        let background =
            Color::parse_or(&options.background_color, Color::rgba(0.0, 0.0, 0.0, 0.8));
        Self {
            element: Element::new(TooltipModel::hidden(background)),
            options,
            active: Vec::new(),
        }
    }

    /// Resets the model to the hidden state without dropping the view, so a
    /// reappearing tooltip fades in from wherever it last was.
    pub fn initialize(&mut self) {
        let background = self
            .options
            .parse_background();
        self.element.model_mut().opacity = 0.0;
        self.element.model_mut().background_color = background;
    }

    #[must_use]
    pub fn options(&self) -> &TooltipOptions {
        &self.options
    }

    #[must_use]
    pub fn model(&self) -> &TooltipModel {
        self.element.model()
    }

    #[must_use]
    pub fn view(&self) -> &TooltipModel {
        self.element.view()
    }

    pub fn pivot(&mut self) {
        self.element.pivot();
    }

    /// Mean anchor of the active elements, rounded to whole pixels.
    #[must_use]
    pub fn average_position(positions: &[(Point, f64)]) -> Option<(Point, f64)> {
        if positions.is_empty() {
            return None;
        }
        let count = positions.len() as f64;
        let sum_x: f64 = positions.iter().map(|(p, _)| p.x).sum();
        let sum_y: f64 = positions.iter().map(|(p, _)| p.y).sum();
        let padding = positions
            .iter()
            .map(|(_, padding)| *padding)
            .fold(0.0, f64::max);
        Some((
            Point::new((sum_x / count).round(), (sum_y / count).round()),
            padding,
        ))
    }

    /// Rebuilds the target model from the current active elements.
    pub fn update(&mut self, input: &TooltipUpdateInput<'_>, callbacks: &dyn TooltipCallbacks) {
        if input.items.is_empty() {
            self.element.model_mut().opacity = 0.0;
            return;
        }

        let Some((mut position, caret_padding)) = Self::average_position(&input.positions) else {
            self.element.model_mut().opacity = 0.0;
            return;
        };
        if let Some(pinned_y) = input.pinned_y {
            position.y = pinned_y;
        }

        let mut title_lines = Vec::new();
        extend_lines(&mut title_lines, callbacks.before_title(&input.items, &input.data));
        extend_lines(&mut title_lines, callbacks.title(&input.items, &input.data));
        extend_lines(&mut title_lines, callbacks.after_title(&input.items, &input.data));

        let before_body_lines = callbacks.before_body(&input.items, &input.data);
        let body_lines: Vec<String> = input
            .items
            .iter()
            .map(|item| {
                let before = callbacks.before_label(item, &input.data);
                let label = callbacks.label(item, &input.data);
                let after = callbacks.after_label(item, &input.data);
                format!("{before}{label}{after}")
            })
            .collect();
        let after_body_lines = callbacks.after_body(&input.items, &input.data);

        let mut footer_lines = Vec::new();
        extend_lines(&mut footer_lines, callbacks.before_footer(&input.items, &input.data));
        extend_lines(&mut footer_lines, callbacks.footer(&input.items, &input.data));
        extend_lines(&mut footer_lines, callbacks.after_footer(&input.items, &input.data));

        let model = self.element.model_mut();
        model.opacity = 1.0;
        model.x = position.x;
        model.y = position.y;
        model.caret_padding = caret_padding.max(2.0);
        model.title_lines = title_lines;
        model.before_body_lines = before_body_lines;
        model.body_lines = body_lines;
        model.after_body_lines = after_body_lines;
        model.footer_lines = footer_lines;
        model.label_colors = input.label_colors.clone();
        model.multi = self.options.mode != HitMode::Single;
    }

    /// Advances the view toward the model and paints it.
    pub fn draw(&mut self, surface: &mut dyn DrawingSurface, ease: f64, canvas: Size) {
        let options = self.options.clone();
        let view = self.element.transition(ease).clone();

        if view.opacity == 0.0 || !options.enabled {
            return;
        }

        let caret_padding = view.caret_padding;
        let combined_body_len =
            view.body_lines.len() + view.before_body_lines.len() + view.after_body_lines.len();

        let mut height = options.y_padding * 2.0;
        if !view.title_lines.is_empty() {
            height += view.title_lines.len() as f64 * options.title_font_size;
            height += (view.title_lines.len() - 1) as f64 * options.title_spacing;
            height += options.title_margin_bottom;
        }
        height += combined_body_len as f64 * options.body_font_size;
        height += combined_body_len.saturating_sub(1) as f64 * options.body_spacing;
        if !view.footer_lines.is_empty() {
            height += options.footer_margin_top;
            height += view.footer_lines.len() as f64 * options.footer_font_size;
            height += (view.footer_lines.len() - 1) as f64 * options.footer_spacing;
        }

        let swatch_extra = if view.multi {
            options.body_font_size + 2.0
        } else {
            0.0
        };
        let mut width: f64 = 0.0;
        for line in &view.title_lines {
            width = width.max(surface.measure_text(line, options.title_font_size));
        }
        for line in view.before_body_lines.iter().chain(&view.after_body_lines) {
            width = width.max(surface.measure_text(line, options.body_font_size));
        }
        for line in &view.body_lines {
            width = width.max(surface.measure_text(line, options.body_font_size) + swatch_extra);
        }
        for line in &view.footer_lines {
            width = width.max(surface.measure_text(line, options.footer_font_size));
        }
        width += 2.0 * options.x_padding;
        let total_width = width + options.caret_size + caret_padding;

        // Keep the box on the canvas: flip left of the anchor when it would
        // overflow the right edge, slide up or down near the top and bottom.
        let y_align = if view.y - height / 2.0 < 0.0 {
            VerticalAlign::Top
        } else if view.y + height / 2.0 > canvas.height {
            VerticalAlign::Bottom
        } else {
            VerticalAlign::Center
        };
        let flip_left = view.x + total_width > canvas.width;

        let box_y = match y_align {
            VerticalAlign::Top => view.y - options.caret_size - options.corner_radius,
            VerticalAlign::Bottom => view.y - height + options.caret_size + options.corner_radius,
            VerticalAlign::Center => view.y - height / 2.0,
        };
        let box_x = if flip_left {
            view.x - total_width
        } else {
            view.x + caret_padding + options.caret_size
        };

        let background = faded(view.background_color, view.opacity);

        surface.set_fill_color(background);
        trace_rounded_rect(surface, box_x, box_y, width, height, options.corner_radius);
        surface.fill();

        // Caret, pointing back at the anchor.
        surface.begin_path();
        if flip_left {
            surface.move_to(view.x - caret_padding, view.y);
            surface.line_to(
                view.x - caret_padding - options.caret_size,
                view.y - options.caret_size,
            );
            surface.line_to(
                view.x - caret_padding - options.caret_size,
                view.y + options.caret_size,
            );
        } else {
            surface.move_to(view.x + caret_padding, view.y);
            surface.line_to(
                view.x + caret_padding + options.caret_size,
                view.y - options.caret_size,
            );
            surface.line_to(
                view.x + caret_padding + options.caret_size,
                view.y + options.caret_size,
            );
        }
        surface.close_path();
        surface.fill();

        let x_base = box_x + options.x_padding;
        let mut y_base = box_y + options.y_padding;

        let title_color = faded(
            Color::parse_or(&options.title_color, Color::rgb(1.0, 1.0, 1.0)),
            view.opacity,
        );
        let body_color = faded(
            Color::parse_or(&options.body_color, Color::rgb(1.0, 1.0, 1.0)),
            view.opacity,
        );
        let footer_color = faded(
            Color::parse_or(&options.footer_color, Color::rgb(1.0, 1.0, 1.0)),
            view.opacity,
        );
        let key_background = faded(
            Color::parse_or(&options.multi_key_background, Color::rgb(1.0, 1.0, 1.0)),
            view.opacity,
        );

        surface.set_fill_color(title_color);
        for (index, line) in view.title_lines.iter().enumerate() {
            surface.fill_text(
                line,
                x_base,
                y_base,
                options.title_font_size,
                TextAlign::Left,
                TextBaseline::Top,
            );
            y_base += options.title_font_size + options.title_spacing;
            if index + 1 == view.title_lines.len() {
                y_base += options.title_margin_bottom - options.title_spacing;
            }
        }

        surface.set_fill_color(body_color);
        for line in &view.before_body_lines {
            surface.fill_text(
                line,
                x_base,
                y_base,
                options.body_font_size,
                TextAlign::Left,
                TextBaseline::Top,
            );
            y_base += options.body_font_size + options.body_spacing;
        }

        for (index, line) in view.body_lines.iter().enumerate() {
            if view.multi {
                if let Some(colors) = view.label_colors.get(index) {
                    // White backing square so translucent fills read correctly.
                    surface.set_fill_color(key_background);
                    surface.fill_rect(x_base, y_base, options.body_font_size, options.body_font_size);

                    surface.set_stroke_color(faded(colors.border_color, view.opacity));
                    surface.stroke_rect(
                        x_base,
                        y_base,
                        options.body_font_size,
                        options.body_font_size,
                    );

                    surface.set_fill_color(faded(colors.background_color, view.opacity));
                    surface.fill_rect(
                        x_base + 1.0,
                        y_base + 1.0,
                        options.body_font_size - 2.0,
                        options.body_font_size - 2.0,
                    );

                    surface.set_fill_color(body_color);
                }
            }

            surface.fill_text(
                line,
                x_base + swatch_extra,
                y_base,
                options.body_font_size,
                TextAlign::Left,
                TextBaseline::Top,
            );
            y_base += options.body_font_size + options.body_spacing;
        }

        for line in &view.after_body_lines {
            surface.fill_text(
                line,
                x_base,
                y_base,
                options.body_font_size,
                TextAlign::Left,
                TextBaseline::Top,
            );
            y_base += options.body_font_size;
        }
        y_base -= options.body_spacing;

        if !view.footer_lines.is_empty() {
            y_base += options.footer_margin_top;
            surface.set_fill_color(footer_color);
            for line in &view.footer_lines {
                surface.fill_text(
                    line,
                    x_base,
                    y_base,
                    options.footer_font_size,
                    TextAlign::Left,
                    TextBaseline::Top,
                );
                y_base += options.footer_font_size + options.footer_spacing;
            }
        }
    }
}

impl TooltipOptions {
    fn parse_background(&self) -> Color {
        Color::parse_or(&self.background_color, Color::rgba(0.0, 0.0, 0.0, 0.8))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn labels() -> Vec<String> {
        vec!["Jan".to_owned(), "Feb".to_owned()]
    }

    fn item(index: usize, dataset_index: usize) -> TooltipItem {
        TooltipItem {
            x_label: "Feb".to_owned(),
            y_label: "42".to_owned(),
            index,
            dataset_index,
        }
    }

    #[test]
    fn default_callbacks_compose_title_and_body() {
        let callbacks = DefaultTooltipCallbacks;
        let labels = labels();
        let data = TooltipDataView {
            labels: &labels,
            dataset_labels: vec!["Revenue"],
        };
        let items = vec![item(1, 0)];

        assert_eq!(callbacks.title(&items, &data), vec!["Feb".to_owned()]);
        assert_eq!(callbacks.label(&items[0], &data), "Revenue: 42");
    }

    #[test]
    fn update_with_no_items_hides_the_tooltip() {
        let mut tooltip = Tooltip::new(TooltipOptions::default());
        tooltip.update(&TooltipUpdateInput::default(), &DefaultTooltipCallbacks);
        assert_eq!(tooltip.model().opacity, 0.0);
    }

    #[test]
    fn update_averages_positions_and_pins_y_in_multi_mode() {
        let mut options = TooltipOptions::default();
        options.mode = HitMode::Label;
        let mut tooltip = Tooltip::new(options);

        let labels = labels();
        let input = TooltipUpdateInput {
            items: vec![item(1, 0), item(1, 1)],
            positions: vec![
                (Point::new(10.0, 40.0), 4.0),
                (Point::new(30.0, 80.0), 4.0),
            ],
            pinned_y: Some(120.0),
            label_colors: Vec::new(),
            data: TooltipDataView {
                labels: &labels,
                dataset_labels: vec!["A", "B"],
            },
        };
        tooltip.update(&input, &DefaultTooltipCallbacks);

        let model = tooltip.model();
        assert_eq!(model.x, 20.0);
        assert_eq!(model.y, 120.0);
        assert_eq!(model.opacity, 1.0);
        assert!(model.multi);
        assert_eq!(model.body_lines.len(), 2);
    }

    #[test]
    fn hidden_tooltip_draws_nothing() {
        let mut tooltip = Tooltip::new(TooltipOptions::default());
        let mut surface = RecordingSurface::new();
        tooltip.draw(&mut surface, 1.0, Size { width: 400.0, height: 300.0 });
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn visible_tooltip_paints_box_caret_and_text() {
        let mut tooltip = Tooltip::new(TooltipOptions::default());
        let labels = labels();
        let input = TooltipUpdateInput {
            items: vec![item(0, 0)],
            positions: vec![(Point::new(100.0, 100.0), 4.0)],
            pinned_y: None,
            label_colors: Vec::new(),
            data: TooltipDataView {
                labels: &labels,
                dataset_labels: vec!["A"],
            },
        };
        tooltip.update(&input, &DefaultTooltipCallbacks);

        let mut surface = RecordingSurface::new();
        tooltip.draw(&mut surface, 1.0, Size { width: 400.0, height: 300.0 });
        assert!(surface.fill_count() >= 2);
        assert!(surface.text_count() >= 2);
    }
}
