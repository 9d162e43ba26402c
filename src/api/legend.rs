//! Legend generation: structured items plus the stock markup renderer.

use crate::api::chart::Chart;
use crate::core::color::Color;

/// One legend entry, derived from a dataset's resolved styling.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub dataset_index: usize,
    pub label: String,
    pub background_color: Color,
    pub border_color: Color,
    pub hidden: bool,
}

impl Chart {
    /// Legend entries in dataset order, including hidden datasets so a host
    /// can render toggle controls.
    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        let defaults = &self.config().options.elements.line;
        self.config()
            .data
            .datasets
            .iter()
            .enumerate()
            .map(|(dataset_index, dataset)| LegendItem {
                dataset_index,
                label: dataset.label.clone(),
                background_color: Color::parse_or(
                    dataset
                        .background_color
                        .as_deref()
                        .unwrap_or(&defaults.background_color),
                    Color::default_element(),
                ),
                border_color: Color::parse_or(
                    dataset
                        .border_color
                        .as_deref()
                        .unwrap_or(&defaults.border_color),
                    Color::default_element(),
                ),
                hidden: dataset.hidden,
            })
            .collect()
    }

    /// Simple list markup for hosts that embed the legend in a document.
    #[must_use]
    pub fn generate_legend(&self) -> String {
        let mut text = String::new();
        text.push_str(&format!("<ul class=\"{}-legend\">", self.config().kind));
        for item in self.legend_items() {
            text.push_str(&format!(
                "<li><span style=\"background-color:{}\"></span>{}</li>",
                item.background_color, item.label
            ));
        }
        text.push_str("</ul>");
        text
    }
}
