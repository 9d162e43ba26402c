//! Scale layout negotiation.
//!
//! Every scale on each of the four edges bids for space through repeated
//! `update` calls: a generous first pass collects minimum footprints, a
//! second pass refits at those minimums with cross-axis margins applied, and
//! a final grow-only adjustment re-propagates sizes without refitting.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::core::scale::{AxisPosition, Scale, ScaleContext};
use crate::core::types::{Margins, Rect, Size};
use crate::render::DrawingSurface;

// Charts rarely carry more than two scales per edge.
type EdgeIds = SmallVec<[String; 2]>;

fn ids_at(scales: &IndexMap<String, Box<dyn Scale>>, position: AxisPosition) -> EdgeIds {
    scales
        .iter()
        .filter(|(_, scale)| scale.state().options.position == position)
        .map(|(id, _)| id.clone())
        .collect()
}

fn sum_widths(scales: &IndexMap<String, Box<dyn Scale>>, ids: &[String]) -> f64 {
    ids.iter()
        .filter_map(|id| scales.get(id))
        .map(|scale| scale.state().width)
        .sum()
}

fn sum_heights(scales: &IndexMap<String, Box<dyn Scale>>, ids: &[String]) -> f64 {
    ids.iter()
        .filter_map(|id| scales.get(id))
        .map(|scale| scale.state().height)
        .sum()
}

/// Negotiates edge space among all scales and returns the plot rectangle.
///
/// The grow-only final adjustment means a label rotation triggered by the
/// margin pass can leave slightly more edge space reserved than strictly
/// needed; the area never shrinks below what the refit produced.
pub fn layout_scales(
    scales: &mut IndexMap<String, Box<dyn Scale>>,
    data: &ScaleContext<'_>,
    surface: &dyn DrawingSurface,
    width: f64,
    height: f64,
) -> Rect {
    let x_padding = if width > 30.0 { 5.0 } else { 2.0 };
    let y_padding = if height > 30.0 { 5.0 } else { 2.0 };

    let left_ids = ids_at(scales, AxisPosition::Left);
    let right_ids = ids_at(scales, AxisPosition::Right);
    let top_ids = ids_at(scales, AxisPosition::Top);
    let bottom_ids = ids_at(scales, AxisPosition::Bottom);
    let overlay_ids = ids_at(scales, AxisPosition::ChartArea);

    // Seed the negotiation with half the canvas for the plot.
    let chart_width = width / 2.0 - 2.0 * x_padding;
    let chart_height = height / 2.0 - 2.0 * y_padding;

    let vertical_count = left_ids.len() + right_ids.len();
    let horizontal_count = top_ids.len() + bottom_ids.len();
    let vertical_scale_width = (width - chart_width) / vertical_count.max(1) as f64;
    let horizontal_scale_height = (height - chart_height) / horizontal_count.max(1) as f64;

    // First pass: generous allocations, collect minimum footprints.
    let mut min_sizes: IndexMap<String, Size> = IndexMap::new();
    for id in left_ids.iter().chain(&right_ids) {
        if let Some(scale) = scales.get_mut(id) {
            let min = scale.update(surface, data, vertical_scale_width, chart_height, None);
            min_sizes.insert(id.clone(), min);
        }
    }
    for id in top_ids.iter().chain(&bottom_ids) {
        if let Some(scale) = scales.get_mut(id) {
            let min = scale.update(surface, data, chart_width, horizontal_scale_height, None);
            min_sizes.insert(id.clone(), min);
        }
    }

    // Plot size if every scale shrinks to its minimum.
    let mut max_chart_height = height - 2.0 * y_padding;
    let mut max_chart_width = width - 2.0 * x_padding;
    for id in left_ids.iter().chain(&right_ids) {
        if let Some(min) = min_sizes.get(id) {
            max_chart_width -= min.width;
        }
    }
    for id in top_ids.iter().chain(&bottom_ids) {
        if let Some(min) = min_sizes.get(id) {
            max_chart_height -= min.height;
        }
    }

    // Refit verticals at their minimum widths against the tall plot.
    for id in left_ids.iter().chain(&right_ids) {
        if let (Some(scale), Some(min)) = (scales.get_mut(id), min_sizes.get(id).copied()) {
            scale.update(surface, data, min.width, max_chart_height, None);
        }
    }

    let mut total_left_width = x_padding + sum_widths(scales, &left_ids);
    let mut total_right_width = x_padding + sum_widths(scales, &right_ids);

    // Horizontals now know how much the verticals consume on each side.
    for id in top_ids.iter().chain(&bottom_ids) {
        if let (Some(scale), Some(min)) = (scales.get_mut(id), min_sizes.get(id).copied()) {
            let margins = Margins {
                left: total_left_width,
                right: total_right_width,
                top: 0.0,
                bottom: 0.0,
            };
            scale.update(surface, data, max_chart_width, min.height, Some(margins));
        }
    }

    let mut total_top_height = y_padding + sum_heights(scales, &top_ids);
    let mut total_bottom_height = y_padding + sum_heights(scales, &bottom_ids);

    // And the verticals learn the horizontal totals.
    for id in left_ids.iter().chain(&right_ids) {
        if let (Some(scale), Some(min)) = (scales.get_mut(id), min_sizes.get(id).copied()) {
            let margins = Margins {
                left: 0.0,
                right: 0.0,
                top: total_top_height,
                bottom: total_bottom_height,
            };
            scale.update(surface, data, min.width, max_chart_height, Some(margins));
        }
    }

    total_left_width = x_padding + sum_widths(scales, &left_ids);
    total_right_width = x_padding + sum_widths(scales, &right_ids);
    total_top_height = y_padding + sum_heights(scales, &top_ids);
    total_bottom_height = y_padding + sum_heights(scales, &bottom_ids);

    // The margin pass can only have grown the edges (label rotation, say),
    // so propagate the new plot size without another fit.
    let new_max_chart_height = height - total_top_height - total_bottom_height;
    let new_max_chart_width = width - total_left_width - total_right_width;
    if new_max_chart_width != max_chart_width || new_max_chart_height != max_chart_height {
        for id in left_ids.iter().chain(&right_ids) {
            if let Some(scale) = scales.get_mut(id) {
                scale.state_mut().height = new_max_chart_height;
            }
        }
        for id in top_ids.iter().chain(&bottom_ids) {
            if let Some(scale) = scales.get_mut(id) {
                scale.state_mut().width = new_max_chart_width;
            }
        }
        max_chart_height = new_max_chart_height;
        max_chart_width = new_max_chart_width;
    }

    // Edge-outward placement.
    let mut left_cursor = x_padding;
    let mut top_cursor = y_padding;

    for id in &left_ids {
        if let Some(scale) = scales.get_mut(id) {
            let state = scale.state_mut();
            state.left = left_cursor;
            state.right = left_cursor + state.width;
            state.top = total_top_height;
            state.bottom = total_top_height + max_chart_height;
            left_cursor = state.right;
        }
    }
    for id in &top_ids {
        if let Some(scale) = scales.get_mut(id) {
            let state = scale.state_mut();
            state.left = total_left_width;
            state.right = total_left_width + max_chart_width;
            state.top = top_cursor;
            state.bottom = top_cursor + state.height;
            top_cursor = state.bottom;
        }
    }

    left_cursor += max_chart_width;
    top_cursor += max_chart_height;

    for id in &right_ids {
        if let Some(scale) = scales.get_mut(id) {
            let state = scale.state_mut();
            state.left = left_cursor;
            state.right = left_cursor + state.width;
            state.top = total_top_height;
            state.bottom = total_top_height + max_chart_height;
            left_cursor = state.right;
        }
    }
    for id in &bottom_ids {
        if let Some(scale) = scales.get_mut(id) {
            let state = scale.state_mut();
            state.left = total_left_width;
            state.right = total_left_width + max_chart_width;
            state.top = top_cursor;
            state.bottom = top_cursor + state.height;
            top_cursor = state.bottom;
        }
    }

    let chart_area = Rect::new(
        total_left_width,
        total_top_height,
        total_left_width + max_chart_width,
        total_top_height + max_chart_height,
    );

    // Overlay scales span the plot itself.
    for id in &overlay_ids {
        if let Some(scale) = scales.get_mut(id) {
            scale.update(surface, data, max_chart_width, max_chart_height, None);
            let state = scale.state_mut();
            state.left = chart_area.left;
            state.top = chart_area.top;
            state.right = chart_area.right;
            state.bottom = chart_area.bottom;
        }
    }

    debug!(
        left = chart_area.left,
        top = chart_area.top,
        right = chart_area.right,
        bottom = chart_area.bottom,
        "chart area laid out"
    );

    chart_area
}
