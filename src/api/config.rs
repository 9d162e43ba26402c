//! Chart configuration: serde-backed option tree with the stock defaults.

use serde::{Deserialize, Serialize};

use crate::core::easing::Easing;
use crate::core::scale::{AxisKind, AxisOptions, AxisPosition};
use crate::core::types::DataValue;
use crate::error::{ChartError, ChartResult};
use crate::interaction::tooltip::TooltipOptions;
use crate::interaction::{HitMode, PointerEventKind};
use crate::render::{LineCap, LineJoin};

fn default_kind() -> String {
    "line".to_owned()
}

/// A style option given once for the whole dataset or per data point.
///
/// Per-point arrays resolve index-wise; an index past the end of the array
/// falls back to the element default, so short arrays are not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrVec<T> {
    Scalar(T),
    Vec(Vec<T>),
}

impl<T> ScalarOrVec<T> {
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&T> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Vec(values) => values.get(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub data: ChartData,
    #[serde(default)]
    pub options: ChartOptions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            data: ChartData::default(),
            options: ChartOptions::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = labels;
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetConfig) -> Self {
        self.data.datasets.push(dataset);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.options.scales.x_axes.is_empty() || self.options.scales.y_axes.is_empty() {
            return Err(ChartError::InvalidData(
                "chart requires at least one x axis and one y axis".to_owned(),
            ));
        }
        for dataset in &self.data.datasets {
            for value in &dataset.data {
                if let DataValue::Number(number) = value {
                    if number.is_infinite() {
                        return Err(ChartError::InvalidData(format!(
                            "dataset '{}' contains an infinite value",
                            dataset.label
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetConfig>,
}

/// One series plus its per-dataset style overrides. Unset styling falls back
/// to the element defaults in [`ElementOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasetConfig {
    pub label: String,
    pub data: Vec<DataValue>,
    /// Per-dataset chart kind override; stacking groups by it.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub hidden: bool,
    #[serde(rename = "xAxisID")]
    pub x_axis_id: Option<String>,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: Option<String>,

    pub fill: Option<bool>,
    pub tension: Option<f64>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub border_dash: Option<Vec<f64>>,

    pub point_radius: Option<ScalarOrVec<f64>>,
    pub point_background_color: Option<ScalarOrVec<String>>,
    pub point_border_color: Option<ScalarOrVec<String>>,
    pub point_border_width: Option<ScalarOrVec<f64>>,
    pub point_hit_radius: Option<ScalarOrVec<f64>>,

    pub point_hover_radius: Option<ScalarOrVec<f64>>,
    pub point_hover_background_color: Option<ScalarOrVec<String>>,
    pub point_hover_border_color: Option<ScalarOrVec<String>>,
    pub point_hover_border_width: Option<ScalarOrVec<f64>>,
}

impl DatasetConfig {
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<DataValue>) -> Self {
        Self {
            label: label.into(),
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_colors(
        mut self,
        background_color: impl Into<String>,
        border_color: impl Into<String>,
    ) -> Self {
        self.background_color = Some(background_color.into());
        self.border_color = Some(border_color.into());
        self
    }

    #[must_use]
    pub fn with_axes(mut self, x_axis_id: impl Into<String>, y_axis_id: impl Into<String>) -> Self {
        self.x_axis_id = Some(x_axis_id.into());
        self.y_axis_id = Some(y_axis_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub scales: ScalesOptions,
    pub elements: ElementOptions,
    pub animation: AnimationOptions,
    pub hover: HoverOptions,
    pub tooltips: TooltipOptions,
    /// Pointer event classes the chart responds to.
    pub events: Vec<PointerEventKind>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            scales: ScalesOptions::default(),
            elements: ElementOptions::default(),
            animation: AnimationOptions::default(),
            hover: HoverOptions::default(),
            tooltips: TooltipOptions::default(),
            events: PointerEventKind::default_events(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalesOptions {
    pub x_axes: Vec<AxisOptions>,
    pub y_axes: Vec<AxisOptions>,
}

impl Default for ScalesOptions {
    fn default() -> Self {
        Self {
            x_axes: vec![AxisOptions {
                id: Some("x-axis-0".to_owned()),
                kind: AxisKind::Category,
                position: AxisPosition::Bottom,
                ..AxisOptions::default()
            }],
            y_axes: vec![AxisOptions {
                id: Some("y-axis-0".to_owned()),
                kind: AxisKind::Linear,
                position: AxisPosition::Left,
                ..AxisOptions::default()
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ElementOptions {
    pub point: PointElementOptions,
    pub line: LineElementOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointElementOptions {
    pub radius: f64,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub hit_radius: f64,
    pub hover_radius: f64,
    pub hover_border_width: f64,
}

impl Default for PointElementOptions {
    fn default() -> Self {
        Self {
            radius: 3.0,
            background_color: "rgba(0, 0, 0, 0.1)".to_owned(),
            border_color: "rgba(0, 0, 0, 0.1)".to_owned(),
            border_width: 1.0,
            hit_radius: 1.0,
            hover_radius: 4.0,
            hover_border_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineElementOptions {
    pub tension: f64,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub border_cap_style: LineCap,
    pub border_dash: Vec<f64>,
    pub border_dash_offset: f64,
    pub border_join_style: LineJoin,
    pub fill: bool,
}

impl Default for LineElementOptions {
    fn default() -> Self {
        Self {
            tension: 0.4,
            background_color: "rgba(0, 0, 0, 0.1)".to_owned(),
            border_color: "rgba(0, 0, 0, 0.1)".to_owned(),
            border_width: 3.0,
            border_cap_style: LineCap::Butt,
            border_dash: Vec::new(),
            border_dash_offset: 0.0,
            border_join_style: LineJoin::Miter,
            fill: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Full animation length in milliseconds; zero disables animation.
    pub duration: u32,
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: 1000,
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverOptions {
    pub mode: HitMode,
    /// Hover transition length in milliseconds.
    pub animation_duration: u32,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            mode: HitMode::Single,
            animation_duration: 400,
        }
    }
}
