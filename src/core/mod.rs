//! Geometry, animation primitives, elements and scales.

pub mod category;
pub mod color;
pub mod easing;
pub mod element;
pub mod line;
pub mod linear;
pub mod math;
pub mod point;
pub mod scale;
pub mod types;

pub use category::CategoryScale;
pub use color::Color;
pub use easing::Easing;
pub use element::{Animatable, Element};
pub use line::LineModel;
pub use linear::LinearScale;
pub use math::{ControlPoints, Point, spline_curve};
pub use point::PointModel;
pub use scale::{AxisKind, AxisOptions, AxisPosition, Scale, ScaleContext, SeriesView};
pub use types::{DataValue, Margins, Rect, Size};
