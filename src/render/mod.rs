mod recording;

pub use recording::{RecordingSurface, SurfaceOp};

use serde::{Deserialize, Serialize};

use crate::core::color::Color;

/// Stroke end-cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Horizontal anchoring of drawn text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchoring of drawn text relative to its y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Contract implemented by any 2-D immediate-mode drawing backend.
///
/// The engine needs only path construction, stroke/fill, text drawing and
/// measurement, and affine transforms. Chart code never assumes a concrete
/// backend beyond this capability set; `RecordingSurface` implements it
/// headlessly for tests.
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, segments: &[f64], offset: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);

    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font_px: f64,
        align: TextAlign,
        baseline: TextBaseline,
    );
    /// Advance width of `text` at the given font size, in pixels.
    fn measure_text(&self, text: &str, font_px: f64) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    /// Native raster export when the backend supports it.
    fn to_base64_png(&self) -> Option<String> {
        None
    }
}

/// Draws the outline of a rounded rectangle as the current path.
pub fn trace_rounded_rect(
    surface: &mut dyn DrawingSurface,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
) {
    surface.begin_path();
    surface.move_to(x + radius, y);
    surface.line_to(x + width - radius, y);
    surface.quadratic_curve_to(x + width, y, x + width, y + radius);
    surface.line_to(x + width, y + height - radius);
    surface.quadratic_curve_to(x + width, y + height, x + width - radius, y + height);
    surface.line_to(x + radius, y + height);
    surface.quadratic_curve_to(x, y + height, x, y + height - radius);
    surface.line_to(x, y + radius);
    surface.quadratic_curve_to(x, y, x + radius, y);
    surface.close_path();
}

/// Longest advance width among `labels` at the given font size.
#[must_use]
pub fn longest_text(surface: &dyn DrawingSurface, font_px: f64, labels: &[String]) -> f64 {
    labels
        .iter()
        .map(|label| surface.measure_text(label, font_px))
        .fold(0.0, f64::max)
}
