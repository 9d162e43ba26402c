use crate::core::color::Color;
use crate::render::{DrawingSurface, LineCap, LineJoin, TextAlign, TextBaseline};

/// One recorded drawing operation, reduced to what tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    BezierCurveTo { x: f64, y: f64 },
    QuadraticCurveTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64 },
    ClosePath,
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    ClearRect { width: f64, height: f64 },
    SetLineWidth { width: f64 },
    FillText { text: String, x: f64, y: f64 },
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
    Scale { sx: f64, sy: f64 },
}

/// Headless surface used by tests and benches.
///
/// Records every operation and measures text deterministically so layout
/// results are reproducible without a real rasterizer.
#[derive(Debug)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    /// Per-character advance as a fraction of the font size.
    pub glyph_aspect: f64,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            glyph_aspect: 0.6,
            fill_color: Color::default_element(),
            stroke_color: Color::default_element(),
            line_width: 1.0,
        }
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn count(&self, matches: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Stroke))
    }

    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Fill))
    }

    #[must_use]
    pub fn text_count(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::FillText { .. }))
    }

    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Arc { .. }))
    }

    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, _cp1x: f64, _cp1y: f64, _cp2x: f64, _cp2y: f64, x: f64, y: f64) {
        self.ops.push(SurfaceOp::BezierCurveTo { x, y });
    }

    fn quadratic_curve_to(&mut self, _cpx: f64, _cpy: f64, x: f64, y: f64) {
        self.ops.push(SurfaceOp::QuadraticCurveTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
        self.ops.push(SurfaceOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
        self.ops.push(SurfaceOp::SetLineWidth { width });
    }

    fn set_line_dash(&mut self, _segments: &[f64], _offset: f64) {}

    fn set_line_cap(&mut self, _cap: LineCap) {}

    fn set_line_join(&mut self, _join: LineJoin) {}

    fn fill(&mut self) {
        self.ops.push(SurfaceOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_rect(&mut self, _x: f64, _y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::ClearRect { width, height });
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        _font_px: f64,
        _align: TextAlign,
        _baseline: TextBaseline,
    ) {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_owned(),
            x,
            y,
        });
    }

    fn measure_text(&self, text: &str, font_px: f64) -> f64 {
        text.chars().count() as f64 * font_px * self.glyph_aspect
    }

    fn save(&mut self) {
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(SurfaceOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(SurfaceOp::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(SurfaceOp::Rotate { radians });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(SurfaceOp::Scale { sx, sy });
    }
}
