use crate::core::color::Color;
use crate::core::element::{Animatable, lerp};
use crate::core::point::PointModel;
use crate::render::{DrawingSurface, LineCap, LineJoin};

/// Target visual state of a dataset's connecting line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineModel {
    pub tension: f64,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub border_cap: LineCap,
    pub border_dash: Vec<f64>,
    pub border_dash_offset: f64,
    pub border_join: LineJoin,
    /// Fill the area between the line and the zero baseline.
    pub fill: bool,
    pub scale_top: f64,
    pub scale_bottom: f64,
    /// Pixel y of the axis baseline the fill closes against.
    pub scale_zero: f64,
}

impl Default for LineModel {
    fn default() -> Self {
        Self {
            tension: 0.4,
            background_color: Color::default_element(),
            border_color: Color::default_element(),
            border_width: 3.0,
            border_cap: LineCap::Butt,
            border_dash: Vec::new(),
            border_dash_offset: 0.0,
            border_join: LineJoin::Round,
            fill: true,
            scale_top: 0.0,
            scale_bottom: 0.0,
            scale_zero: 0.0,
        }
    }
}

impl Animatable for LineModel {
    fn interpolate(start: &Self, target: &Self, ease: f64) -> Self {
        Self {
            tension: lerp(start.tension, target.tension, ease),
            background_color: start.background_color.mix(target.background_color, ease),
            border_color: start.border_color.mix(target.border_color, ease),
            border_width: lerp(start.border_width, target.border_width, ease),
            border_cap: target.border_cap,
            border_dash: target.border_dash.clone(),
            border_dash_offset: lerp(start.border_dash_offset, target.border_dash_offset, ease),
            border_join: target.border_join,
            fill: target.fill,
            scale_top: lerp(start.scale_top, target.scale_top, ease),
            scale_bottom: lerp(start.scale_bottom, target.scale_bottom, ease),
            scale_zero: lerp(start.scale_zero, target.scale_zero, ease),
        }
    }
}

impl LineModel {
    /// Draws the fill region and the stroked connector through `points`.
    ///
    /// Skipped points break the stroke and drop the fill to the baseline on
    /// both sides of the gap, so holes in the data read as holes.
    pub fn draw(&self, surface: &mut dyn DrawingSurface, points: &[PointModel]) {
        if points.is_empty() {
            return;
        }

        let last = points.len() - 1;
        let neighbor = |index: usize, offset: isize| -> &PointModel {
            let clamped = index
                .saturating_add_signed(offset)
                .min(last);
            &points[clamped]
        };

        surface.save();

        if self.fill {
            surface.begin_path();

            for (index, point) in points.iter().enumerate() {
                if index == 0 {
                    surface.move_to(point.x, self.scale_zero);
                    if point.skip {
                        surface.move_to(neighbor(index, 1).x, self.scale_zero);
                    } else {
                        surface.line_to(point.x, point.y);
                    }
                } else if point.skip {
                    let previous = neighbor(index, -1);
                    let next = neighbor(index, 1);
                    surface.line_to(previous.x, self.scale_zero);
                    surface.move_to(next.x, self.scale_zero);
                } else if neighbor(index, -1).skip {
                    surface.line_to(point.x, point.y);
                } else {
                    self.segment_to(surface, neighbor(index, -1), point);
                }
            }

            surface.line_to(points[last].x, self.scale_zero);
            surface.line_to(points[0].x, self.scale_zero);

            surface.set_fill_color(self.background_color);
            surface.close_path();
            surface.fill();
        }

        surface.set_line_cap(self.border_cap);
        surface.set_line_dash(&self.border_dash, self.border_dash_offset);
        surface.set_line_join(self.border_join);
        surface.set_line_width(self.border_width);
        surface.set_stroke_color(self.border_color);
        surface.begin_path();

        for (index, point) in points.iter().enumerate() {
            if index == 0 {
                surface.move_to(point.x, point.y);
            } else if point.skip {
                let next = neighbor(index, 1);
                surface.move_to(next.x, next.y);
            } else if neighbor(index, -1).skip {
                surface.move_to(point.x, point.y);
            } else {
                self.segment_to(surface, neighbor(index, -1), point);
            }
        }

        surface.stroke();
        surface.restore();
    }

    /// One connector segment: a clamped bezier when smoothing is on, a
    /// straight line otherwise.
    fn segment_to(
        &self,
        surface: &mut dyn DrawingSurface,
        previous: &PointModel,
        point: &PointModel,
    ) {
        if self.tension > 0.0 {
            surface.bezier_curve_to(
                previous.control_point_next.x,
                previous.control_point_next.y,
                point.control_point_previous.x,
                point.control_point_previous.y,
                point.x,
                point.y,
            );
        } else {
            surface.line_to(point.x, point.y);
        }
    }
}
