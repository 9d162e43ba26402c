use crate::core::color::Color;
use crate::core::element::{Animatable, lerp};
use crate::core::math::Point;
use crate::render::DrawingSurface;

/// Target visual state of one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointModel {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub tension: f64,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub hit_radius: f64,
    /// Gap marker: a skipped point is allocated but draws nothing and breaks
    /// connecting lines and fill boundaries.
    pub skip: bool,
    pub control_point_previous: Point,
    pub control_point_next: Point,
}

impl Default for PointModel {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 3.0,
            tension: 0.4,
            background_color: Color::default_element(),
            border_color: Color::default_element(),
            border_width: 1.0,
            hit_radius: 1.0,
            skip: false,
            control_point_previous: Point::default(),
            control_point_next: Point::default(),
        }
    }
}

impl Animatable for PointModel {
    fn interpolate(start: &Self, target: &Self, ease: f64) -> Self {
        Self {
            x: lerp(start.x, target.x, ease),
            y: lerp(start.y, target.y, ease),
            radius: lerp(start.radius, target.radius, ease),
            tension: lerp(start.tension, target.tension, ease),
            background_color: start.background_color.mix(target.background_color, ease),
            border_color: start.border_color.mix(target.border_color, ease),
            border_width: lerp(start.border_width, target.border_width, ease),
            hit_radius: lerp(start.hit_radius, target.hit_radius, ease),
            skip: target.skip,
            control_point_previous: Point::new(
                lerp(
                    start.control_point_previous.x,
                    target.control_point_previous.x,
                    ease,
                ),
                lerp(
                    start.control_point_previous.y,
                    target.control_point_previous.y,
                    ease,
                ),
            ),
            control_point_next: Point::new(
                lerp(start.control_point_next.x, target.control_point_next.x, ease),
                lerp(start.control_point_next.y, target.control_point_next.y, ease),
            ),
        }
    }
}

impl PointModel {
    /// Circular hit test over the visual radius padded by the hit radius.
    #[must_use]
    pub fn in_range(&self, x: f64, y: f64) -> bool {
        let range = self.hit_radius + self.radius;
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy < range * range
    }

    /// Horizontal-only variant used by label/dataset matching modes.
    #[must_use]
    pub fn in_label_range(&self, x: f64) -> bool {
        let range = self.radius + self.hit_radius;
        let dx = x - self.x;
        dx * dx < range * range
    }

    /// Anchor for tooltip positioning, padded past the border.
    #[must_use]
    pub fn tooltip_position(&self) -> (Point, f64) {
        (Point::new(self.x, self.y), self.radius + self.border_width)
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        if self.skip {
            return;
        }

        if self.radius > 0.0 || self.border_width > 0.0 {
            surface.begin_path();
            surface.arc(self.x, self.y, self.radius, 0.0, std::f64::consts::PI * 2.0);
            surface.close_path();

            surface.set_stroke_color(self.border_color);
            surface.set_line_width(self.border_width);
            surface.set_fill_color(self.background_color);

            surface.fill();
            surface.stroke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PointModel;

    #[test]
    fn in_range_is_strict_on_the_padded_boundary() {
        let point = PointModel {
            x: 10.0,
            y: 10.0,
            radius: 5.0,
            hit_radius: 0.0,
            ..PointModel::default()
        };

        assert!(point.in_range(10.0, 10.0));
        assert!(point.in_range(14.0, 10.0));
        assert!(!point.in_range(16.0, 10.0));
    }

    #[test]
    fn label_range_ignores_vertical_distance() {
        let point = PointModel {
            x: 10.0,
            y: 10.0,
            radius: 3.0,
            hit_radius: 1.0,
            ..PointModel::default()
        };

        assert!(point.in_label_range(12.0));
        assert!(point.in_label_range(12.0));
        assert!(!point.in_label_range(14.5));
    }
}
