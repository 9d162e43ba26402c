//! Pure geometry and numeric helpers shared by scales, drawers and layout.

/// A point in surface (pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Half-pixel offset that keeps a stroked line of the given width crisp.
#[must_use]
pub fn alias_pixel(line_width: f64) -> f64 {
    if (line_width as i64) % 2 == 0 { 0.0 } else { 0.5 }
}

/// Bezier control points flanking one spline knot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlPoints {
    pub previous: Point,
    pub next: Point,
}

/// Computes smoothing control points for the middle of three neighboring
/// knots, weighting the tangent by segment length and scaling it by
/// `tension`.
///
/// A skipped neighbor collapses onto the middle point so gaps do not drag
/// the curve toward stale positions. Degenerate (coincident) neighborhoods
/// yield zero-length tangents instead of NaN.
#[must_use]
pub fn spline_curve(
    previous: Point,
    previous_skip: bool,
    current: Point,
    next: Point,
    next_skip: bool,
    tension: f64,
) -> ControlPoints {
    let previous = if previous_skip { current } else { previous };
    let next = if next_skip { current } else { next };

    let d01 = current.distance_to(previous);
    let d12 = next.distance_to(current);

    let total = d01 + d12;
    let s01 = if total > 0.0 { d01 / total } else { 0.0 };
    let s12 = if total > 0.0 { d12 / total } else { 0.0 };

    let fa = tension * s01;
    let fb = tension * s12;

    ControlPoints {
        previous: Point::new(
            current.x - fa * (next.x - previous.x),
            current.y - fa * (next.y - previous.y),
        ),
        next: Point::new(
            current.x + fb * (next.x - previous.x),
            current.y + fb * (next.y - previous.y),
        ),
    }
}
