//! Pointer events, hit-testing modes and element references.

pub mod tooltip;

use serde::{Deserialize, Serialize};

/// Pointer event classes a chart reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    MouseMove,
    MouseOut,
    Click,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl PointerEventKind {
    /// Events routed to the hover pipeline by default.
    #[must_use]
    pub fn default_events() -> Vec<Self> {
        vec![
            Self::MouseMove,
            Self::MouseOut,
            Self::Click,
            Self::TouchStart,
            Self::TouchMove,
            Self::TouchEnd,
        ]
    }
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub page_x: f64,
    pub page_y: f64,
}

/// Where the drawing surface sits on the page, and how its backing pixels
/// relate to its displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub left: f64,
    pub top: f64,
    pub display_width: f64,
    pub display_height: f64,
    pub render_width: f64,
    pub render_height: f64,
}

impl SurfaceGeometry {
    /// Geometry for a surface rendered at its display size, at the page
    /// origin.
    #[must_use]
    pub fn simple(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            display_width: width,
            display_height: height,
            render_width: width,
            render_height: height,
        }
    }

    /// Converts page coordinates into surface-pixel coordinates, accounting
    /// for a surface displayed at a different size than its backing store.
    #[must_use]
    pub fn relative_position(&self, event: &PointerEvent) -> (f64, f64) {
        let scale_x = if self.display_width > 0.0 {
            self.render_width / self.display_width
        } else {
            1.0
        };
        let scale_y = if self.display_height > 0.0 {
            self.render_height / self.display_height
        } else {
            1.0
        };
        (
            (event.page_x - self.left) * scale_x,
            (event.page_y - self.top) * scale_y,
        )
    }
}

/// How a pointer position selects elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HitMode {
    /// Only elements directly under the pointer.
    #[default]
    Single,
    /// Every element sharing a data index with a directly hit element.
    Label,
    /// Every element of a dataset containing a directly hit element.
    Dataset,
}

/// Stable handle to one element of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub dataset_index: usize,
    pub index: usize,
}
