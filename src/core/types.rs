use serde::{Deserialize, Serialize};

/// A rectangle in surface pixel space, edges inclusive of position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn clamp_x(self, x: f64) -> f64 {
        x.clamp(self.left, self.right)
    }

    #[must_use]
    pub fn clamp_y(self, y: f64) -> f64 {
        y.clamp(self.top, self.bottom)
    }
}

/// Width/height pair reported by scale self-measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Space already reserved by neighboring axes, subtracted from a scale's own
/// padding so it is never double-counted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// One raw data entry: a plain number, an `{x, y}` pair, or an explicit gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Pair { x: f64, y: f64 },
    Number(f64),
    Null,
}

impl DataValue {
    /// Resolves the entry to the component relevant for an axis orientation.
    ///
    /// Nulls and non-finite numbers resolve to `None`: excluded from domain
    /// statistics and rendered as gaps, never an error.
    #[must_use]
    pub fn resolve(self, horizontal: bool) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value,
            Self::Pair { x, y } => {
                if horizontal {
                    x
                } else {
                    y
                }
            }
            Self::Null => return None,
        };

        value.is_finite().then_some(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}
