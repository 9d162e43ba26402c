use std::fmt;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// The default element color, `rgba(0, 0, 0, 0.1)`.
    #[must_use]
    pub const fn default_element() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.1)
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(..)` and `rgba(..)` strings.
    pub fn parse(text: &str) -> ChartResult<Self> {
        let text = text.trim();

        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex)
                .ok_or_else(|| ChartError::InvalidData(format!("malformed hex color `{text}`")));
        }

        let (body, has_alpha) = if let Some(rest) = text.strip_prefix("rgba(") {
            (rest.strip_suffix(')'), true)
        } else if let Some(rest) = text.strip_prefix("rgb(") {
            (rest.strip_suffix(')'), false)
        } else {
            (None, false)
        };

        let Some(body) = body else {
            return Err(ChartError::InvalidData(format!(
                "malformed color `{text}`"
            )));
        };

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ChartError::InvalidData(format!(
                "malformed color `{text}`"
            )));
        }

        let channel = |part: &str| -> Option<f64> {
            let value: f64 = part.parse().ok()?;
            (0.0..=255.0).contains(&value).then_some(value / 255.0)
        };

        let red = channel(parts[0]);
        let green = channel(parts[1]);
        let blue = channel(parts[2]);
        let alpha = if has_alpha {
            parts[3]
                .parse::<f64>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
        } else {
            Some(1.0)
        };

        match (red, green, blue, alpha) {
            (Some(red), Some(green), Some(blue), Some(alpha)) => {
                Ok(Self::rgba(red, green, blue, alpha))
            }
            _ => Err(ChartError::InvalidData(format!(
                "malformed color `{text}`"
            ))),
        }
    }

    /// Parses a color string, substituting `fallback` for anything malformed.
    ///
    /// Transition code relies on this never failing: a bad color snaps to the
    /// fallback instead of aborting a frame.
    #[must_use]
    pub fn parse_or(text: &str, fallback: Self) -> Self {
        Self::parse(text).unwrap_or(fallback)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let nibble = |c: u8| -> Option<f64> {
            let c = c as char;
            c.to_digit(16).map(f64::from)
        };

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Some(Self::rgb(
                    (r * 16.0 + r) / 255.0,
                    (g * 16.0 + g) / 255.0,
                    (b * 16.0 + b) / 255.0,
                ))
            }
            6 => {
                let r = nibble(bytes[0])? * 16.0 + nibble(bytes[1])?;
                let g = nibble(bytes[2])? * 16.0 + nibble(bytes[3])?;
                let b = nibble(bytes[4])? * 16.0 + nibble(bytes[5])?;
                Some(Self::rgb(r / 255.0, g / 255.0, b / 255.0))
            }
            _ => None,
        }
    }

    /// Linear channel-space mix toward `target`; `t == 0` is `self`.
    #[must_use]
    pub fn mix(self, target: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            lerp(self.red, target.red),
            lerp(self.green, target.green),
            lerp(self.blue, target.blue),
            lerp(self.alpha, target.alpha),
        )
    }

    /// Same color with its alpha multiplied by `factor`, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha_scaled(self, factor: f64) -> Self {
        Self::rgba(
            self.red,
            self.green,
            self.blue,
            (self.alpha * factor).clamp(0.0, 1.0),
        )
    }

    /// Hover emphasis: saturate toward the channel mean and darken slightly.
    ///
    /// Approximates the original saturate(0.5).darken(0.1) hover derivation
    /// without a full HSL round trip.
    #[must_use]
    pub fn emphasized(self) -> Self {
        let mean = (self.red + self.green + self.blue) / 3.0;
        let saturate = |c: f64| c + (c - mean) * 0.5;
        let darken = |c: f64| (c * 0.9).clamp(0.0, 1.0);
        Self::rgba(
            darken(saturate(self.red).clamp(0.0, 1.0)),
            darken(saturate(self.green).clamp(0.0, 1.0)),
            darken(saturate(self.blue).clamp(0.0, 1.0)),
            self.alpha,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::default_element()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            (self.red * 255.0).round(),
            (self.green * 255.0).round(),
            (self.blue * 255.0).round(),
            self.alpha
        )
    }
}
