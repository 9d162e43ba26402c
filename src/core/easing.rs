use serde::{Deserialize, Serialize};

/// Easing curve applied to animation progress.
///
/// The set mirrors Robert Penner's easing equations; every variant maps the
/// unit interval onto itself with `apply(0) == 0` and `apply(1) == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    #[default]
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

const BACK_OVERSHOOT: f64 = 1.70158;

impl Easing {
    /// Maps raw progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        use std::f64::consts::PI;

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => -t * (t - 2.0),
            Self::EaseInOutQuad => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    let t = t - 1.0;
                    -0.5 * (t * (t - 2.0) - 1.0)
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::EaseInOutCubic => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => {
                let t = t - 1.0;
                -(t * t * t * t - 1.0)
            }
            Self::EaseInOutQuart => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t * t
                } else {
                    let t = t - 2.0;
                    -0.5 * (t * t * t * t - 2.0)
                }
            }
            Self::EaseInQuint => t * t * t * t * t,
            Self::EaseOutQuint => {
                let t = t - 1.0;
                t * t * t * t * t + 1.0
            }
            Self::EaseInOutQuint => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t * t * t + 2.0)
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == 1.0 {
                    return 1.0;
                }
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * 2f64.powf(10.0 * (t - 1.0))
                } else {
                    0.5 * (2.0 - 2f64.powf(-10.0 * (t - 1.0)))
                }
            }
            Self::EaseInCirc => {
                if t >= 1.0 {
                    t
                } else {
                    1.0 - (1.0 - t * t).sqrt()
                }
            }
            Self::EaseOutCirc => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Self::EaseInOutCirc => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
            Self::EaseInBack => t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT),
            Self::EaseOutBack => {
                let t = t - 1.0;
                t * t * ((BACK_OVERSHOOT + 1.0) * t + BACK_OVERSHOOT) + 1.0
            }
            Self::EaseInOutBack => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
            Self::EaseInElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let p = 0.3;
                let s = p / 4.0;
                let t = t - 1.0;
                -(2f64.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
            }
            Self::EaseOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let p = 0.3;
                let s = p / 4.0;
                2f64.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() + 1.0
            }
            Self::EaseInOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let p = 0.3 * 1.5;
                let s = p / 4.0;
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * (2f64.powf(10.0 * t) * ((t - s) * (2.0 * PI) / p).sin())
                } else {
                    2f64.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() * 0.5 + 1.0
                }
            }
            Self::EaseInBounce => 1.0 - Self::EaseOutBounce.apply(1.0 - t),
            Self::EaseOutBounce => {
                if t < 1.0 / 2.75 {
                    7.5625 * t * t
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    7.5625 * t * t + 0.75
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    7.5625 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / 2.75;
                    7.5625 * t * t + 0.984375
                }
            }
            Self::EaseInOutBounce => {
                if t < 0.5 {
                    Self::EaseInBounce.apply(t * 2.0) * 0.5
                } else {
                    Self::EaseOutBounce.apply(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
    ];

    #[test]
    fn all_curves_fix_endpoints() {
        for easing in ALL {
            assert!(
                easing.apply(0.0).abs() < 1e-9,
                "{easing:?} must start at 0"
            );
            assert!(
                (easing.apply(1.0) - 1.0).abs() < 1e-9,
                "{easing:?} must end at 1"
            );
        }
    }

    #[test]
    fn serde_names_are_camel_case() {
        let json = serde_json::to_string(&Easing::EaseOutQuart).expect("serialize");
        assert_eq!(json, "\"easeOutQuart\"");
        let back: Easing = serde_json::from_str("\"easeInOutBounce\"").expect("deserialize");
        assert_eq!(back, Easing::EaseInOutBounce);
    }
}
