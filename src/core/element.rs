//! Animated element primitive: a target `model`, the currently rendered
//! `view`, and a `start` snapshot pivoting each transition.

/// Interpolation contract for element models.
///
/// Each implementation fixes the strategy per field when the type is
/// defined: numeric fields lerp, color fields mix in channel space, and
/// everything else snaps to the target. No strategy is derived at runtime.
pub trait Animatable: Clone {
    /// Produces the view state at eased progress `ease` in `[0, 1]` between
    /// `start` and `target`.
    fn interpolate(start: &Self, target: &Self, ease: f64) -> Self;
}

/// Linear interpolation for numeric model fields.
///
/// A non-finite start value interpolates from zero so a freshly created
/// element still animates instead of propagating NaN.
#[must_use]
pub fn lerp(start: f64, target: f64, ease: f64) -> f64 {
    let start = if start.is_finite() { start } else { 0.0 };
    start + (target - start) * ease
}

/// A renderable unit with a target state and an eased, currently rendered
/// state.
///
/// `view()` is always a drawable state: before the first transition it is
/// the model itself. `pivot()` snapshots the current view as the origin of
/// the next transition; `transition(1.0)` discards that snapshot.
#[derive(Debug, Clone)]
pub struct Element<M: Animatable> {
    model: M,
    view: Option<M>,
    start: Option<M>,
}

impl<M: Animatable> Element<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            view: None,
            start: None,
        }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn set_model(&mut self, model: M) {
        self.model = model;
    }

    /// Current rendered state; falls back to the model before any transition.
    #[must_use]
    pub fn view(&self) -> &M {
        self.view.as_ref().unwrap_or(&self.model)
    }

    #[must_use]
    pub fn has_pivot(&self) -> bool {
        self.start.is_some()
    }

    /// Snapshots the current view as the interpolation origin.
    pub fn pivot(&mut self) {
        if self.view.is_none() {
            self.view = Some(self.model.clone());
        }
        self.start = self.view.clone();
    }

    /// Advances the view toward the model at eased progress `ease`.
    pub fn transition(&mut self, ease: f64) -> &M {
        if self.start.is_none() {
            self.pivot();
        }

        let next = match &self.start {
            Some(start) => M::interpolate(start, &self.model, ease),
            None => self.model.clone(),
        };
        self.view = Some(next);

        if ease >= 1.0 {
            self.start = None;
        }

        self.view.as_ref().unwrap_or(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::{Animatable, Element, lerp};

    #[derive(Debug, Clone, PartialEq)]
    struct Scalar(f64);

    impl Animatable for Scalar {
        fn interpolate(start: &Self, target: &Self, ease: f64) -> Self {
            Self(lerp(start.0, target.0, ease))
        }
    }

    #[test]
    fn transition_midpoint_halves_the_distance() {
        let mut element = Element::new(Scalar(0.0));
        element.pivot();
        element.set_model(Scalar(10.0));

        assert_eq!(element.transition(0.5).0, 5.0);
        assert!(element.has_pivot());
    }

    #[test]
    fn completing_a_transition_drops_the_pivot() {
        let mut element = Element::new(Scalar(0.0));
        element.pivot();
        element.set_model(Scalar(10.0));

        assert_eq!(element.transition(1.0).0, 10.0);
        assert!(!element.has_pivot());
    }

    #[test]
    fn view_is_always_drawable() {
        let element = Element::new(Scalar(3.0));
        assert_eq!(element.view().0, 3.0);
    }
}
