//! Scale registry: maps axis kind names to scale constructors.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::category::CategoryScale;
use crate::core::linear::LinearScale;
use crate::core::scale::{AxisOptions, Scale};
use crate::error::{ChartError, ChartResult};

/// Builds one scale instance from an id and its options.
pub type ScaleConstructor = Box<dyn Fn(String, AxisOptions) -> Box<dyn Scale> + Send + Sync>;

/// Central lookup for scale construction; the stock kinds are pre-registered
/// and additional kinds can be added under new names.
pub struct ScaleRegistry {
    constructors: IndexMap<String, ScaleConstructor>,
}

impl fmt::Debug for ScaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaleRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl Default for ScaleRegistry {
    fn default() -> Self {
        let mut registry = Self {
            constructors: IndexMap::new(),
        };
        registry.register("category", |id, options| {
            Box::new(CategoryScale::new(id, options))
        });
        registry.register("linear", |id, options| {
            Box::new(LinearScale::new(id, options))
        });
        registry
    }
}

impl ScaleRegistry {
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(String, AxisOptions) -> Box<dyn Scale> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!(kind = %kind, "scale kind registered");
        self.constructors.insert(kind, Box::new(constructor));
    }

    /// Registered kind names, in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn create(
        &self,
        kind: &str,
        id: impl Into<String>,
        options: AxisOptions,
    ) -> ChartResult<Box<dyn Scale>> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| ChartError::UnknownScaleKind(kind.to_owned()))?;
        Ok(constructor(id.into(), options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::{AxisKind, ScaleContext, ScaleState};
    use crate::core::types::DataValue;

    #[test]
    fn stock_kinds_are_registered() {
        let registry = ScaleRegistry::default();
        assert_eq!(registry.kinds(), vec!["category", "linear"]);

        let scale = registry
            .create(
                AxisKind::Linear.name(),
                "y-axis-0",
                AxisOptions::default(),
            )
            .unwrap();
        assert_eq!(scale.state().id, "y-axis-0");
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let registry = ScaleRegistry::default();
        let err = registry
            .create("logarithmic", "y-axis-0", AxisOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::UnknownScaleKind(kind) if kind == "logarithmic"));
    }

    #[test]
    fn custom_kinds_can_be_added() {
        struct FixedScale {
            state: ScaleState,
        }
        impl Scale for FixedScale {
            fn state(&self) -> &ScaleState {
                &self.state
            }
            fn state_mut(&mut self) -> &mut ScaleState {
                &mut self.state
            }
            fn build_ticks(&mut self, _data: &ScaleContext<'_>) {
                self.state.tick_labels = vec!["only".to_owned()];
            }
            fn get_pixel_for_value(
                &self,
                _value: DataValue,
                _index: usize,
                _include_offset: bool,
            ) -> f64 {
                self.state.left
            }
            fn get_label_for_index(
                &self,
                _index: usize,
                _dataset_index: usize,
                _data: &ScaleContext<'_>,
            ) -> String {
                "only".to_owned()
            }
        }

        let mut registry = ScaleRegistry::default();
        registry.register("fixed", |id, options| {
            Box::new(FixedScale {
                state: ScaleState::new(id, options),
            })
        });
        assert!(registry.create("fixed", "f-axis", AxisOptions::default()).is_ok());
    }
}
