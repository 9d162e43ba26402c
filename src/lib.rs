//! chartkit: animated 2-D chart engine.
//!
//! Configuration goes in as serde-friendly option structs, scales negotiate
//! their own layout, elements animate between model snapshots, and all
//! drawing funnels through the [`render::DrawingSurface`] trait so backends
//! stay pluggable.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{AnimationScheduler, Chart, ChartConfig, DatasetConfig, ScalarOrVec};
pub use error::{ChartError, ChartResult};
