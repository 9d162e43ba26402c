//! Chart orchestration: configuration, scale registry, layout, dataset
//! controllers, the frame scheduler and the chart itself.

pub mod animation;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod layout;
pub mod legend;
pub mod registry;

pub use animation::{Animation, AnimationScheduler, ChartId, FrameEvent, FRAME_DURATION_MS};
pub use chart::Chart;
pub use config::{ChartConfig, ChartData, ChartOptions, DatasetConfig, ScalarOrVec};
pub use dataset::DatasetMeta;
pub use layout::layout_scales;
pub use legend::LegendItem;
pub use registry::ScaleRegistry;
