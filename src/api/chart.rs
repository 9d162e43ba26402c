//! The chart controller: owns config, scales, dataset elements and the
//! tooltip, and drives the update → layout → animate → draw cycle.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::api::animation::{Animation, AnimationScheduler, ChartId, FrameEvent};
use crate::api::config::ChartConfig;
use crate::api::dataset::{DatasetContext, DatasetMeta};
use crate::api::layout::layout_scales;
use crate::api::registry::ScaleRegistry;
use crate::core::scale::{Scale, ScaleContext, SeriesView};
use crate::core::types::{Rect, Size};
use crate::error::{ChartError, ChartResult};
use crate::interaction::tooltip::{
    DefaultTooltipCallbacks, LabelColors, Tooltip, TooltipCallbacks, TooltipDataView, TooltipItem,
    TooltipUpdateInput,
};
use crate::interaction::{ElementRef, HitMode, PointerEvent, PointerEventKind, SurfaceGeometry};
use crate::render::DrawingSurface;

/// Fired alongside each animation frame and on completion.
pub type ProgressCallback = Box<dyn FnMut(&FrameEvent) + Send>;
/// Fired for click events, with the elements under the pointer.
pub type ClickCallback = Box<dyn FnMut(&PointerEvent, &[ElementRef]) + Send>;

pub struct Chart {
    id: ChartId,
    width: u32,
    height: u32,
    config: ChartConfig,
    scales: IndexMap<String, Box<dyn Scale>>,
    metas: Vec<DatasetMeta>,
    chart_area: Rect,
    tooltip: Tooltip,
    tooltip_callbacks: Box<dyn TooltipCallbacks + Send + Sync>,
    active: Vec<ElementRef>,
    last_active: Vec<ElementRef>,
    tooltip_active: Vec<ElementRef>,
    last_tooltip_active: Vec<ElementRef>,
    on_click: Option<ClickCallback>,
    on_progress: Option<ProgressCallback>,
    on_complete: Option<ProgressCallback>,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("datasets", &self.metas.len())
            .field("scales", &self.scales.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn build_series_context(config: &ChartConfig) -> ScaleContext<'_> {
    let series: Vec<SeriesView<'_>> = config
        .data
        .datasets
        .iter()
        .map(|dataset| SeriesView {
            values: &dataset.data,
            visible: !dataset.hidden,
            kind: dataset.kind.as_deref().unwrap_or(&config.kind),
            x_axis_id: dataset.x_axis_id.as_deref().unwrap_or("x-axis-0"),
            y_axis_id: dataset.y_axis_id.as_deref().unwrap_or("y-axis-0"),
        })
        .collect();
    ScaleContext {
        labels: &config.data.labels,
        series,
    }
}

impl Chart {
    /// Builds a chart with the stock scale kinds.
    pub fn new(width: u32, height: u32, config: ChartConfig) -> ChartResult<Self> {
        Self::with_registry(width, height, config, &ScaleRegistry::default())
    }

    /// Builds a chart resolving axis kinds through the given registry.
    pub fn with_registry(
        width: u32,
        height: u32,
        mut config: ChartConfig,
        registry: &ScaleRegistry,
    ) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        config.validate()?;
        Self::ensure_scales_have_ids(&mut config);

        let mut scales: IndexMap<String, Box<dyn Scale>> = IndexMap::new();
        for axis in config
            .options
            .scales
            .x_axes
            .iter()
            .chain(&config.options.scales.y_axes)
        {
            let id = axis.id.clone().unwrap_or_default();
            let scale = registry.create(axis.kind.name(), id.clone(), axis.clone())?;
            scales.insert(id, scale);
        }

        let mut metas = Vec::with_capacity(config.data.datasets.len());
        for index in 0..config.data.datasets.len() {
            let meta = DatasetMeta::new(index, &config)?;
            if !scales.contains_key(&meta.x_axis_id) {
                return Err(ChartError::MissingScale {
                    axis_id: meta.x_axis_id.clone(),
                    dataset_index: index,
                });
            }
            if !scales.contains_key(&meta.y_axis_id) {
                return Err(ChartError::MissingScale {
                    axis_id: meta.y_axis_id.clone(),
                    dataset_index: index,
                });
            }
            metas.push(meta);
        }

        let tooltip = Tooltip::new(config.options.tooltips.clone());
        debug!(width, height, datasets = metas.len(), "chart created");

        Ok(Self {
            id: ChartId::next(),
            width,
            height,
            config,
            scales,
            metas,
            chart_area: Rect::default(),
            tooltip,
            tooltip_callbacks: Box::new(DefaultTooltipCallbacks),
            active: Vec::new(),
            last_active: Vec::new(),
            tooltip_active: Vec::new(),
            last_tooltip_active: Vec::new(),
            on_click: None,
            on_progress: None,
            on_complete: None,
        })
    }

    /// Assigns generated ids to axes declared without one.
    fn ensure_scales_have_ids(config: &mut ChartConfig) {
        for (index, axis) in config.options.scales.x_axes.iter_mut().enumerate() {
            if axis.id.is_none() {
                axis.id = Some(format!("x-axis-{index}"));
            }
        }
        for (index, axis) in config.options.scales.y_axes.iter_mut().enumerate() {
            if axis.id.is_none() {
                axis.id = Some(format!("y-axis-{index}"));
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn chart_area(&self) -> Rect {
        self.chart_area
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    #[must_use]
    pub fn scale(&self, id: &str) -> Option<&dyn Scale> {
        self.scales.get(id).map(|scale| scale.as_ref())
    }

    #[must_use]
    pub fn dataset_meta(&self, index: usize) -> Option<&DatasetMeta> {
        self.metas.get(index)
    }

    pub fn set_tooltip_callbacks(
        &mut self,
        callbacks: Box<dyn TooltipCallbacks + Send + Sync>,
    ) {
        self.tooltip_callbacks = callbacks;
    }

    pub fn set_on_click(&mut self, callback: ClickCallback) {
        self.on_click = Some(callback);
    }

    pub fn set_on_progress(&mut self, callback: ProgressCallback) {
        self.on_progress = Some(callback);
    }

    pub fn set_on_complete(&mut self, callback: ProgressCallback) {
        self.on_complete = Some(callback);
    }

    pub fn set_dataset_visibility(&mut self, index: usize, visible: bool) {
        if let Some(dataset) = self.config.data.datasets.get_mut(index) {
            dataset.hidden = !visible;
        }
    }

    /// Lays out the scales and refreshes every dataset's element models.
    /// Call after any data or option change, then `render`.
    pub fn update(&mut self, surface: &dyn DrawingSurface) -> ChartResult<()> {
        self.update_internal(surface, false)
    }

    /// Like `update`, but pins elements to the scale base so the next render
    /// animates in from scratch.
    pub fn reset(&mut self, surface: &dyn DrawingSurface) -> ChartResult<()> {
        self.update_internal(surface, true)
    }

    fn update_internal(&mut self, surface: &dyn DrawingSurface, reset: bool) -> ChartResult<()> {
        let context = build_series_context(&self.config);
        self.chart_area = layout_scales(
            &mut self.scales,
            &context,
            surface,
            f64::from(self.width),
            f64::from(self.height),
        );

        for meta in &mut self.metas {
            let ctx = DatasetContext {
                config: &self.config,
                scales: &self.scales,
                chart_area: self.chart_area,
            };
            meta.build_or_update_elements(&ctx)?;
            meta.update(&ctx, reset)?;
        }

        trace!(area = ?self.chart_area, "chart updated");
        Ok(())
    }

    /// Queues an animated render on the scheduler, or reports false when the
    /// duration is zero so the host should draw at full ease immediately.
    pub fn render(
        &mut self,
        scheduler: &mut AnimationScheduler,
        duration_ms: u32,
        _lazy: bool,
    ) -> bool {
        if duration_ms == 0 {
            scheduler.cancel(self.id);
            return false;
        }

        scheduler.schedule(
            self.id,
            Animation::with_duration(f64::from(duration_ms), self.config.options.animation.easing),
        );
        true
    }

    /// Draws one frame produced by the scheduler and fires progress hooks.
    pub fn apply_frame(
        &mut self,
        surface: &mut dyn DrawingSurface,
        event: &FrameEvent,
    ) -> ChartResult<()> {
        if event.chart_id != self.id {
            return Ok(());
        }
        self.draw(surface, event.ease)?;
        if let Some(on_progress) = &mut self.on_progress {
            on_progress(event);
        }
        if event.completed {
            if let Some(on_complete) = &mut self.on_complete {
                on_complete(event);
            }
        }
        Ok(())
    }

    /// Paints scales, datasets and tooltip at the given eased progress.
    pub fn draw(&mut self, surface: &mut dyn DrawingSurface, ease: f64) -> ChartResult<()> {
        surface.clear_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));

        for scale in self.scales.values() {
            scale.draw(surface, self.chart_area);
        }

        for meta in &mut self.metas {
            if self.config.data.datasets[meta.index].hidden {
                continue;
            }
            meta.draw(surface, ease);
        }

        self.tooltip.draw(
            surface,
            ease,
            Size {
                width: f64::from(self.width),
                height: f64::from(self.height),
            },
        );

        Ok(())
    }

    /// Changes the viewport; follow with `update` and `render`.
    pub fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Halts any in-flight animation, freezing elements mid-transition.
    pub fn stop(&mut self, scheduler: &mut AnimationScheduler) {
        scheduler.cancel(self.id);
    }

    /// Tears the chart down and reports the viewport it occupied.
    pub fn destroy(self, scheduler: &mut AnimationScheduler) -> (u32, u32) {
        scheduler.cancel(self.id);
        (self.width, self.height)
    }

    /// PNG snapshot when the backend supports it.
    pub fn to_base64_image(&self, surface: &dyn DrawingSurface) -> Option<String> {
        surface.to_base64_png()
    }
}

// Hit testing and the pointer event state machine.
impl Chart {
    fn visible(&self, dataset_index: usize) -> bool {
        self.config
            .data
            .datasets
            .get(dataset_index)
            .is_some_and(|dataset| !dataset.hidden)
    }

    /// The first element whose hit area contains the position.
    #[must_use]
    pub fn get_element_at_position(&self, x: f64, y: f64) -> Vec<ElementRef> {
        for meta in &self.metas {
            if !self.visible(meta.index) {
                continue;
            }
            for (index, point) in meta.points.iter().enumerate() {
                if point.view().in_range(x, y) {
                    return vec![ElementRef {
                        dataset_index: meta.index,
                        index,
                    }];
                }
            }
        }
        Vec::new()
    }

    /// Every visible dataset's element at the data index of the nearest
    /// direct hit.
    #[must_use]
    pub fn get_elements_at_position(&self, x: f64, y: f64) -> Vec<ElementRef> {
        let Some(first) = self.get_element_at_position(x, y).into_iter().next() else {
            return Vec::new();
        };
        self.metas
            .iter()
            .filter(|meta| self.visible(meta.index) && first.index < meta.points.len())
            .map(|meta| ElementRef {
                dataset_index: meta.index,
                index: first.index,
            })
            .collect()
    }

    /// All elements of the first dataset with a point in the pointer's
    /// horizontal band; vertical distance does not matter.
    #[must_use]
    pub fn get_dataset_at_position(&self, x: f64, _y: f64) -> Vec<ElementRef> {
        for meta in &self.metas {
            if !self.visible(meta.index) {
                continue;
            }
            if meta.points.iter().any(|point| point.view().in_label_range(x)) {
                return (0..meta.points.len())
                    .map(|index| ElementRef {
                        dataset_index: meta.index,
                        index,
                    })
                    .collect();
            }
        }
        Vec::new()
    }

    fn elements_for_mode(&self, mode: HitMode, x: f64, y: f64) -> Vec<ElementRef> {
        match mode {
            HitMode::Single => self.get_element_at_position(x, y),
            HitMode::Label => self.get_elements_at_position(x, y),
            HitMode::Dataset => self.get_dataset_at_position(x, y),
        }
    }

    fn refresh_tooltip(&mut self) {
        self.tooltip.initialize();
        self.tooltip.active = self.tooltip_active.clone();

        let mode = self.config.options.tooltips.mode;
        let tooltip_active = self.tooltip_active.clone();

        let mut items = Vec::new();
        let mut positions = Vec::new();
        let mut label_colors = Vec::new();
        let mut pinned_y = None;

        let context = build_series_context(&self.config);
        for reference in &tooltip_active {
            let meta = &self.metas[reference.dataset_index];
            let Some(point) = meta.points.get(reference.index) else {
                continue;
            };

            let x_label = self
                .scales
                .get(&meta.x_axis_id)
                .map(|scale| scale.get_label_for_index(reference.index, reference.dataset_index, &context))
                .unwrap_or_default();
            let y_label = self
                .scales
                .get(&meta.y_axis_id)
                .map(|scale| scale.get_label_for_index(reference.index, reference.dataset_index, &context))
                .unwrap_or_default();

            items.push(TooltipItem {
                x_label,
                y_label,
                index: reference.index,
                dataset_index: reference.dataset_index,
            });

            let view = point.view();
            let (anchor, padding) = view.tooltip_position();
            positions.push((anchor, padding));
            label_colors.push(LabelColors {
                background_color: view.background_color,
                border_color: view.border_color,
            });
        }

        if mode != HitMode::Single {
            if let Some(first) = tooltip_active.first() {
                let meta = &self.metas[first.dataset_index];
                if let Some(scale) = self.scales.get(&meta.y_axis_id) {
                    pinned_y = Some(scale.get_pixel_for_decimal(0.5));
                }
            }
        }

        let dataset_labels: Vec<&str> = self
            .config
            .data
            .datasets
            .iter()
            .map(|dataset| dataset.label.as_str())
            .collect();
        let input = TooltipUpdateInput {
            items,
            positions,
            pinned_y,
            label_colors,
            data: TooltipDataView {
                labels: &self.config.data.labels,
                dataset_labels,
            },
        };
        self.tooltip.update(&input, self.tooltip_callbacks.as_ref());
    }

    /// Pointer state machine: resolves the active and tooltip-active element
    /// sets, swaps hover styles, refreshes the tooltip and schedules the
    /// hover transition when either set changed membership. Returns whether a
    /// redraw was scheduled.
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        geometry: SurfaceGeometry,
        scheduler: &mut AnimationScheduler,
    ) -> ChartResult<bool> {
        if !self.config.options.events.contains(&event.kind) {
            return Ok(false);
        }

        let (x, y) = geometry.relative_position(event);

        if event.kind == PointerEventKind::MouseOut {
            self.active = Vec::new();
            self.tooltip_active = Vec::new();
        } else {
            self.active = self.elements_for_mode(self.config.options.hover.mode, x, y);
            let tooltip_mode = self.config.options.tooltips.mode;
            self.tooltip_active = if tooltip_mode == self.config.options.hover.mode {
                self.active.clone()
            } else {
                self.elements_for_mode(tooltip_mode, x, y)
            };
        }

        if event.kind == PointerEventKind::Click {
            if let Some(on_click) = &mut self.on_click {
                let active = self.active.clone();
                on_click(event, &active);
            }
        }

        let last = std::mem::take(&mut self.last_active);
        let last_tooltip = std::mem::take(&mut self.last_tooltip_active);
        for reference in &last {
            self.metas[reference.dataset_index].remove_hover_style(reference.index, &self.config);
        }
        let active = self.active.clone();
        for reference in &active {
            self.metas[reference.dataset_index].set_hover_style(reference.index, &self.config);
        }

        if self.config.options.tooltips.enabled {
            self.refresh_tooltip();
        }

        let mut scheduled = false;
        if !scheduler.is_animating(self.id) {
            let changed = self.active != last || self.tooltip_active != last_tooltip;
            if changed {
                self.stop(scheduler);
                self.tooltip.pivot();
                scheduled = self.render(
                    scheduler,
                    self.config.options.hover.animation_duration,
                    true,
                );
            }
        }

        self.last_active = self.active.clone();
        self.last_tooltip_active = self.tooltip_active.clone();
        Ok(scheduled)
    }
}
