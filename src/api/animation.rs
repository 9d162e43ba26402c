//! Frame scheduling: one queue entry per chart, advanced by explicit ticks.
//!
//! The host owns the scheduler and drives it from whatever clock it has; the
//! scheduler only does arithmetic. Ticks arriving late are compensated by
//! skipping the equivalent number of animation steps, with the fractional
//! remainder carried to the next tick.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::core::easing::Easing;

/// Nominal frame length; roughly 60 frames a second.
pub const FRAME_DURATION_MS: f64 = 17.0;

/// Identifies one chart instance inside a shared scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

impl ChartId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One in-flight render animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// None until the first tick advances it.
    pub current_step: Option<f64>,
    pub num_steps: f64,
    pub easing: Easing,
}

impl Animation {
    #[must_use]
    pub fn new(num_steps: f64, easing: Easing) -> Self {
        Self {
            current_step: None,
            num_steps: num_steps.max(1.0),
            easing,
        }
    }

    /// Steps derived from a wall-clock duration in milliseconds.
    #[must_use]
    pub fn with_duration(duration_ms: f64, easing: Easing) -> Self {
        Self::new(duration_ms / 16.66, easing)
    }
}

/// Eased progress for one chart on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEvent {
    pub chart_id: ChartId,
    /// Linear progress through the animation, 0..=1.
    pub progress: f64,
    /// Eased progress, handed to the draw pass.
    pub ease: f64,
    pub completed: bool,
}

#[derive(Debug)]
struct Scheduled {
    chart_id: ChartId,
    animation: Animation,
}

/// Advances all scheduled animations in lockstep.
#[derive(Debug)]
pub struct AnimationScheduler {
    frame_duration_ms: f64,
    animations: Vec<Scheduled>,
    drop_frames: f64,
    last_tick_ms: Option<f64>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_duration_ms: FRAME_DURATION_MS,
            animations: Vec::new(),
            drop_frames: 0.0,
            last_tick_ms: None,
        }
    }

    /// Queues an animation; a chart already animating has its entry replaced
    /// so the new animation takes over from the current visual state.
    pub fn schedule(&mut self, chart_id: ChartId, animation: Animation) {
        if let Some(existing) = self
            .animations
            .iter_mut()
            .find(|scheduled| scheduled.chart_id == chart_id)
        {
            existing.animation = animation;
            return;
        }

        self.animations.push(Scheduled {
            chart_id,
            animation,
        });
        trace!(queued = self.animations.len(), "animation scheduled");
    }

    /// Removes the chart's pending animation. Returns whether one existed.
    pub fn cancel(&mut self, chart_id: ChartId) -> bool {
        let before = self.animations.len();
        self.animations.retain(|scheduled| scheduled.chart_id != chart_id);
        self.animations.len() != before
    }

    #[must_use]
    pub fn is_animating(&self, chart_id: ChartId) -> bool {
        self.animations
            .iter()
            .any(|scheduled| scheduled.chart_id == chart_id)
    }

    #[must_use]
    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Advances every animation one frame (plus any dropped frames) and
    /// reports the per-chart progress. Completed animations are removed.
    pub fn tick(&mut self, now_ms: f64) -> Vec<FrameEvent> {
        if self.animations.is_empty() {
            self.last_tick_ms = None;
            return Vec::new();
        }

        if let Some(last) = self.last_tick_ms {
            let elapsed_frames = (now_ms - last) / self.frame_duration_ms;
            self.drop_frames = (self.drop_frames + elapsed_frames - 1.0).max(0.0);
        }
        self.last_tick_ms = Some(now_ms);

        let frames_to_drop = if self.drop_frames > 1.0 {
            let whole = self.drop_frames.floor();
            self.drop_frames -= whole;
            whole
        } else {
            0.0
        };

        let mut events = Vec::with_capacity(self.animations.len());
        self.animations.retain_mut(|scheduled| {
            let animation = &mut scheduled.animation;
            let mut step = animation.current_step.unwrap_or(0.0) + 1.0 + frames_to_drop;
            if step > animation.num_steps {
                step = animation.num_steps;
            }
            animation.current_step = Some(step);

            let progress = step / animation.num_steps;
            let completed = step >= animation.num_steps;
            events.push(FrameEvent {
                chart_id: scheduled.chart_id,
                progress,
                ease: animation.easing.apply(progress),
                completed,
            });
            !completed
        });

        if self.animations.is_empty() {
            self.last_tick_ms = None;
        }

        events
    }
}
