//! Progress sources: real document scroll and the wheel/touch accumulator.

use crate::constants::{HERO_HOLD_FRACTION, REENGAGE_SCROLL_Y, SERVICES_HERO_STEP};
use crate::error::{ChoreoError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fixed span of the document's scroll axis bound to one section.
///
/// Immutable once built; a resize builds a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollRegion {
    id: RegionId,
    start_offset: f64,
    end_offset: f64,
    pinned: bool,
}

impl ScrollRegion {
    pub fn new(id: RegionId, start_offset: f64, end_offset: f64, pinned: bool) -> Result<Self> {
        if !(end_offset > start_offset) {
            return Err(ChoreoError::ZeroDuration {
                region: id.0,
                start: start_offset,
                end: end_offset,
            });
        }
        Ok(Self {
            id,
            start_offset,
            end_offset,
            pinned,
        })
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn end_offset(&self) -> f64 {
        self.end_offset
    }

    pub fn duration(&self) -> f64 {
        self.end_offset - self.start_offset
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn progress_at(&self, offset: f64) -> f64 {
        ((offset - self.start_offset) / self.duration()).clamp(0.0, 1.0)
    }
}

/// Anything that yields a section's current progress in `[0, 1]`.
pub trait ProgressSource {
    fn progress(&self) -> f64;
}

/// Progress from `window.scrollY` relative to a region.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    region: ScrollRegion,
    offset: f64,
}

impl ScrollTracker {
    pub fn new(region: ScrollRegion) -> Self {
        let offset = region.start_offset();
        Self { region, offset }
    }

    pub fn region(&self) -> &ScrollRegion {
        &self.region
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Swap in a region rebuilt after resize, keeping the last scroll offset.
    pub fn rebind(&mut self, region: ScrollRegion) {
        self.region = region;
    }
}

impl ProgressSource for ScrollTracker {
    fn progress(&self) -> f64 {
        self.region.progress_at(self.offset)
    }
}

pub const ACCUMULATOR_MAX: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccumulatorConfig {
    /// Fixed increment per wheel/touch event, in accumulator units.
    pub step: f64,
    /// Minimum time between two accepted steps.
    pub min_interval_ms: f64,
    /// Hold at 100 before native scroll is handed back.
    pub complete_delay_ms: f64,
    /// Scroll offset at or below which the finished reveal can be reversed.
    pub reengage_scroll_y: f64,
    /// Input is only taken over while the section's bottom edge is below
    /// this fraction of the viewport height and its top has reached the
    /// viewport top.
    pub hold_fraction: f64,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            step: SERVICES_HERO_STEP,
            min_interval_ms: 0.0,
            complete_delay_ms: 0.0,
            reengage_scroll_y: REENGAGE_SCROLL_Y,
            hold_fraction: HERO_HOLD_FRACTION,
        }
    }
}

/// What the caller must do with the wheel/touch event it just forwarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intercept {
    /// Leave the event alone; the page scrolls natively.
    Pass,
    /// Call `preventDefault`; `moved` reports whether the accumulator changed.
    Prevent { moved: bool },
}

impl Intercept {
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Prevent { .. })
    }
}

/// Scroll-jacked progress driven by wheel and touch deltas.
///
/// Each event moves the accumulator one fixed step in the delta's direction,
/// so mice and trackpads advance equally. The value is clamped to `[0, 100]`.
#[derive(Clone, Debug)]
pub struct Accumulator {
    config: AccumulatorConfig,
    value: f64,
    last_step_ms: Option<f64>,
    reached_max_ms: Option<f64>,
}

impl Accumulator {
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            config,
            value: 0.0,
            last_step_ms: None,
            reached_max_ms: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// Reveal has finished and native scroll owns the page.
    pub fn is_complete(&self, now_ms: f64) -> bool {
        match self.reached_max_ms {
            Some(t) => now_ms - t >= self.config.complete_delay_ms,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.last_step_ms = None;
        self.reached_max_ms = None;
    }

    /// Feed one wheel or touch delta. `scroll_y` is the page's native offset.
    pub fn on_delta(&mut self, delta: f64, scroll_y: f64, now_ms: f64) -> Intercept {
        if delta == 0.0 || !delta.is_finite() {
            return Intercept::Pass;
        }
        let down = delta > 0.0;
        if self.value >= ACCUMULATOR_MAX {
            // Finished: native scroll, unless the user scrolls back up at the top.
            if down || scroll_y > self.config.reengage_scroll_y {
                return Intercept::Pass;
            }
            if !self.is_complete(now_ms) {
                return Intercept::Prevent { moved: false };
            }
        } else if self.value <= 0.0 && !down {
            return Intercept::Pass;
        }

        if let Some(last) = self.last_step_ms {
            if now_ms - last < self.config.min_interval_ms {
                return Intercept::Prevent { moved: false };
            }
        }

        let dir = if down { 1.0 } else { -1.0 };
        self.value = (self.value + dir * self.config.step).clamp(0.0, ACCUMULATOR_MAX);
        self.last_step_ms = Some(now_ms);
        self.reached_max_ms = (self.value >= ACCUMULATOR_MAX).then_some(now_ms);
        Intercept::Prevent { moved: true }
    }
}

impl ProgressSource for Accumulator {
    fn progress(&self) -> f64 {
        self.value / ACCUMULATOR_MAX
    }
}

/// Turns `touchstart`/`touchmove` client Y positions into wheel-like deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchTracker {
    last_y: Option<f64>,
}

impl TouchTracker {
    pub fn start(&mut self, client_y: f64) {
        self.last_y = Some(client_y);
    }

    /// Positive when the finger moves up (content would scroll down).
    pub fn move_to(&mut self, client_y: f64) -> f64 {
        let delta = self.last_y.map_or(0.0, |y| y - client_y);
        self.last_y = Some(client_y);
        delta
    }

    pub fn end(&mut self) {
        self.last_y = None;
    }
}
