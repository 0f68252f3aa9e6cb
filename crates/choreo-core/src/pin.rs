//! Pinning: keep a section visually fixed while its region is scrubbed.

use crate::progress::ScrollRegion;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinState {
    #[default]
    Unpinned,
    Pinning,
    Pinned,
    Unpinning,
}

impl PinState {
    /// Whether the element should be held at its viewport position.
    pub fn holds(self) -> bool {
        matches!(self, Self::Pinning | Self::Pinned)
    }
}

#[derive(Clone, Debug)]
pub struct PinController {
    start: f64,
    end: f64,
    anticipate: f64,
    state: PinState,
}

impl PinController {
    /// `anticipate` is a scroll distance before the start at which the pin is
    /// already applied, hiding a one-frame flash on fast scrolls.
    pub fn new(region: &ScrollRegion, anticipate: f64) -> Self {
        Self {
            start: region.start_offset(),
            end: region.end_offset(),
            anticipate: anticipate.max(0.0),
            state: PinState::Unpinned,
        }
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    /// Follow a rebuilt region without forgetting the current state.
    pub fn rebind(&mut self, region: &ScrollRegion) {
        self.start = region.start_offset();
        self.end = region.end_offset();
    }

    pub fn reset(&mut self) {
        self.state = PinState::Unpinned;
    }

    /// Advance the state machine with the raw (unclamped) scroll offset.
    ///
    /// `Pinning` and `Unpinning` are only reported for offsets exactly on a
    /// boundary or inside the anticipation distance. A scroll that steps over
    /// a boundary in one event goes straight between `Unpinned` and `Pinned`;
    /// rendering only depends on [`PinState::holds`] and
    /// [`PinController::translate_y`], which are continuous across that jump.
    pub fn update(&mut self, offset: f64) -> PinState {
        let at_boundary = offset == self.start || offset == self.end;
        self.state = if offset > self.start && offset < self.end {
            PinState::Pinned
        } else if at_boundary {
            match self.state {
                PinState::Pinned | PinState::Unpinning => PinState::Unpinning,
                PinState::Unpinned | PinState::Pinning => PinState::Pinning,
            }
        } else if offset < self.start && self.start - offset <= self.anticipate {
            PinState::Pinning
        } else {
            PinState::Unpinned
        };
        self.state
    }

    /// Translation that keeps the element in place inside its pin spacer.
    ///
    /// Zero before the region, the full duration after it, and tracks the
    /// scroll in between, so release at either end is seamless.
    pub fn translate_y(&self, offset: f64) -> f64 {
        (offset - self.start).clamp(0.0, self.end - self.start)
    }
}
