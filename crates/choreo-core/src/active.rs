//! Continuous progress to a discrete "active item" selection.
//!
//! Two strategies are kept side by side because sections use both:
//! quantizing the region's progress into `N` equal segments, or letting each
//! item report whether its trigger band is currently satisfied.

use crate::error::{ChoreoError, Result};

/// `min(N-1, floor(p * N))`. A boundary belongs to the segment it starts.
pub fn quantize(progress: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let p = progress.clamp(0.0, 1.0);
    ((p * count as f64).floor() as usize).min(count - 1)
}

/// Vertical band of the viewport an item's top edge must sit in, as
/// percentages from the top. `top 70%` to `top 55%` by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerBand {
    pub enter_pct: f64,
    pub leave_pct: f64,
}

impl Default for TriggerBand {
    fn default() -> Self {
        Self {
            enter_pct: 70.0,
            leave_pct: 55.0,
        }
    }
}

impl TriggerBand {
    pub fn satisfied(&self, item_top: f64, scroll_y: f64, viewport_height: f64) -> bool {
        let y = item_top - scroll_y;
        let lo = viewport_height * self.enter_pct.min(self.leave_pct) / 100.0;
        let hi = viewport_height * self.enter_pct.max(self.leave_pct) / 100.0;
        (lo..=hi).contains(&y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndexStrategy {
    /// Equal segments of region progress. `hysteresis` is how far (in
    /// progress units) the scroll must fall below the current segment before
    /// stepping back to an earlier item.
    Progress { hysteresis: f64 },
    /// Per-item trigger bands, last satisfied report wins.
    Intersection { band: TriggerBand },
}

impl IndexStrategy {
    pub const QUANTIZED: Self = Self::Progress { hysteresis: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStep {
    Exit(usize),
    Enter(usize),
}

/// A change of active item. Both halves belong to the same frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexChange {
    pub previous: usize,
    pub current: usize,
}

impl IndexChange {
    /// Tear down the previous item before building up the next one.
    pub fn steps(&self) -> [TransitionStep; 2] {
        [
            TransitionStep::Exit(self.previous),
            TransitionStep::Enter(self.current),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct ActiveIndexReducer {
    count: usize,
    strategy: IndexStrategy,
    initial: usize,
    current: usize,
}

impl ActiveIndexReducer {
    pub fn new(region: &str, count: usize, strategy: IndexStrategy, initial: usize) -> Result<Self> {
        if count == 0 {
            return Err(ChoreoError::EmptyIndex {
                region: region.to_string(),
            });
        }
        let initial = initial.min(count - 1);
        Ok(Self {
            count,
            strategy,
            initial,
            current: initial,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Progress-quantized update. Ignored under the intersection strategy.
    pub fn on_progress(&mut self, progress: f64) -> Option<IndexChange> {
        let IndexStrategy::Progress { hysteresis } = self.strategy else {
            return None;
        };
        let raw = quantize(progress, self.count);
        let next = if raw < self.current {
            let floor_of_current = self.current as f64 / self.count as f64;
            if progress >= floor_of_current - hysteresis {
                self.current
            } else {
                raw
            }
        } else {
            raw
        };
        self.set(next)
    }

    /// One item's band report. Reports must arrive in DOM order.
    pub fn on_report(&mut self, item: usize, satisfied: bool) -> Option<IndexChange> {
        if !satisfied || item >= self.count {
            return None;
        }
        self.set(item)
    }

    /// Evaluate every item's band top-to-bottom and fold the reports into a
    /// single change for this frame.
    pub fn on_item_tops(
        &mut self,
        item_tops: &[f64],
        scroll_y: f64,
        viewport_height: f64,
    ) -> Option<IndexChange> {
        let IndexStrategy::Intersection { band } = self.strategy else {
            return None;
        };
        let before = self.current;
        for (i, top) in item_tops.iter().enumerate() {
            self.on_report(i, band.satisfied(*top, scroll_y, viewport_height));
        }
        (self.current != before).then_some(IndexChange {
            previous: before,
            current: self.current,
        })
    }

    fn set(&mut self, next: usize) -> Option<IndexChange> {
        if next == self.current {
            return None;
        }
        let change = IndexChange {
            previous: self.current,
            current: next,
        };
        self.current = next;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantizes_four_items() {
        let cases = [(0.0, 0), (0.24, 0), (0.26, 1), (0.99, 3), (1.0, 3)];
        for (p, want) in cases {
            assert_eq!(quantize(p, 4), want, "progress {p}");
        }
    }

    #[test]
    fn boundary_ties_enter_the_next_segment() {
        assert_eq!(quantize(0.25, 4), 1);
        assert_eq!(quantize(0.5, 4), 2);
    }

    #[test]
    fn empty_reducer_is_a_configuration_error() {
        let err = ActiveIndexReducer::new("services", 0, IndexStrategy::QUANTIZED, 0).unwrap_err();
        assert_eq!(
            err,
            ChoreoError::EmptyIndex {
                region: "services".into()
            }
        );
    }

    #[test]
    fn reports_only_real_changes() {
        let mut r = ActiveIndexReducer::new("s", 4, IndexStrategy::QUANTIZED, 0).unwrap();
        assert_eq!(r.on_progress(0.1), None);
        assert_eq!(
            r.on_progress(0.3),
            Some(IndexChange {
                previous: 0,
                current: 1
            })
        );
        assert_eq!(r.on_progress(0.4), None);
        assert_eq!(r.current(), 1);
    }

    #[test]
    fn hysteresis_only_applies_backwards() {
        let strategy = IndexStrategy::Progress { hysteresis: 0.05 };
        let mut r = ActiveIndexReducer::new("s", 4, strategy, 0).unwrap();
        assert!(r.on_progress(0.25).is_some());
        assert_eq!(r.current(), 1);
        // Just below the boundary: hold.
        assert_eq!(r.on_progress(0.22), None);
        assert_eq!(r.current(), 1);
        // Well below: step back.
        assert!(r.on_progress(0.18).is_some());
        assert_eq!(r.current(), 0);
    }

    #[test]
    fn overlapping_bands_resolve_to_the_last_item_in_dom_order() {
        let strategy = IndexStrategy::Intersection {
            band: TriggerBand::default(),
        };
        let mut r = ActiveIndexReducer::new("steps", 3, strategy, 0).unwrap();
        // Viewport 1000: band is y in [550, 700]. Items 1 and 2 both inside.
        let change = r.on_item_tops(&[100.0, 600.0, 680.0], 0.0, 1000.0);
        assert_eq!(
            change,
            Some(IndexChange {
                previous: 0,
                current: 2
            })
        );
        // Re-evaluating the same geometry does not flicker.
        assert_eq!(r.on_item_tops(&[100.0, 600.0, 680.0], 0.0, 1000.0), None);
        // Nothing satisfied: the last active item stays.
        assert_eq!(r.on_item_tops(&[100.0, 200.0, 300.0], 0.0, 1000.0), None);
        assert_eq!(r.current(), 2);
    }

    #[test]
    fn transition_tears_down_before_building_up() {
        let change = IndexChange {
            previous: 1,
            current: 2,
        };
        assert_eq!(
            change.steps(),
            [TransitionStep::Exit(1), TransitionStep::Enter(2)]
        );
    }

    #[test]
    fn reset_restores_the_configured_default() {
        let mut r = ActiveIndexReducer::new("s", 3, IndexStrategy::QUANTIZED, 7).unwrap();
        assert_eq!(r.current(), 2);
        r.on_progress(0.0);
        assert_eq!(r.current(), 0);
        r.reset();
        assert_eq!(r.current(), 2);
    }
}
