//! One-shot, time-driven staggered reveals.
//!
//! Unlike scrubbed sections these fire once when the trigger line is
//! crossed and then play on the frame clock; scrolling back never replays.

use crate::constants::{REVEAL_OFFSET_PX, STAGGER_FAST};
use crate::error::Result;
use crate::interp::{Property, Track, Value};
use crate::runtime;
use crate::trigger::{Edge, Layout, TriggerPoint};
use smallvec::SmallVec;

pub type ChildValues = SmallVec<[(Property, Value); 4]>;

#[derive(Clone, Debug)]
pub struct RevealConfig {
    pub trigger: TriggerPoint,
    pub duration_sec: f64,
    pub stagger_sec: f64,
    pub tracks: Vec<Track>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let d = runtime::defaults();
        Self {
            trigger: TriggerPoint::new(Edge::Top, Edge::Percent(85.0)),
            duration_sec: d.duration_sec,
            stagger_sec: STAGGER_FAST,
            tracks: vec![
                Track::number(Property::Opacity, 0.0, 1.0, d.ease),
                Track::number(Property::TranslateYPx, REVEAL_OFFSET_PX, 0.0, d.ease),
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Reveal {
    config: RevealConfig,
    count: usize,
    trigger_offset: Option<f64>,
    elapsed: Option<f64>,
}

impl Reveal {
    pub fn new(config: RevealConfig, count: usize) -> Result<Self> {
        for t in &config.tracks {
            t.validate()?;
        }
        Ok(Self {
            config,
            count,
            trigger_offset: None,
            elapsed: None,
        })
    }

    pub fn resolve(&mut self, layout: &Layout) {
        self.trigger_offset = Some(self.config.trigger.resolve(layout));
    }

    pub fn triggered(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn total_sec(&self) -> f64 {
        self.config.duration_sec + self.config.stagger_sec * self.count.saturating_sub(1) as f64
    }

    pub fn finished(&self) -> bool {
        self.elapsed.is_some_and(|e| e >= self.total_sec())
    }

    /// Returns true on the scroll that fires the reveal.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        match (self.elapsed, self.trigger_offset) {
            (None, Some(at)) if scroll_y >= at => {
                self.elapsed = Some(0.0);
                true
            }
            _ => false,
        }
    }

    pub fn advance(&mut self, dt_sec: f64) {
        if let Some(e) = self.elapsed.as_mut() {
            *e += dt_sec.max(0.0);
        }
    }

    /// Local progress of child `i`.
    pub fn local(&self, i: usize) -> f64 {
        let Some(elapsed) = self.elapsed else {
            return 0.0;
        };
        if self.config.duration_sec <= 0.0 {
            return 1.0;
        }
        let t = elapsed - self.config.stagger_sec * i as f64;
        (t / self.config.duration_sec).clamp(0.0, 1.0)
    }

    pub fn values(&self) -> Vec<ChildValues> {
        (0..self.count)
            .map(|i| {
                let local = self.local(i);
                self.config
                    .tracks
                    .iter()
                    .filter_map(|t| t.sample(local).map(|v| (t.property, v)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;

    fn reveal(count: usize) -> Reveal {
        let config = RevealConfig {
            duration_sec: 1.0,
            stagger_sec: 0.1,
            tracks: vec![Track::number(Property::Opacity, 0.0, 1.0, Ease::Linear)],
            ..RevealConfig::default()
        };
        let mut r = Reveal::new(config, count).unwrap();
        r.resolve(&Layout::new(1000.0, 400.0, 1280.0, 800.0));
        r
    }

    #[test]
    fn fires_once_at_the_trigger_line() {
        let mut r = reveal(3);
        // top 85% of an 800px viewport: 1000 - 680 = 320.
        assert!(!r.on_scroll(300.0));
        assert!(r.on_scroll(320.0));
        assert!(!r.on_scroll(400.0));
        assert!(!r.on_scroll(0.0));
        assert!(r.triggered());
    }

    #[test]
    fn children_are_staggered() {
        let mut r = reveal(3);
        r.on_scroll(1000.0);
        r.advance(0.5);
        assert_eq!(r.local(0), 0.5);
        assert!((r.local(2) - 0.3).abs() < 1e-9);
        r.advance(0.8);
        assert!(r.finished());
        let values = r.values();
        assert!(values
            .iter()
            .all(|v| v[0] == (Property::Opacity, Value::Number(1.0))));
    }

    #[test]
    fn untriggered_reveal_holds_initial_state() {
        let r = reveal(2);
        assert_eq!(r.values()[1][0], (Property::Opacity, Value::Number(0.0)));
    }
}
