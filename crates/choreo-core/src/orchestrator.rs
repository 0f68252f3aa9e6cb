//! One section's choreography: progress source, child windows, pin and
//! active-index reducer, wired to a platform through [`EventHost`].
//!
//! Progress is read once per frame and every child is sampled from that
//! single value, so siblings never disagree within a frame.

use crate::active::{ActiveIndexReducer, IndexChange, IndexStrategy};
use crate::constants::SCRUB_SETTLE_EPSILON;
use crate::error::{ChoreoError, Result};
use crate::host::{EventHost, EventKind, FrameId, ListenerId};
use crate::interp::{Property, Track, Value};
use crate::pin::{PinController, PinState};
use crate::progress::{
    Accumulator, AccumulatorConfig, Intercept, ProgressSource, RegionId, ScrollRegion,
    ScrollTracker, TouchTracker, ACCUMULATOR_MAX,
};
use crate::runtime;
use crate::trigger::{EndSpec, Layout, TriggerPoint};
use crate::window::ChildWindow;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drive {
    Scroll,
    Accumulator(AccumulatorConfig),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scrub {
    /// Displayed progress equals scroll progress.
    Instant,
    /// Displayed progress chases scroll progress with this time constant.
    Smoothed { lag_sec: f64 },
}

/// A set of tracks sampled over one window and written to one element.
///
/// Several specs may share a `target`. For a shared property the first spec
/// supplies the resting value and a later spec takes over once progress
/// reaches its window.
#[derive(Clone, Debug)]
pub struct ChildSpec {
    pub target: usize,
    pub window: ChildWindow,
    pub tracks: Vec<Track>,
}

impl ChildSpec {
    pub fn new(target: usize, window: ChildWindow) -> Self {
        Self {
            target,
            window,
            tracks: Vec::new(),
        }
    }

    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexConfig {
    pub count: usize,
    pub strategy: IndexStrategy,
    pub initial: usize,
}

#[derive(Clone, Debug)]
pub struct SectionConfig {
    pub id: RegionId,
    pub start: TriggerPoint,
    pub end: EndSpec,
    pub pinned: bool,
    pub anticipate: f64,
    pub drive: Drive,
    pub scrub: Scrub,
    pub children: Vec<ChildSpec>,
    pub index: Option<IndexConfig>,
}

impl SectionConfig {
    pub fn scroll(id: &str, start: TriggerPoint, end: EndSpec) -> Self {
        Self {
            id: RegionId::new(id),
            start,
            end,
            pinned: false,
            anticipate: runtime::defaults().anticipate_px,
            drive: Drive::Scroll,
            scrub: Scrub::Instant,
            children: Vec::new(),
            index: None,
        }
    }

    pub fn accumulator(id: &str, config: AccumulatorConfig) -> Self {
        Self {
            drive: Drive::Accumulator(config),
            anticipate: 0.0,
            ..Self::scroll(id, TriggerPoint::TOP_TOP, EndSpec::Point(TriggerPoint::TOP_TOP))
        }
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn anticipate(mut self, px: f64) -> Self {
        self.anticipate = px;
        self
    }

    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn child(mut self, child: ChildSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn index(mut self, index: IndexConfig) -> Self {
        self.index = Some(index);
        self
    }

    /// Number of distinct elements the children write to.
    pub fn target_count(&self) -> usize {
        self.children.iter().map(|c| c.target + 1).max().unwrap_or(0)
    }

    /// Fails when a child writes to an element the page does not have.
    pub fn check_targets(&self, available: usize) -> Result<()> {
        let needed = self.target_count();
        if needed > available {
            return Err(ChoreoError::ChildOutOfRange {
                index: needed - 1,
                count: available,
            });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for child in &self.children {
            for track in &child.tracks {
                track.validate()?;
            }
        }
        if let Drive::Accumulator(cfg) = self.drive {
            if !(cfg.step > 0.0) {
                return Err(ChoreoError::ZeroDuration {
                    region: self.id.0.clone(),
                    start: 0.0,
                    end: cfg.step,
                });
            }
        }
        Ok(())
    }

    fn listener_kinds(&self) -> &'static [EventKind] {
        match self.drive {
            Drive::Scroll => &[EventKind::Scroll, EventKind::Resize],
            Drive::Accumulator(_) => &[
                EventKind::Wheel,
                EventKind::TouchStart,
                EventKind::TouchMove,
                EventKind::Resize,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachState {
    Detached,
    /// Attach was requested before the section's element existed.
    Pending,
    Attached,
}

pub type TargetValues = SmallVec<[(Property, Value); 6]>;

#[derive(Clone, Debug, PartialEq)]
pub struct TargetFrame {
    pub target: usize,
    pub values: TargetValues,
}

/// Everything the render layer needs for one animation frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub region: RegionId,
    /// Displayed (possibly smoothed) progress every child was sampled from.
    pub progress: f64,
    pub raw_progress: f64,
    pub scroll_y: f64,
    pub pin: PinState,
    pub pin_translate: f64,
    /// Local progress per child spec, in config order.
    pub locals: SmallVec<[f64; 8]>,
    pub targets: SmallVec<[TargetFrame; 8]>,
    pub index_change: Option<IndexChange>,
    pub active: Option<usize>,
}

pub struct Orchestrator {
    config: SectionConfig,
    state: AttachState,
    listeners: SmallVec<[ListenerId; 4]>,
    pending_frame: Option<FrameId>,
    layout: Option<Layout>,
    region: Option<ScrollRegion>,
    tracker: Option<ScrollTracker>,
    accumulator: Option<Accumulator>,
    touch: TouchTracker,
    pin: Option<PinController>,
    index: Option<ActiveIndexReducer>,
    scroll_y: f64,
    shown: f64,
}

impl Orchestrator {
    /// Validate the section. Every configuration error surfaces here or from
    /// `attach`/`resize`, never later from a frame.
    pub fn new(config: SectionConfig) -> Result<Self> {
        config.validate()?;
        let index = config
            .index
            .map(|ix| ActiveIndexReducer::new(&config.id.0, ix.count, ix.strategy, ix.initial))
            .transpose()?;
        let accumulator = match config.drive {
            Drive::Accumulator(cfg) => Some(Accumulator::new(cfg)),
            Drive::Scroll => None,
        };
        Ok(Self {
            config,
            state: AttachState::Detached,
            listeners: SmallVec::new(),
            pending_frame: None,
            layout: None,
            region: None,
            tracker: None,
            accumulator,
            touch: TouchTracker::default(),
            pin: None,
            index,
            scroll_y: 0.0,
            shown: 0.0,
        })
    }

    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    pub fn id(&self) -> &RegionId {
        &self.config.id
    }

    pub fn state(&self) -> AttachState {
        self.state
    }

    pub fn region(&self) -> Option<&ScrollRegion> {
        self.region.as_ref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.index.as_ref().map(|r| r.current())
    }

    pub fn progress(&self) -> f64 {
        self.shown
    }

    pub fn pin_state(&self) -> PinState {
        self.pin.as_ref().map_or(PinState::Unpinned, |p| p.state())
    }

    /// Wire listeners for this section. `layout` is `None` while the
    /// section's element is not mounted; the attach then waits for
    /// [`Orchestrator::mounted`] instead of failing.
    pub fn attach(&mut self, host: &mut dyn EventHost, layout: Option<Layout>) -> Result<AttachState> {
        if self.state == AttachState::Attached {
            return Ok(self.state);
        }
        let Some(layout) = layout else {
            log::info!("[section {}] element not mounted yet; attach pending", self.config.id);
            self.state = AttachState::Pending;
            return Ok(self.state);
        };
        let region = self.resolve(&layout)?;
        self.apply(region, layout);
        self.shown = self.target_progress();
        self.bind(host);
        self.state = AttachState::Attached;
        self.schedule(host);
        log::debug!(
            "[section {}] attached: {:?}",
            self.config.id,
            self.region.as_ref().map(|r| (r.start_offset(), r.end_offset()))
        );
        Ok(self.state)
    }

    /// The element appeared; completes a pending attach.
    pub fn mounted(&mut self, host: &mut dyn EventHost, layout: Layout) -> Result<AttachState> {
        match self.state {
            AttachState::Pending => self.attach(host, Some(layout)),
            other => Ok(other),
        }
    }

    /// Release every listener and pending frame. Safe to call repeatedly.
    pub fn detach(&mut self, host: &mut dyn EventHost) -> bool {
        if self.state == AttachState::Detached {
            return false;
        }
        self.unbind(host);
        if let Some(frame) = self.pending_frame.take() {
            host.cancel_frame(frame);
        }
        if let Some(index) = self.index.as_mut() {
            index.reset();
        }
        if let Some(pin) = self.pin.as_mut() {
            pin.reset();
        }
        if let Some(acc) = self.accumulator.as_mut() {
            acc.reset();
        }
        self.touch.end();
        self.state = AttachState::Detached;
        log::debug!("[section {}] detached", self.config.id);
        true
    }

    /// Recompute the region and windows for a new viewport, replacing the
    /// listener set. On error the previous binding stays in place.
    pub fn resize(&mut self, host: &mut dyn EventHost, layout: Layout) -> Result<()> {
        match self.state {
            AttachState::Detached => return Ok(()),
            AttachState::Pending => return self.attach(host, Some(layout)).map(|_| ()),
            AttachState::Attached => {}
        }
        let region = self.resolve(&layout)?;
        self.unbind(host);
        self.apply(region, layout);
        self.bind(host);
        self.shown = self.shown.clamp(0.0, 1.0);
        self.schedule(host);
        log::debug!("[section {}] resized", self.config.id);
        Ok(())
    }

    /// Record the page offset. Before attach the offset is only remembered,
    /// so a page that loads already scrolled starts from where it is.
    pub fn on_scroll(&mut self, host: &mut dyn EventHost, scroll_y: f64) -> bool {
        self.scroll_y = scroll_y;
        if self.state != AttachState::Attached {
            return false;
        }
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.set_offset(scroll_y);
        }
        self.schedule(host);
        true
    }

    pub fn on_wheel(
        &mut self,
        host: &mut dyn EventHost,
        delta: f64,
        scroll_y: f64,
        now_ms: f64,
    ) -> Intercept {
        if self.state != AttachState::Attached {
            return Intercept::Pass;
        }
        self.scroll_y = scroll_y;
        let Some(acc) = self.accumulator.as_mut() else {
            return Intercept::Pass;
        };
        let holds = self
            .layout
            .as_ref()
            .is_some_and(|l| l.holds_viewport(scroll_y, acc.config().hold_fraction));
        if !holds {
            return Intercept::Pass;
        }
        let intercept = acc.on_delta(delta, scroll_y, now_ms);
        if intercept == (Intercept::Prevent { moved: true }) {
            self.schedule(host);
        }
        intercept
    }

    pub fn on_touch_start(&mut self, client_y: f64) {
        if self.state == AttachState::Attached {
            self.touch.start(client_y);
        }
    }

    pub fn on_touch_move(
        &mut self,
        host: &mut dyn EventHost,
        client_y: f64,
        scroll_y: f64,
        now_ms: f64,
    ) -> Intercept {
        if self.state != AttachState::Attached {
            return Intercept::Pass;
        }
        let delta = self.touch.move_to(client_y);
        self.on_wheel(host, delta, scroll_y, now_ms)
    }

    /// Produce the frame for the animation-frame callback that was scheduled.
    /// Returns `None` once detached.
    pub fn frame(&mut self, host: &mut dyn EventHost, dt_sec: f64) -> Option<Frame> {
        if self.state != AttachState::Attached {
            return None;
        }
        self.pending_frame = None;

        let raw = self.target_progress();
        self.shown = match self.config.scrub {
            Scrub::Smoothed { lag_sec } if lag_sec > 0.0 => {
                let alpha = 1.0 - (-dt_sec.max(0.0) / lag_sec).exp();
                let next = self.shown + (raw - self.shown) * alpha;
                if (raw - next).abs() < SCRUB_SETTLE_EPSILON {
                    raw
                } else {
                    next
                }
            }
            _ => raw,
        }
        .clamp(0.0, 1.0);
        if self.shown != raw {
            self.schedule(host);
        }
        let p = self.shown;

        let scroll_y = self.scroll_y;
        let (pin, pin_translate) = match self.pin.as_mut() {
            Some(pc) => (pc.update(scroll_y), pc.translate_y(scroll_y)),
            None => (PinState::Unpinned, 0.0),
        };

        let index_change = match self.index.as_mut() {
            Some(reducer) => match reducer.strategy() {
                IndexStrategy::Progress { .. } => reducer.on_progress(p),
                IndexStrategy::Intersection { .. } => match self.layout.as_ref() {
                    Some(l) => reducer.on_item_tops(&l.item_tops, scroll_y, l.viewport_height),
                    None => None,
                },
            },
            None => None,
        };
        if let Some(change) = index_change {
            log::debug!(
                "[section {}] active {} -> {}",
                self.config.id,
                change.previous,
                change.current
            );
        }

        let (locals, targets) = self.fan_out(p);
        Some(Frame {
            region: self.config.id.clone(),
            progress: p,
            raw_progress: raw,
            scroll_y,
            pin,
            pin_translate,
            locals,
            targets,
            index_change,
            active: self.active_index(),
        })
    }

    /// Absolute scroll offsets of every child window.
    pub fn child_offsets(&self) -> Vec<(f64, f64)> {
        let Some(region) = self.region.as_ref() else {
            return Vec::new();
        };
        let (start, duration) = (region.start_offset(), region.duration());
        self.config
            .children
            .iter()
            .map(|c| {
                (
                    start + c.window.start() * duration,
                    start + c.window.end() * duration,
                )
            })
            .collect()
    }

    /// Sample every child at `p`. When several specs write the same property
    /// of one target, the first spec provides the initial value and later
    /// specs take over once their window has been reached.
    fn fan_out(&self, p: f64) -> (SmallVec<[f64; 8]>, SmallVec<[TargetFrame; 8]>) {
        let mut locals = SmallVec::new();
        let mut targets: SmallVec<[TargetFrame; 8]> = SmallVec::new();
        for spec in &self.config.children {
            let local = spec.window.local(p);
            locals.push(local);
            let reached = p >= spec.window.start();
            let slot = match targets.iter().position(|t| t.target == spec.target) {
                Some(i) => i,
                None => {
                    targets.push(TargetFrame {
                        target: spec.target,
                        values: TargetValues::new(),
                    });
                    targets.len() - 1
                }
            };
            let values = &mut targets[slot].values;
            for track in &spec.tracks {
                let Some(v) = track.sample(local) else {
                    continue;
                };
                match values.iter_mut().find(|(prop, _)| *prop == track.property) {
                    Some(existing) if reached => existing.1 = v,
                    Some(_) => {}
                    None => values.push((track.property, v)),
                }
            }
        }
        (locals, targets)
    }

    fn target_progress(&self) -> f64 {
        match (&self.accumulator, &self.tracker) {
            (Some(acc), _) => acc.progress(),
            (None, Some(tracker)) => tracker.progress(),
            (None, None) => 0.0,
        }
    }

    fn resolve(&self, layout: &Layout) -> Result<ScrollRegion> {
        let id = self.config.id.clone();
        match self.config.drive {
            Drive::Scroll => {
                let start = self.config.start.resolve(layout);
                let end = self.config.end.resolve(start, layout);
                ScrollRegion::new(id, start, end, self.config.pinned)
            }
            Drive::Accumulator(_) => ScrollRegion::new(id, 0.0, ACCUMULATOR_MAX, false),
        }
    }

    fn apply(&mut self, region: ScrollRegion, layout: Layout) {
        if self.config.drive == Drive::Scroll {
            let mut tracker = ScrollTracker::new(region.clone());
            tracker.set_offset(self.scroll_y);
            self.tracker = Some(tracker);
            if region.pinned() {
                match self.pin.as_mut() {
                    Some(pin) => pin.rebind(&region),
                    None => self.pin = Some(PinController::new(&region, self.config.anticipate)),
                }
            }
        }
        self.region = Some(region);
        self.layout = Some(layout);
    }

    fn bind(&mut self, host: &mut dyn EventHost) {
        for kind in self.config.listener_kinds() {
            self.listeners.push(host.listen(*kind));
        }
    }

    fn unbind(&mut self, host: &mut dyn EventHost) {
        for id in self.listeners.drain(..) {
            host.unlisten(id);
        }
    }

    fn schedule(&mut self, host: &mut dyn EventHost) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(host.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;
    use crate::host::RecordingHost;
    use crate::trigger::Distance;

    fn layout() -> Layout {
        Layout::new(1000.0, 900.0, 1440.0, 900.0)
    }

    fn section() -> SectionConfig {
        SectionConfig::scroll(
            "cards",
            TriggerPoint::TOP_TOP,
            EndSpec::After(Distance::ViewportPercent(200.0)),
        )
        .pinned(true)
        .anticipate(0.0)
        .child(
            ChildSpec::new(0, ChildWindow::new(0.0, 0.5).unwrap())
                .track(Track::number(Property::Opacity, 0.0, 1.0, Ease::Linear)),
        )
        .child(
            ChildSpec::new(1, ChildWindow::new(0.5, 1.0).unwrap())
                .track(Track::number(Property::BlurPx, 8.0, 0.0, Ease::Linear)),
        )
    }

    #[test]
    fn attach_resolves_region_and_registers_listeners() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section()).unwrap();
        assert_eq!(o.attach(&mut host, Some(layout())).unwrap(), AttachState::Attached);
        let region = o.region().unwrap();
        assert_eq!((region.start_offset(), region.end_offset()), (1000.0, 2800.0));
        assert!(host.is_listening(EventKind::Scroll));
        assert!(host.is_listening(EventKind::Resize));
        assert_eq!(host.live_listeners(), 2);
        // A second attach does not double-register.
        o.attach(&mut host, Some(layout())).unwrap();
        assert_eq!(host.live_listeners(), 2);
    }

    #[test]
    fn children_sample_from_one_progress_read() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section()).unwrap();
        o.attach(&mut host, Some(layout())).unwrap();
        o.on_scroll(&mut host, 1000.0 + 1800.0 * 0.75);
        let f = o.frame(&mut host, 1.0 / 60.0).unwrap();
        assert_eq!(f.progress, 0.75);
        assert_eq!(f.locals.as_slice(), &[1.0, 0.5]);
        assert_eq!(f.targets[0].values[0], (Property::Opacity, Value::Number(1.0)));
        assert_eq!(f.targets[1].values[0], (Property::BlurPx, Value::Number(4.0)));
        assert_eq!(f.pin, PinState::Pinned);
        assert_eq!(f.pin_translate, 1350.0);
    }

    #[test]
    fn frames_are_coalesced() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section()).unwrap();
        o.attach(&mut host, Some(layout())).unwrap();
        for y in [1100.0, 1200.0, 1300.0] {
            o.on_scroll(&mut host, y);
        }
        assert_eq!(host.frames_requested, 1);
        host.take_frames();
        o.frame(&mut host, 0.016).unwrap();
        o.on_scroll(&mut host, 1400.0);
        assert_eq!(host.frames_requested, 2);
    }

    #[test]
    fn pending_attach_completes_on_mount() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section()).unwrap();
        assert_eq!(o.attach(&mut host, None).unwrap(), AttachState::Pending);
        assert_eq!(host.live_listeners(), 0);
        assert!(!o.on_scroll(&mut host, 1500.0));
        assert_eq!(o.mounted(&mut host, layout()).unwrap(), AttachState::Attached);
        assert_eq!(host.live_listeners(), 2);
    }

    #[test]
    fn zero_duration_surfaces_at_attach() {
        let config = SectionConfig::scroll(
            "flat",
            TriggerPoint::TOP_TOP,
            EndSpec::After(Distance::Px(0.0)),
        );
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(config).unwrap();
        let err = o.attach(&mut host, Some(layout())).unwrap_err();
        assert!(matches!(err, ChoreoError::ZeroDuration { .. }));
        assert_eq!(o.state(), AttachState::Detached);
        assert_eq!(host.live_listeners(), 0);
    }

    #[test]
    fn failed_resize_keeps_previous_binding() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section()).unwrap();
        o.attach(&mut host, Some(layout())).unwrap();
        let collapsed = Layout::new(1000.0, 900.0, 1440.0, 0.0);
        assert!(o.resize(&mut host, collapsed).is_err());
        assert_eq!(host.live_listeners(), 2);
        assert_eq!(o.region().unwrap().end_offset(), 2800.0);
    }

    #[test]
    fn later_spec_takes_over_a_shared_property_once_reached() {
        let config = SectionConfig::scroll(
            "stack",
            TriggerPoint::TOP_TOP,
            EndSpec::After(Distance::Px(1000.0)),
        )
        .child(
            ChildSpec::new(0, ChildWindow::new(0.0, 0.6).unwrap())
                .track(Track::number(Property::Scale, 0.9, 1.0, Ease::Linear)),
        )
        .child(
            ChildSpec::new(0, ChildWindow::new(0.5, 1.0).unwrap())
                .track(Track::number(Property::Scale, 1.0, 0.8, Ease::Linear)),
        );
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(config).unwrap();
        o.attach(&mut host, Some(Layout::new(0.0, 500.0, 800.0, 600.0))).unwrap();

        o.on_scroll(&mut host, 300.0);
        let f = o.frame(&mut host, 0.016).unwrap();
        assert_eq!(f.targets.len(), 1);
        assert_eq!(f.targets[0].values.len(), 1);
        assert!((scale_of(&f) - 0.95).abs() < 1e-9);

        o.on_scroll(&mut host, 750.0);
        let f = o.frame(&mut host, 0.016).unwrap();
        assert!((scale_of(&f) - 0.9).abs() < 1e-9);
    }

    fn scale_of(f: &Frame) -> f64 {
        match f.targets[0].values[0] {
            (Property::Scale, Value::Number(n)) => n,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn smoothed_scrub_converges_without_overshoot() {
        let mut host = RecordingHost::new();
        let mut o = Orchestrator::new(section().scrub(Scrub::Smoothed { lag_sec: 0.5 })).unwrap();
        o.attach(&mut host, Some(layout())).unwrap();
        o.on_scroll(&mut host, 2800.0);
        let mut last = 0.0;
        for _ in 0..600 {
            host.take_frames();
            let f = o.frame(&mut host, 1.0 / 60.0).unwrap();
            assert!(f.progress >= last && f.progress <= 1.0);
            assert_eq!(f.raw_progress, 1.0);
            last = f.progress;
        }
        assert_eq!(last, 1.0);
        // Settled: no further frames requested.
        assert_eq!(host.pending_frames(), 0);
    }
}
