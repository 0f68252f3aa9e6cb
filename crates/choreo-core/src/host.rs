//! The seam between a section and the platform that delivers its events.

use fnv::FnvHashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Wheel,
    TouchStart,
    TouchMove,
    Resize,
}

impl EventKind {
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Wheel => "wheel",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::Resize => "resize",
        }
    }

    /// Listeners that may call `preventDefault` must be registered non-passive.
    pub fn passive(self) -> bool {
        !matches!(self, Self::Wheel | Self::TouchMove)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

/// Registers global listeners and animation-frame callbacks for a section.
pub trait EventHost {
    fn listen(&mut self, kind: EventKind) -> ListenerId;
    fn unlisten(&mut self, id: ListenerId);
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// In-memory host that records every registration. Used by tests and the
/// native front-end, where there is no DOM to attach to.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next: u32,
    live: FnvHashSet<ListenerId>,
    kinds: Vec<(ListenerId, EventKind)>,
    frames: FnvHashSet<FrameId>,
    pub added: usize,
    pub removed: usize,
    pub frames_requested: usize,
    pub frames_cancelled: usize,
    /// `unlisten`/`cancel_frame` calls for ids that were not live.
    pub stale_removals: usize,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_listeners(&self) -> usize {
        self.live.len()
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.kinds
            .iter()
            .any(|(id, k)| *k == kind && self.live.contains(id))
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Mark every pending frame as delivered, as the browser would before
    /// invoking the callbacks.
    pub fn take_frames(&mut self) -> usize {
        let n = self.frames.len();
        self.frames.clear();
        n
    }

    fn next_id(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

impl EventHost for RecordingHost {
    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.live.insert(id);
        self.kinds.push((id, kind));
        self.added += 1;
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        if self.live.remove(&id) {
            self.removed += 1;
        } else {
            self.stale_removals += 1;
        }
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id());
        self.frames.insert(id);
        self.frames_requested += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.frames.remove(&id) {
            self.frames_cancelled += 1;
        } else {
            self.stale_removals += 1;
        }
    }
}
