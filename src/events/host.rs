//! `EventHost` backed by real window listeners and animation frames.

use choreo_core::{EventHost, EventKind, FrameId, ListenerId};
use fnv::FnvHashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Callback = Closure<dyn FnMut(web::Event)>;
pub type MakeCallback = Box<dyn Fn(EventKind) -> Callback>;

struct Listener {
    kind: EventKind,
    closure: Callback,
}

pub struct DomHost {
    next: u32,
    make: MakeCallback,
    listeners: FnvHashMap<ListenerId, Listener>,
    // Removed listeners are kept until the next dispatch: a handler may
    // unregister itself (resize swaps the whole set) and must not be freed
    // while it is still on the stack.
    retired: Vec<Callback>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl DomHost {
    pub fn new(make: MakeCallback) -> Self {
        Self {
            next: 0,
            make,
            listeners: FnvHashMap::default(),
            retired: Vec::new(),
            tick: None,
        }
    }

    /// Callback run for every animation frame this host requests.
    pub fn set_tick(&mut self, tick: Closure<dyn FnMut()>) {
        self.tick = Some(tick);
    }

    /// Free retired listeners. Call only from a callback that cannot be one
    /// of them.
    pub fn collect(&mut self) {
        self.retired.clear();
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }
}

impl EventHost for DomHost {
    fn listen(&mut self, kind: EventKind) -> ListenerId {
        let closure = (self.make)(kind);
        if let Some(w) = web::window() {
            let opts = web::AddEventListenerOptions::new();
            opts.set_passive(kind.passive());
            if let Err(e) = w.add_event_listener_with_callback_and_add_event_listener_options(
                kind.dom_name(),
                closure.as_ref().unchecked_ref(),
                &opts,
            ) {
                log::warn!("[host] add {} listener failed: {:?}", kind.dom_name(), e);
            }
        }
        self.next += 1;
        let id = ListenerId(self.next);
        self.listeners.insert(id, Listener { kind, closure });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        let Some(listener) = self.listeners.remove(&id) else {
            log::warn!("[host] unlisten of unknown {:?}", id);
            return;
        };
        if let Some(w) = web::window() {
            _ = w.remove_event_listener_with_callback(
                listener.kind.dom_name(),
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        self.retired.push(listener.closure);
    }

    fn request_frame(&mut self) -> FrameId {
        let requested = match (web::window(), self.tick.as_ref()) {
            (Some(w), Some(tick)) => w.request_animation_frame(tick.as_ref().unchecked_ref()).ok(),
            _ => None,
        };
        match requested {
            Some(handle) => FrameId(handle as u32),
            None => {
                log::warn!("[host] requestAnimationFrame unavailable");
                FrameId(0)
            }
        }
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(id.0 as i32);
        }
    }
}
