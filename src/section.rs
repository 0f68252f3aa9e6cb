//! One mounted `[data-choreo]` section: orchestrator, DOM host and elements
//! behind a single `Rc<RefCell<_>>` shared with its callbacks.

use crate::constants::{MAX_FRAME_DT_SEC, MOUNT_RETRY_FRAMES};
use crate::dom;
use crate::events::host::Callback;
use crate::events::DomHost;
use crate::render::SectionElements;
use anyhow::Context;
use choreo_core::{AttachState, EventHost, EventKind, FrameId, Orchestrator, SectionConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SectionRef = Rc<RefCell<Section>>;

pub struct Section {
    orchestrator: Orchestrator,
    host: DomHost,
    elements: SectionElements,
    last_tick: Instant,
    mount_retries: u32,
    poll_frame: Option<FrameId>,
}

impl Section {
    pub fn mount(config: SectionConfig, elements: SectionElements) -> anyhow::Result<SectionRef> {
        let id = config.id.clone();
        let orchestrator =
            Orchestrator::new(config).with_context(|| format!("section `{}`", id))?;
        let section = Rc::new_cyclic(|weak: &Weak<RefCell<Section>>| {
            let for_listeners = weak.clone();
            let make = Box::new(move |kind| listener(for_listeners.clone(), kind));
            RefCell::new(Section {
                orchestrator,
                host: DomHost::new(make),
                elements,
                last_tick: Instant::now(),
                mount_retries: 0,
                poll_frame: None,
            })
        });
        let for_tick = Rc::downgrade(&section);
        section
            .borrow_mut()
            .host
            .set_tick(Closure::wrap(Box::new(move || tick(&for_tick)) as Box<dyn FnMut()>));
        section
            .borrow_mut()
            .attach()
            .with_context(|| format!("attach `{}`", id))?;
        Ok(section)
    }

    fn attach(&mut self) -> anyhow::Result<()> {
        self.orchestrator.on_scroll(&mut self.host, dom::scroll_y());
        let layout = dom::measure(&self.elements.root, &self.elements.items);
        match self.orchestrator.attach(&mut self.host, layout)? {
            AttachState::Attached => self.after_layout(),
            AttachState::Pending => self.poll_frame = Some(self.host.request_frame()),
            AttachState::Detached => {}
        }
        Ok(())
    }

    pub fn detach(&mut self) {
        if let Some(frame) = self.poll_frame.take() {
            self.host.cancel_frame(frame);
        }
        if self.orchestrator.detach(&mut self.host) {
            self.elements.clear();
            log::info!(
                "[section {}] detached, {} listeners left",
                self.orchestrator.id(),
                self.host.live_listeners()
            );
        }
    }

    fn after_layout(&mut self) {
        if let Some(region) = self.orchestrator.region().filter(|r| r.pinned()) {
            self.elements.set_spacer(region.duration());
        }
        if let Some(active) = self.orchestrator.active_index() {
            self.elements.show_active(active);
        }
    }

    fn poll_mount(&mut self) {
        self.poll_frame = None;
        let id = self.orchestrator.id().clone();
        self.orchestrator.on_scroll(&mut self.host, dom::scroll_y());
        match dom::measure(&self.elements.root, &self.elements.items) {
            Some(layout) => match self.orchestrator.mounted(&mut self.host, layout) {
                Ok(AttachState::Attached) => {
                    log::info!("[section {}] mounted after {} frames", id, self.mount_retries);
                    self.after_layout();
                }
                Ok(_) => {}
                Err(e) => log::error!("[section {}] {}", id, e),
            },
            None if self.mount_retries < MOUNT_RETRY_FRAMES => {
                self.mount_retries += 1;
                self.poll_frame = Some(self.host.request_frame());
            }
            None => {
                log::warn!("[section {}] never laid out; giving up", id);
                self.detach();
            }
        }
    }

    fn relayout(&mut self) {
        let Some(layout) = dom::measure(&self.elements.root, &self.elements.items) else {
            log::warn!(
                "[section {}] resized while hidden; keeping previous layout",
                self.orchestrator.id()
            );
            return;
        };
        self.orchestrator.on_scroll(&mut self.host, dom::scroll_y());
        match self.orchestrator.resize(&mut self.host, layout) {
            Ok(()) => self.after_layout(),
            Err(e) => log::error!("[section {}] resize rejected: {}", self.orchestrator.id(), e),
        }
    }

    fn on_frame(&mut self) {
        self.host.collect();
        let now = Instant::now();
        let dt = (now - self.last_tick).as_secs_f64().min(MAX_FRAME_DT_SEC);
        self.last_tick = now;
        if self.orchestrator.state() == AttachState::Pending {
            self.poll_mount();
            return;
        }
        if let Some(frame) = self.orchestrator.frame(&mut self.host, dt) {
            self.elements.apply(&frame);
        }
    }

    fn on_event(&mut self, kind: EventKind, ev: &web::Event) {
        self.host.collect();
        let host = &mut self.host;
        match kind {
            EventKind::Scroll => {
                self.orchestrator.on_scroll(host, dom::scroll_y());
            }
            EventKind::Resize => self.relayout(),
            EventKind::Wheel => {
                if let Some(wheel) = ev.dyn_ref::<web::WheelEvent>() {
                    let intercept = self.orchestrator.on_wheel(
                        host,
                        wheel.delta_y(),
                        dom::scroll_y(),
                        js_sys::Date::now(),
                    );
                    if intercept.prevents_default() {
                        ev.prevent_default();
                    }
                }
            }
            EventKind::TouchStart => {
                if let Some(y) = first_touch_y(ev) {
                    self.orchestrator.on_touch_start(y);
                }
            }
            EventKind::TouchMove => {
                if let Some(y) = first_touch_y(ev) {
                    let intercept = self.orchestrator.on_touch_move(
                        host,
                        y,
                        dom::scroll_y(),
                        js_sys::Date::now(),
                    );
                    if intercept.prevents_default() {
                        ev.prevent_default();
                    }
                }
            }
        }
    }
}

fn first_touch_y(ev: &web::Event) -> Option<f64> {
    let touch = ev.dyn_ref::<web::TouchEvent>()?.touches().get(0)?;
    Some(touch.client_y() as f64)
}

fn listener(section: Weak<RefCell<Section>>, kind: EventKind) -> Callback {
    Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(section) = section.upgrade() else {
            return;
        };
        // Busy means we were re-entered from inside a handler; drop the event.
        let Ok(mut s) = section.try_borrow_mut() else {
            log::warn!("[section] {} event dropped while busy", kind.dom_name());
            return;
        };
        s.on_event(kind, &ev);
    }) as Box<dyn FnMut(_)>)
}

fn tick(section: &Weak<RefCell<Section>>) {
    let Some(section) = section.upgrade() else {
        return;
    };
    let Ok(mut s) = section.try_borrow_mut() else {
        return;
    };
    s.on_frame();
}
