//! Behaviours that are not scrubbed sections: the hiding navigation bar and
//! one-shot reveals. Their scroll listeners are kept in a registry so
//! [`unwire_all`] can release them; a reveal drops its own once it fires.

use crate::constants::{CHILD_SELECTOR, NAV_HIDDEN_CLASS, NAV_SELECTOR};
use crate::dom;
use crate::frame::{self, FrameDriven};
use crate::registry::Registry;
use choreo_core::constants::NAV_HIDE_THRESHOLD;
use choreo_core::{compose, Reveal, RevealConfig, ScrollHide};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type ScrollCallback = Closure<dyn FnMut()>;

thread_local! {
    static SCROLL_LISTENERS: RefCell<Registry<ScrollCallback>> =
        RefCell::new(Registry::default());
}

fn add_passive_scroll(closure: &ScrollCallback) {
    if let Some(w) = web::window() {
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        _ = w.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &opts,
        );
    }
}

fn remove_scroll(closure: &ScrollCallback) {
    if let Some(w) = web::window() {
        _ = w.remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    }
}

/// Register a passive scroll handler. It receives its own id so it can
/// unregister itself.
fn listen_scroll(mut handler: impl FnMut(u32) + 'static) -> u32 {
    let id = SCROLL_LISTENERS.with(|r| r.borrow_mut().next_id());
    let closure = Closure::wrap(Box::new(move || {
        // Nothing retired is running now; free it.
        SCROLL_LISTENERS.with(|r| {
            if let Ok(mut r) = r.try_borrow_mut() {
                r.collect();
            }
        });
        handler(id);
    }) as Box<dyn FnMut()>);
    add_passive_scroll(&closure);
    SCROLL_LISTENERS.with(|r| r.borrow_mut().insert(id, closure));
    id
}

fn unlisten_scroll(id: u32) {
    SCROLL_LISTENERS.with(|r| {
        let mut reg = r.borrow_mut();
        if let Some(closure) = reg.retire(id) {
            remove_scroll(closure);
        }
    });
}

/// Remove every nav and reveal scroll listener. Returns how many were live.
pub fn unwire_all() -> usize {
    SCROLL_LISTENERS.with(|r| {
        let mut reg = r.borrow_mut();
        let removed = {
            let removed = reg.retire_all();
            for closure in removed {
                remove_scroll(closure);
            }
            removed.len()
        };
        reg.collect();
        removed
    })
}

pub fn wire_nav_hide(document: &web::Document) {
    let Some(nav) = dom::query_document(document, NAV_SELECTOR).into_iter().next() else {
        return;
    };
    let mut hide = ScrollHide::new(NAV_HIDE_THRESHOLD);
    listen_scroll(move |_| {
        if let Some(hidden) = hide.update(dom::scroll_y()) {
            dom::set_class(&nav, NAV_HIDDEN_CLASS, hidden);
        }
    });
    log::info!("[nav] hide-on-scroll wired");
}

struct RevealContext {
    reveal: Reveal,
    children: dom::Elements,
}

impl RevealContext {
    fn paint(&self) {
        for (el, values) in self.children.iter().zip(self.reveal.values()) {
            for decl in compose(&values) {
                dom::set_style(el, decl.name, &decl.value);
            }
        }
    }
}

impl FrameDriven for RevealContext {
    fn frame(&mut self, dt_sec: f64) -> bool {
        self.reveal.advance(dt_sec);
        self.paint();
        !self.reveal.finished()
    }
}

/// Staggered fade-up of a container's children, played once when the
/// container crosses its trigger line.
pub fn wire_reveal(container: web::HtmlElement) -> anyhow::Result<()> {
    let children = dom::query_all(&container, CHILD_SELECTOR);
    if children.is_empty() {
        return Ok(());
    }
    let layout = dom::measure(&container, &[])
        .ok_or_else(|| anyhow::anyhow!("reveal container has no layout"))?;
    let mut reveal = Reveal::new(RevealConfig::default(), children.len())?;
    reveal.resolve(&layout);

    let ctx = Rc::new(RefCell::new(RevealContext { reveal, children }));
    ctx.borrow().paint();

    let fire = {
        let ctx = ctx.clone();
        move || {
            let fired = ctx.borrow_mut().reveal.on_scroll(dom::scroll_y());
            if fired {
                frame::start_loop(ctx.clone());
            }
            fired
        }
    };
    // Already past the trigger line on load.
    if fire() {
        return Ok(());
    }
    listen_scroll(move |id| {
        if fire() {
            unlisten_scroll(id);
        }
    });
    Ok(())
}
