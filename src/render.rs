//! Writes orchestrator frames into the DOM.

use crate::constants::{ACTIVE_ATTR, ACTIVE_CLASS, PINNED_CLASS};
use crate::dom;
use crate::markup::pin_transform;
use choreo_core::{compose, Frame, TransitionStep};
use web_sys as web;

pub struct SectionElements {
    pub root: web::HtmlElement,
    pub children: dom::Elements,
    pub items: dom::Elements,
}

impl SectionElements {
    pub fn apply(&self, frame: &Frame) {
        for target in &frame.targets {
            let Some(el) = self.children.get(target.target) else {
                continue;
            };
            for decl in compose(&target.values) {
                dom::set_style(el, decl.name, &decl.value);
            }
        }

        if frame.pin.holds() || frame.pin_translate > 0.0 {
            dom::set_style(&self.root, "transform", &pin_transform(frame.pin_translate));
        }
        dom::set_class(&self.root, PINNED_CLASS, frame.pin.holds());

        if let Some(change) = frame.index_change {
            // Exit first so two items are never active at once.
            for step in change.steps() {
                match step {
                    TransitionStep::Exit(i) => self.toggle_item(i, false),
                    TransitionStep::Enter(i) => self.toggle_item(i, true),
                }
            }
            _ = self
                .root
                .set_attribute(ACTIVE_ATTR, &change.current.to_string());
        }
    }

    /// Mark the initial active item before the first change arrives.
    pub fn show_active(&self, index: usize) {
        for (i, item) in self.items.iter().enumerate() {
            dom::set_class(item, ACTIVE_CLASS, i == index);
        }
        _ = self.root.set_attribute(ACTIVE_ATTR, &index.to_string());
    }

    /// Reserve the pinned scroll distance below the section.
    pub fn set_spacer(&self, distance_px: f64) {
        dom::set_style(&self.root, "margin-bottom", &format!("{}px", distance_px.max(0.0)));
    }

    /// Undo everything `apply` wrote to the section root.
    pub fn clear(&self) {
        for name in ["transform", "margin-bottom"] {
            _ = self.root.style().remove_property(name);
        }
        dom::set_class(&self.root, PINNED_CLASS, false);
    }

    fn toggle_item(&self, i: usize, on: bool) {
        match self.items.get(i) {
            Some(item) => dom::set_class(item, ACTIVE_CLASS, on),
            None => log::warn!("[render] no item {} for active index", i),
        }
    }
}
