#![cfg(target_arch = "wasm32")]
use crate::constants::{
    CHILD_SELECTOR, ITEM_SELECTOR, REVEAL_SELECTOR, SECTION_ATTR, SECTION_SELECTOR,
};
use crate::markup::SectionMarkup;
use crate::render::SectionElements;
use crate::section::{Section, SectionRef};
use anyhow::Context;
use choreo_core::presets;
use choreo_core::runtime::{self, Defaults};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod markup;
mod registry;
mod render;
mod section;

thread_local! {
    static SECTIONS: RefCell<Vec<SectionRef>> = RefCell::new(Vec::new());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("choreo-web starting");

    if let Err(e) = runtime::init(Defaults::default()) {
        log::warn!("[runtime] {}", e);
    }

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Detach every section and release every listener, including the nav and
/// reveal ones. For hosts that swap page content without a reload.
#[wasm_bindgen]
pub fn teardown() {
    SECTIONS.with(|all| {
        for section in all.borrow_mut().drain(..) {
            section.borrow_mut().detach();
        }
    });
    let removed = events::page::unwire_all();
    log::info!("[teardown] {} page listeners removed", removed);
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    events::page::wire_nav_hide(&document);
    for container in dom::query_document(&document, REVEAL_SELECTOR) {
        if let Err(e) = events::page::wire_reveal(container) {
            log::warn!("[reveal] skipped: {:#}", e);
        }
    }

    let mut mounted = 0;
    for root in dom::query_document(&document, SECTION_SELECTOR) {
        match mount_section(root) {
            Ok(section) => {
                SECTIONS.with(|all| all.borrow_mut().push(section));
                mounted += 1;
            }
            Err(e) => log::error!("[section] {:#}", e),
        }
    }
    log::info!("[init] {} sections mounted", mounted);
    Ok(())
}

fn mount_section(root: web::HtmlElement) -> anyhow::Result<SectionRef> {
    let attr = root.get_attribute(SECTION_ATTR).unwrap_or_default();
    let markup = SectionMarkup::parse(&attr)
        .ok_or_else(|| anyhow::anyhow!("bad {} value `{}`", SECTION_ATTR, attr))?;
    let children = dom::query_all(&root, CHILD_SELECTOR);
    let items = dom::query_all(&root, ITEM_SELECTOR);
    let count = markup.item_count(items.len(), children.len());

    let config = presets::by_name(&markup.preset, count)
        .with_context(|| format!("preset `{}`", markup.preset))?;
    config
        .check_targets(children.len())
        .with_context(|| format!("preset `{}` markup", markup.preset))?;

    Section::mount(
        config,
        SectionElements {
            root,
            children,
            items,
        },
    )
}
