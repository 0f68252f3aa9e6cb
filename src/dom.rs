use choreo_core::Layout;
use smallvec::SmallVec;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Elements = SmallVec<[web::HtmlElement; 8]>;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn scroll_y() -> f64 {
    web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// Inner viewport size in CSS pixels.
pub fn viewport() -> Option<(f64, f64)> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

pub fn query_all(root: &web::Element, selector: &str) -> Elements {
    let mut out = Elements::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

pub fn query_document(document: &web::Document, selector: &str) -> Elements {
    match document.document_element() {
        Some(root) => query_all(&root, selector),
        None => Elements::new(),
    }
}

/// Document offset of an element's layout box. Uses the offset chain, which
/// ignores transforms, so a pinned section measures the same before and
/// after it is translated.
pub fn document_top(el: &web::HtmlElement) -> f64 {
    let mut top = 0.0;
    let mut cur = Some(el.clone());
    while let Some(e) = cur {
        top += e.offset_top() as f64;
        cur = e
            .offset_parent()
            .and_then(|p| p.dyn_into::<web::HtmlElement>().ok());
    }
    top
}

/// Geometry for a section, or `None` while the element has no layout box
/// (detached from the document or `display: none`).
pub fn measure(section: &web::HtmlElement, items: &[web::HtmlElement]) -> Option<Layout> {
    if !section.is_connected() || section.offset_parent().is_none() {
        return None;
    }
    let (vw, vh) = viewport()?;
    let layout = Layout::new(
        document_top(section),
        section.offset_height() as f64,
        vw,
        vh,
    );
    Some(layout.with_items(items.iter().map(document_top).collect()))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, name: &str, value: &str) {
    if let Err(e) = el.style().set_property(name, value) {
        log::warn!("[dom] set {} failed: {:?}", name, e);
    }
}

#[inline]
pub fn set_class(el: &web::Element, class: &str, on: bool) {
    let cl = el.class_list();
    _ = if on { cl.add_1(class) } else { cl.remove_1(class) };
}
