use crate::constants::MAX_FRAME_DT_SEC;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Something advanced once per animation frame until it reports it is done.
pub trait FrameDriven {
    /// Returns whether another frame is wanted.
    fn frame(&mut self, dt_sec: f64) -> bool;
}

/// Drive `ctx` from requestAnimationFrame until `frame` returns false.
pub fn start_loop<T: FrameDriven + 'static>(ctx: Rc<RefCell<T>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let mut last = Instant::now();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = Instant::now();
        let dt = (now - last).as_secs_f64().min(MAX_FRAME_DT_SEC);
        last = now;
        if !ctx.borrow_mut().frame(dt) {
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
