use crate::events::SharedPage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Backstop period for timers while requestAnimationFrame is paused.
const BACKSTOP_MS: i32 = 250;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Drive `Controller::frame` from requestAnimationFrame for the page lifetime,
/// with an interval that keeps due timers firing in background tabs.
pub fn start_loop(page: SharedPage) {
    start_backstop(&page);

    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_next = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        step(&page, false);
        request(&tick_next);
    }) as Box<dyn FnMut()>));
    request(&tick);
}

/// One controller step. With `only_if_due`, nothing runs unless a timer is due.
fn step(page: &SharedPage, only_if_due: bool) {
    let now = instant::now();
    {
        let Ok(mut c) = page.ctl.try_borrow_mut() else {
            return;
        };
        if only_if_due && !c.next_due_ms().is_some_and(|due| due <= now) {
            return;
        }
        c.frame(now);
    }
    page.sync();
    page.sweep();
}

fn start_backstop(page: &SharedPage) {
    let Some(window) = web::window() else {
        return;
    };
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move || step(&page, true)) as Box<dyn FnMut()>);
    if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        BACKSTOP_MS,
    ) {
        log::warn!("timer backstop unavailable: {e:?}");
    }
    closure.forget();
}

fn request(tick: &Tick) {
    let Some(window) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
