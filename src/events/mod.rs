use crate::dom::WebSurface;
use fnv::FnvHashMap;
use site_fx_core::{Binding, Controller};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

mod keyboard;
mod pointer;

type Handler = Closure<dyn FnMut(web::Event)>;

struct Listener {
    target: web::Element,
    handler: Handler,
}

/// The controller plus the DOM listeners attached on its behalf.
pub struct Page {
    pub ctl: RefCell<Controller<WebSurface>>,
    listeners: RefCell<FnvHashMap<Binding, Listener>>,
    /// Detached handlers, dropped outside of any event dispatch.
    retired: RefCell<Vec<Handler>>,
}

pub type SharedPage = Rc<Page>;

impl Page {
    pub fn new(controller: Controller<WebSurface>) -> SharedPage {
        Rc::new(Self {
            ctl: RefCell::new(controller),
            listeners: RefCell::new(FnvHashMap::default()),
            retired: RefCell::new(Vec::new()),
        })
    }

    /// Attach listeners the controller added and detach the ones it released.
    /// Call after every controller entry point.
    pub fn sync(self: &Rc<Self>) {
        let (fresh, released) = {
            let Ok(mut c) = self.ctl.try_borrow_mut() else {
                return;
            };
            (c.take_bindings(), c.take_released())
        };
        for binding in released {
            self.detach(binding);
        }
        self.attach_all(fresh);
    }

    pub fn attach_all(self: &Rc<Self>, bindings: Vec<Binding>) {
        for binding in bindings {
            self.attach(binding);
        }
    }

    /// Drop handlers detached since the last call.
    pub fn sweep(&self) {
        if let Ok(mut retired) = self.retired.try_borrow_mut() {
            retired.clear();
        }
    }

    fn attach(self: &Rc<Self>, binding: Binding) {
        let target = match self.ctl.try_borrow() {
            Ok(c) => c.surface().element(binding.node).cloned(),
            Err(_) => None,
        };
        let Some(target) = target else {
            log::debug!("binding for unknown node {:?}", binding.node);
            return;
        };
        let page = self.clone();
        let handler = Closure::wrap(Box::new(move |ev: web::Event| {
            let info = pointer::event_info(&ev);
            let handled = {
                // a handler re-entered from inside another one is dropped
                let Ok(mut c) = page.ctl.try_borrow_mut() else {
                    return;
                };
                c.handle(binding, &info, instant::now())
            };
            if handled.prevent_default {
                ev.prevent_default();
            }
            page.sync();
        }) as Box<dyn FnMut(web::Event)>);
        _ = target
            .add_event_listener_with_callback(binding.event.name(), handler.as_ref().unchecked_ref());
        let Ok(mut listeners) = self.listeners.try_borrow_mut() else {
            return;
        };
        if let Some(old) = listeners.insert(binding, Listener { target, handler }) {
            self.retire(binding, old);
        }
    }

    fn detach(&self, binding: Binding) {
        let old = match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.remove(&binding),
            Err(_) => None,
        };
        if let Some(old) = old {
            self.retire(binding, old);
        }
    }

    // the handler may be the one currently running, so it is only dropped in `sweep`
    fn retire(&self, binding: Binding, old: Listener) {
        _ = old.target.remove_event_listener_with_callback(
            binding.event.name(),
            old.handler.as_ref().unchecked_ref(),
        );
        if let Ok(mut retired) = self.retired.try_borrow_mut() {
            retired.push(old.handler);
        }
    }

    /// Listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.try_borrow().map_or(0, |l| l.len())
    }
}

/// Window-level listeners: scroll and the secret key sequence.
pub fn wire_page(page: &SharedPage) {
    let Some(window) = web::window() else {
        return;
    };
    wire_scroll(&window, page);
    keyboard::wire_keydown(&window, page);
}

fn wire_scroll(window: &web::Window, page: &SharedPage) {
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Ok(mut c) = page.ctl.try_borrow_mut() {
            c.on_scroll();
        }
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}
