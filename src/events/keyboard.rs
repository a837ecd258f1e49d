use super::SharedPage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_keydown(window: &web::Window, page: &SharedPage) {
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let completed = {
            let Ok(mut c) = page.ctl.try_borrow_mut() else {
                return;
            };
            c.on_key_down(ev.key_code(), instant::now())
        };
        if completed {
            log::debug!("key sequence completed");
            // the toast brings a close button to listen on
            page.sync();
        }
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
