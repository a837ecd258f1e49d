#![cfg(target_arch = "wasm32")]
//! Browser entry point: builds the controller over the live document and
//! wires listeners and the animation loop.

use site_fx_core::Controller;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;

/// `<body>` attribute naming the site variant.
const VARIANT_ATTR: &str = "data-fx-variant";
/// Inline `application/json` script holding config overrides.
const CONFIG_SCRIPT_ID: &str = "site-fx-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("site-fx-web starting");

    let document = web::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() == "loading" {
        let closure = Closure::wrap(Box::new(launch) as Box<dyn FnMut()>);
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
    } else {
        launch();
    }
    Ok(())
}

fn launch() {
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let variant = document.body().and_then(|b| b.get_attribute(VARIANT_ATTR));
    let overrides = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content());

    let surface = dom::WebSurface::new(window, document)?;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let controller =
        Controller::from_page(surface, variant.as_deref(), overrides.as_deref(), seed)?;
    let page = events::Page::new(controller);

    let initial = page.ctl.borrow_mut().start(instant::now());
    page.attach_all(initial);
    log::debug!("{} listeners attached", page.listener_count());
    events::wire_page(&page);
    frame::start_loop(page);
    Ok(())
}
