use site_fx_core::EventInfo;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer position and whether the target sits inside a link.
pub fn event_info(ev: &web::Event) -> EventInfo {
    let (client_x, client_y) = ev
        .dyn_ref::<web::MouseEvent>()
        .map_or((0.0, 0.0), |m| (m.client_x() as f32, m.client_y() as f32));
    let inside_link = ev
        .target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
        .is_some();
    EventInfo {
        client_x,
        client_y,
        inside_link,
    }
}
