use chrono::{DateTime, Utc};
use fnv::FnvHashMap;
use site_fx_core::{NodeId, Rect, Surface, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Marks an element with its index in the node registry.
const NODE_ID_ATTR: &str = "data-fx-id";

/// [`Surface`] over the live document.
///
/// Elements are registered on first sight and tagged with `data-fx-id`, so a
/// later query returning the same element yields the same [`NodeId`].
/// [`Surface::remove`] drops the element and its registered descendants from
/// the registry; ids are never reused, so a stale [`NodeId`] stays inert.
pub struct WebSurface {
    window: web::Window,
    document: web::Document,
    nodes: FnvHashMap<u32, web::Element>,
    next_id: u32,
    /// Detached stand-in handed out when `createElement` fails.
    scratch: web::Element,
}

impl WebSurface {
    pub fn new(window: web::Window, document: web::Document) -> anyhow::Result<Self> {
        let scratch = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("createElement failed: {:?}", e))?;
        Ok(Self {
            window,
            document,
            nodes: FnvHashMap::default(),
            next_id: 0,
            scratch,
        })
    }

    pub fn element(&self, node: NodeId) -> Option<&web::Element> {
        self.nodes.get(&node.0)
    }

    /// Elements currently held by the registry.
    pub fn registered(&self) -> usize {
        self.nodes.len()
    }

    fn html(&self, node: NodeId) -> Option<&web::HtmlElement> {
        self.element(node).and_then(|el| el.dyn_ref::<web::HtmlElement>())
    }

    fn tagged_id(&self, el: &web::Element) -> Option<u32> {
        let id = el.get_attribute(NODE_ID_ATTR)?.parse::<u32>().ok()?;
        // cloneNode copies the attribute, so check it is really ours
        (self.nodes.get(&id) == Some(el)).then_some(id)
    }

    fn intern(&mut self, el: web::Element) -> NodeId {
        if let Some(id) = self.tagged_id(&el) {
            return NodeId(id);
        }
        let id = self.next_id;
        self.next_id += 1;
        _ = el.set_attribute(NODE_ID_ATTR, &id.to_string());
        self.nodes.insert(id, el);
        NodeId(id)
    }

    /// Forget `el` and every registered element below it.
    fn release(&mut self, el: &web::Element) {
        if let Ok(list) = el.query_selector_all(&format!("[{NODE_ID_ATTR}]")) {
            for i in 0..list.length() {
                let Some(child) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok())
                else {
                    continue;
                };
                if let Some(id) = self.tagged_id(&child) {
                    self.nodes.remove(&id);
                    _ = child.remove_attribute(NODE_ID_ATTR);
                }
            }
        }
        if let Some(id) = self.tagged_id(el) {
            self.nodes.remove(&id);
        }
        _ = el.remove_attribute(NODE_ID_ATTR);
    }

    fn collect(&mut self, list: Option<web::NodeList>) -> Vec<NodeId> {
        let Some(list) = list else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                out.push(self.intern(el));
            }
        }
        out
    }
}

impl Surface for WebSurface {
    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        let list = self.document.query_selector_all(selector).ok();
        if list.is_none() {
            log::debug!("bad selector {selector:?}");
        }
        self.collect(list)
    }

    fn query_within(&mut self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let list = self
            .element(root)
            .and_then(|el| el.query_selector_all(selector).ok());
        self.collect(list)
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.matches(selector).unwrap_or(false))
    }

    fn body(&mut self) -> Option<NodeId> {
        let body: web::Element = self.document.body()?.into();
        Some(self.intern(body))
    }

    fn parent(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.intern(parent))
    }

    fn create(&mut self, tag: &str) -> NodeId {
        match self.document.create_element(tag) {
            Ok(el) => self.intern(el),
            Err(e) => {
                log::warn!("createElement({tag}) failed: {e:?}");
                let scratch = self.scratch.clone();
                self.intern(scratch)
            }
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(p), Some(c)) = (self.element(parent), self.element(child)) {
            _ = p.append_child(c);
        }
    }

    fn remove(&mut self, node: NodeId) -> bool {
        let Some(el) = self.element(node).cloned() else {
            return false;
        };
        let attached = el.is_connected();
        if attached {
            el.remove();
        }
        self.release(&el);
        attached
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.is_connected())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(el) = self.html(node) else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            _ = style.remove_property(property);
        } else {
            _ = style.set_property(property, value);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let value = self.html(node)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            _ = el.class_list().remove_1(class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(el) = self.element(node) {
            el.set_class_name(class_name);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn set_html(&mut self, node: NodeId, html: &str) {
        if let Some(el) = self.element(node) {
            el.set_inner_html(html);
        }
    }

    fn value(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
            input.value()
        } else if let Some(select) = el.dyn_ref::<web::HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        let Some(el) = self.element(node) else {
            return;
        };
        if let Some(button) = el.dyn_ref::<web::HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            _ = el.set_attribute("disabled", "");
        } else {
            _ = el.remove_attribute("disabled");
        }
    }

    fn reset_form(&mut self, form: NodeId) {
        if let Some(form) = self
            .element(form)
            .and_then(|el| el.dyn_ref::<web::HtmlFormElement>())
        {
            form.reset();
        }
    }

    fn rect(&self, node: NodeId) -> Rect {
        let Some(el) = self.element(node) else {
            return Rect::default();
        };
        let r = el.get_bounding_client_rect();
        Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
    }

    fn offset_top(&self, node: NodeId) -> f32 {
        self.html(node).map_or(0.0, |el| el.offset_top() as f32)
    }

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        Viewport {
            width: dim(self.window.inner_width()),
            height: dim(self.window.inner_height()),
        }
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn scroll_to(&mut self, y: f32) {
        self.window.scroll_to_with_x_and_y(0.0, y as f64);
    }

    fn navigate(&mut self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            log::warn!("navigation failed: {e:?}");
        }
    }

    fn inject_stylesheet(&mut self, css: &str) {
        let Some(head) = self.document.head() else {
            log::debug!("no <head>, stylesheet skipped");
            return;
        };
        if let Ok(style) = self.document.create_element("style") {
            style.set_text_content(Some(css));
            _ = head.append_child(&style);
        }
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}
