//! Rendering-surface abstraction.
//!
//! Everything the controller does to the page goes through [`Surface`]. The
//! browser front end implements it over `web-sys`; tests use
//! [`crate::fake::FakeSurface`].

use chrono::{DateTime, Utc};
use glam::Vec2;

/// Ordered `(property, value)` pairs applied as inline styles.
pub type Styles = Vec<(String, String)>;

/// Build a [`Styles`] list from string literals.
pub fn styles(pairs: &[(&str, &str)]) -> Styles {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Opaque handle to an element owned by a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Box in viewport coordinates (CSS pixels), as returned by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Minimal DOM surface used by the controller.
///
/// Setting a style property to the empty string removes it, as assigning `''`
/// to `element.style.x` does in the browser.
///
/// [`Surface::remove`] must be idempotent: removing a node that is already
/// detached is a no-op that returns `false`. Pending dismissal timers rely on it.
pub trait Surface {
    fn query_all(&mut self, selector: &str) -> Vec<NodeId>;

    fn query(&mut self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_within(&mut self, root: NodeId, selector: &str) -> Vec<NodeId>;

    fn matches(&self, node: NodeId, selector: &str) -> bool;

    fn body(&mut self) -> Option<NodeId>;

    fn parent(&mut self, node: NodeId) -> Option<NodeId>;

    fn create(&mut self, tag: &str) -> NodeId;

    fn append(&mut self, parent: NodeId, child: NodeId);

    /// Detach `node`. Returns `false` when it was not attached.
    fn remove(&mut self, node: NodeId) -> bool;

    fn is_attached(&self, node: NodeId) -> bool;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_styles(&mut self, node: NodeId, styles: &[(String, String)]) {
        for (property, value) in styles {
            self.set_style(node, property, value);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn set_class_name(&mut self, node: NodeId, class_name: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn text(&self, node: NodeId) -> String;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn set_html(&mut self, node: NodeId, html: &str);

    /// Current value of a form control; empty for other elements.
    fn value(&self, node: NodeId) -> String;

    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    fn reset_form(&mut self, form: NodeId);

    fn rect(&self, node: NodeId) -> Rect;

    fn offset_top(&self, node: NodeId) -> f32;

    fn viewport(&self) -> Viewport;

    fn scroll_y(&self) -> f32;

    fn scroll_to(&mut self, y: f32);

    fn navigate(&mut self, url: &str);

    fn inject_stylesheet(&mut self, css: &str);

    fn wall_clock(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center(), Vec2::new(60.0, 45.0));
        assert_eq!(r.area(), 5000.0);
    }

    #[test]
    fn negative_size_has_no_area() {
        assert_eq!(Rect::new(0.0, 0.0, -4.0, 10.0).area(), 0.0);
    }
}
