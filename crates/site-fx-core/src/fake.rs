//! In-memory [`Surface`] used by tests and host-side tooling.
//!
//! Supports the selector subset the site needs: type, `#id`, `.class`,
//! `[attr]`, `[attr="v"]`, `[attr^="v"]`, `[attr*="v"]`, descendant
//! combinators and comma-separated lists. Layout boxes are set by hand in
//! document coordinates; `rect` subtracts the current scroll offset.

use crate::surface::{NodeId, Rect, Surface, Viewport};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
struct FakeNode {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    html: Option<String>,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: Rect,
}

pub struct FakeSurface {
    nodes: Vec<FakeNode>,
    body: NodeId,
    viewport: Viewport,
    scroll_y: f32,
    scroll_history: Vec<f32>,
    navigations: Vec<String>,
    stylesheets: Vec<String>,
    clock: DateTime<Utc>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    pub fn new() -> Self {
        let body = FakeNode {
            tag: "body".to_string(),
            ..FakeNode::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            scroll_y: 0.0,
            scroll_history: Vec::new(),
            navigations: Vec::new(),
            stylesheets: Vec::new(),
            clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`. A `class` attribute is split into classes.
    pub fn add(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create(tag);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        self.append(parent, id);
        id
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            self.set_class_name(node, value);
            return;
        }
        if let Some(n) = self.node_mut(node) {
            n.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Layout box in document coordinates.
    pub fn set_layout(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.layout = rect;
        }
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.value = value.to_string();
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
    }

    /// Move the page as a user scroll would, without recording it as a programmatic scroll.
    pub fn user_scroll(&mut self, y: f32) {
        self.scroll_y = y;
    }

    pub fn set_clock(&mut self, clock: DateTime<Utc>) {
        self.clock = clock;
    }

    pub fn scroll_history(&self) -> &[f32] {
        &self.scroll_history
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.node(node).map(|n| n.tag.as_str()).unwrap_or("")
    }

    pub fn html(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.html.as_deref())
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).map(|n| n.disabled).unwrap_or(false)
    }

    /// Number of attached elements matching `selector`.
    pub fn count(&mut self, selector: &str) -> usize {
        self.query_all(selector).len()
    }

    fn node(&self, id: NodeId) -> Option<&FakeNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut FakeNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
        true
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(n) = self.node(root) {
            for child in &n.children {
                out.push(*child);
                self.descendants(*child, out);
            }
        }
    }

    fn matches_compound(&self, id: NodeId, step: &Compound) -> bool {
        let Some(n) = self.node(id) else {
            return false;
        };
        if let Some(tag) = &step.tag {
            if !n.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &step.id {
            if n.attrs.get("id") != Some(want) {
                return false;
            }
        }
        if !step.classes.iter().all(|c| n.classes.contains(c)) {
            return false;
        }
        step.attrs.iter().all(|test| test.check(&n.attrs))
    }

    fn matches_complex(&self, id: NodeId, steps: &[Compound]) -> bool {
        let Some((last, ancestors)) = steps.split_last() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }
        let mut cursor = self.node(id).and_then(|n| n.parent);
        for step in ancestors.iter().rev() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = self.node(candidate).and_then(|n| n.parent);
                if self.matches_compound(candidate, step) {
                    break;
                }
            }
        }
        true
    }

    fn filter_matching(&self, candidates: Vec<NodeId>, selector: &str) -> Vec<NodeId> {
        let list = parse_selector_list(selector);
        candidates
            .into_iter()
            .filter(|id| list.iter().any(|steps| self.matches_complex(*id, steps)))
            .collect()
    }

    fn matches_selector(&self, id: NodeId, selector: &str) -> bool {
        parse_selector_list(selector)
            .iter()
            .any(|steps| self.matches_complex(id, steps))
    }
}

impl Surface for FakeSurface {
    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        let mut all = vec![self.body];
        self.descendants(self.body, &mut all);
        self.filter_matching(all, selector)
    }

    fn query_within(&mut self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        self.filter_matching(all, selector)
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.matches_selector(node, selector)
    }

    fn body(&mut self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&mut self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn create(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FakeNode {
            tag: tag.to_ascii_lowercase(),
            ..FakeNode::default()
        });
        id
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove(&mut self, node: NodeId) -> bool {
        self.detach(node)
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == self.body {
                return true;
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).and_then(|n| n.styles.get(property).cloned())
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes = class_name.split_whitespace().map(str::to_string).collect();
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.node(node)?;
        if name == "class" {
            return Some(n.classes.join(" "));
        }
        n.attrs.get(name).cloned()
    }

    fn text(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.text.clone()).unwrap_or_default()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn set_html(&mut self, node: NodeId, html: &str) {
        for child in self.children(node) {
            self.detach(child);
        }
        if let Some(n) = self.node_mut(node) {
            n.html = Some(html.to_string());
        }
    }

    fn value(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(n) = self.node_mut(node) {
            n.disabled = disabled;
        }
    }

    fn reset_form(&mut self, form: NodeId) {
        for id in self.query_within(form, "input, select, textarea") {
            if let Some(n) = self.node_mut(id) {
                n.value.clear();
            }
        }
    }

    fn rect(&self, node: NodeId) -> Rect {
        let layout = self.node(node).map(|n| n.layout).unwrap_or_default();
        Rect {
            top: layout.top - self.scroll_y,
            ..layout
        }
    }

    fn offset_top(&self, node: NodeId) -> f32 {
        self.node(node).map(|n| n.layout.top).unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y;
        self.scroll_history.push(y);
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        self.clock
    }
}

// ---------------- Selector subset ----------------

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrTest {
    Exists(String),
    Equals(String, String),
    StartsWith(String, String),
    Contains(String, String),
}

impl AttrTest {
    fn check(&self, attrs: &BTreeMap<String, String>) -> bool {
        match self {
            AttrTest::Exists(k) => attrs.contains_key(k),
            AttrTest::Equals(k, v) => attrs.get(k) == Some(v),
            AttrTest::StartsWith(k, v) => attrs.get(k).is_some_and(|a| a.starts_with(v.as_str())),
            AttrTest::Contains(k, v) => attrs.get(k).is_some_and(|a| a.contains(v.as_str())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

/// Split `s` on `sep` outside of `[...]` and quotes.
fn split_top_level(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_sep(c) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_selector_list(selector: &str) -> Vec<Vec<Compound>> {
    split_top_level(selector, |c| c == ',')
        .into_iter()
        .map(|complex| {
            split_top_level(complex, |c| c.is_whitespace() || c == '>')
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(parse_compound)
                .collect::<Vec<_>>()
        })
        .filter(|steps| !steps.is_empty())
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(s: &str) -> Compound {
    let mut out = Compound::default();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0usize;
    let read_ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };
    while i < chars.len() {
        match chars[i] {
            '*' => i += 1,
            '#' => {
                i += 1;
                out.id = Some(read_ident(&mut i));
            }
            '.' => {
                i += 1;
                out.classes.push(read_ident(&mut i));
            }
            '[' => {
                let start = i + 1;
                let mut end = start;
                let mut quote: Option<char> = None;
                while end < chars.len() {
                    match (quote, chars[end]) {
                        (Some(q), c) if c == q => quote = None,
                        (None, '"' | '\'') => quote = Some(chars[end]),
                        (None, ']') => break,
                        _ => {}
                    }
                    end += 1;
                }
                let inner: String = chars[start..end.min(chars.len())].iter().collect();
                out.attrs.push(parse_attr(&inner));
                i = end + 1;
            }
            c if is_ident_char(c) => {
                out.tag = Some(read_ident(&mut i));
            }
            _ => i += 1,
        }
    }
    out
}

fn parse_attr(inner: &str) -> AttrTest {
    let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
    if let Some((k, v)) = inner.split_once("^=") {
        AttrTest::StartsWith(k.trim().to_string(), unquote(v))
    } else if let Some((k, v)) = inner.split_once("*=") {
        AttrTest::Contains(k.trim().to_string(), unquote(v))
    } else if let Some((k, v)) = inner.split_once('=') {
        AttrTest::Equals(k.trim().to_string(), unquote(v))
    } else {
        AttrTest::Exists(inner.trim().to_string())
    }
}
