//! Viewport visibility tracking in the style of `IntersectionObserver`.
//!
//! Instead of browser callbacks, the controller polls observers once per frame
//! with fresh bounding boxes and receives the elements that just entered.

use crate::surface::{NodeId, Rect, Surface, Viewport};
use fnv::FnvHashSet;
use serde::Deserialize;

/// One side of a root margin. Percentages resolve against the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl Length {
    #[inline]
    fn resolve(self, extent: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(p) => extent * p / 100.0,
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersecting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct RootMargin {
    #[serde(default)]
    pub top: Length,
    #[serde(default)]
    pub right: Length,
    #[serde(default)]
    pub bottom: Length,
    #[serde(default)]
    pub left: Length,
}

impl RootMargin {
    pub const fn bottom_px(px: f32) -> Self {
        Self {
            top: Length::Px(0.0),
            right: Length::Px(0.0),
            bottom: Length::Px(px),
            left: Length::Px(0.0),
        }
    }

    fn root_box(&self, viewport: Viewport) -> Rect {
        let left = -self.left.resolve(viewport.width);
        let top = -self.top.resolve(viewport.height);
        let right = viewport.width + self.right.resolve(viewport.width);
        let bottom = viewport.height + self.bottom.resolve(viewport.height);
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Fraction of `target` inside the viewport adjusted by `margin`.
///
/// Zero-area targets count as fully visible when their origin lies inside.
pub fn intersection_ratio(target: Rect, viewport: Viewport, margin: &RootMargin) -> f32 {
    let root = margin.root_box(viewport);
    let area = target.area();
    if area <= 0.0 {
        let inside = target.left >= root.left
            && target.left <= root.right()
            && target.top >= root.top
            && target.top <= root.bottom();
        return if inside { 1.0 } else { 0.0 };
    }
    let w = (target.right().min(root.right()) - target.left.max(root.left)).max(0.0);
    let h = (target.bottom().min(root.bottom()) - target.top.max(root.top)).max(0.0);
    (w * h / area).clamp(0.0, 1.0)
}

/// Tracks which observed elements are inside the root box.
#[derive(Clone, Debug)]
pub struct VisibilityObserver {
    threshold: f32,
    margin: RootMargin,
    once: bool,
    watched: Vec<NodeId>,
    inside: FnvHashSet<NodeId>,
}

impl VisibilityObserver {
    /// `once` observers drop an element after it first enters.
    pub fn new(threshold: f32, margin: RootMargin, once: bool) -> Self {
        Self {
            threshold,
            margin,
            once,
            watched: Vec::new(),
            inside: FnvHashSet::default(),
        }
    }

    pub fn observe(&mut self, node: NodeId) {
        if !self.watched.contains(&node) {
            self.watched.push(node);
        }
    }

    pub fn unobserve(&mut self, node: NodeId) {
        self.watched.retain(|n| *n != node);
        self.inside.remove(&node);
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Elements that crossed into view since the previous poll, in observation order.
    pub fn poll<S: Surface + ?Sized>(&mut self, surface: &S) -> Vec<NodeId> {
        let viewport = surface.viewport();
        let mut entered = Vec::new();
        for node in &self.watched {
            let ratio = intersection_ratio(surface.rect(*node), viewport, &self.margin);
            let visible = ratio > 0.0 && ratio >= self.threshold;
            if visible {
                if self.inside.insert(*node) {
                    entered.push(*node);
                }
            } else {
                self.inside.remove(node);
            }
        }
        if self.once {
            for node in &entered {
                self.unobserve(*node);
            }
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn full_partial_and_outside_ratios() {
        let m = RootMargin::default();
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 100.0, 100.0), VP, &m), 1.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 750.0, 100.0, 100.0), VP, &m), 0.5);
        assert_eq!(intersection_ratio(Rect::new(0.0, 900.0, 100.0, 100.0), VP, &m), 0.0);
    }

    #[test]
    fn negative_margins_shrink_the_root() {
        let m = RootMargin {
            top: Length::Px(-80.0),
            bottom: Length::Percent(-50.0),
            ..RootMargin::default()
        };
        // Root spans y in [80, 400]
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 100.0, 80.0), VP, &m), 0.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 300.0, 100.0, 200.0), VP, &m), 0.5);
    }

    #[test]
    fn bottom_margin_delays_entry() {
        let m = RootMargin::bottom_px(-50.0);
        let r = Rect::new(0.0, 760.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(r, VP, &m), 0.0);
    }
}
