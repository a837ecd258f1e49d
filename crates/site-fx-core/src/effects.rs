//! Short-lived decorative nodes: ripples, confetti, constellation lines,
//! tooltips, field checkmarks and the loading overlay.
//!
//! Every spawner inserts its nodes and queues their removal before returning,
//! so nothing outlives its lifetime even if the caller forgets about it.

use crate::action::Action;
use crate::constants::{
    CONNECTION_THICKNESS_PX, FIELD_CHECKMARK_ENTER_MS, FIELD_CHECKMARK_LIFETIME_MS,
    TOOLTIP_ENTER_DELAY_MS, TOOLTIP_GAP_PX,
};
use crate::scheduler::Scheduler;
use crate::surface::{styles, NodeId, Rect, Styles, Surface};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct RippleStyle {
    pub class_name: String,
    /// Diameter as a multiple of the host's larger side.
    pub size_factor: f32,
    pub lifetime_ms: f64,
    pub styles: Styles,
    /// Applied to the host so the ripple is clipped to it.
    pub host: Styles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiStyle {
    pub colors: Vec<String>,
    pub count: usize,
    pub size_px: f32,
    pub lifetime_ms: f64,
    pub min_velocity: f32,
    pub velocity_spread: f32,
}

/// One confetti piece: where it flies relative to the burst origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub offset: Vec2,
    pub color: usize,
}

/// Evenly spaced directions `TAU * i / count`, each with a random speed.
pub fn confetti_burst<R: Rng + ?Sized>(rng: &mut R, style: &ConfettiStyle) -> Vec<Particle> {
    let count = style.count.max(1);
    (0..style.count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            let velocity = style.min_velocity + rng.gen::<f32>() * style.velocity_spread;
            Particle {
                offset: Vec2::from_angle(angle) * velocity,
                color: if style.colors.is_empty() {
                    0
                } else {
                    rng.gen_range(0..style.colors.len())
                },
            }
        })
        .collect()
}

/// Spawn a confetti burst from the centre of `origin`. Returns the pieces.
pub fn spawn_confetti<S: Surface + ?Sized, R: Rng + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    rng: &mut R,
    origin: NodeId,
    style: &ConfettiStyle,
) -> Vec<NodeId> {
    let Some(body) = surface.body() else {
        return Vec::new();
    };
    let center = surface.rect(origin).center();
    let size = format!("{}px", style.size_px);
    let mut pieces = Vec::with_capacity(style.count);
    for particle in confetti_burst(rng, style) {
        let node = surface.create("div");
        let color = style
            .colors
            .get(particle.color)
            .map(String::as_str)
            .unwrap_or("currentColor");
        surface.set_styles(
            node,
            &styles(&[
                ("position", "fixed"),
                ("width", size.as_str()),
                ("height", size.as_str()),
                ("background", color),
                ("left", format!("{}px", center.x).as_str()),
                ("top", format!("{}px", center.y).as_str()),
                ("border-radius", "50%"),
                ("pointer-events", "none"),
                ("z-index", "9999"),
                ("animation", "confetti-fall 1s ease-out forwards"),
                ("--dx", format!("{}px", particle.offset.x).as_str()),
                ("--dy", format!("{}px", particle.offset.y).as_str()),
            ]),
        );
        surface.append(body, node);
        scheduler.after(style.lifetime_ms, Action::Remove(node));
        pieces.push(node);
    }
    pieces
}

/// Ripple centred on the click point, sized from the host's bounding box.
pub fn spawn_ripple<S: Surface + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    host: NodeId,
    click: Vec2,
    style: &RippleStyle,
) -> NodeId {
    let rect = surface.rect(host);
    let size = rect.width.max(rect.height) * style.size_factor;
    let corner = click - Vec2::new(rect.left, rect.top) - Vec2::splat(size / 2.0);

    let ripple = surface.create("span");
    surface.set_class_name(ripple, &style.class_name);
    surface.set_styles(ripple, &style.styles);
    surface.set_styles(
        ripple,
        &styles(&[
            ("width", format!("{size}px").as_str()),
            ("height", format!("{size}px").as_str()),
            ("left", format!("{}px", corner.x).as_str()),
            ("top", format!("{}px", corner.y).as_str()),
        ]),
    );
    surface.set_styles(host, &style.host);
    surface.append(host, ripple);
    scheduler.after(style.lifetime_ms, Action::Remove(ripple));
    ripple
}

/// Line from one centre to another, as a length plus rotation in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub origin: Vec2,
    pub length: f32,
    pub angle: f32,
}

pub fn connection_geometry(from: Vec2, to: Vec2) -> Connection {
    let delta = to - from;
    Connection {
        origin: from,
        length: delta.length(),
        angle: delta.y.atan2(delta.x),
    }
}

/// Draw a line from `active` to every other node in `all`.
pub fn spawn_connections<S: Surface + ?Sized>(
    surface: &mut S,
    active: NodeId,
    all: &[NodeId],
    class_name: &str,
    line: &Styles,
) -> Vec<NodeId> {
    let Some(body) = surface.body() else {
        return Vec::new();
    };
    let from = surface.rect(active).center();
    let mut lines = Vec::new();
    for other in all.iter().copied().filter(|n| *n != active) {
        let c = connection_geometry(from, surface.rect(other).center());
        let node = surface.create("div");
        surface.set_class_name(node, class_name);
        surface.set_styles(node, line);
        surface.set_styles(
            node,
            &styles(&[
                ("left", format!("{}px", c.origin.x).as_str()),
                ("top", format!("{}px", c.origin.y).as_str()),
                ("width", format!("{}px", c.length).as_str()),
                ("height", format!("{CONNECTION_THICKNESS_PX}px").as_str()),
                ("--angle", format!("{}rad", c.angle).as_str()),
                ("transform", format!("rotate({}rad) scaleX(0)", c.angle).as_str()),
            ]),
        );
        surface.append(body, node);
        lines.push(node);
    }
    lines
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipStyle {
    pub class_name: String,
    pub base: Styles,
    pub shown: Styles,
}

/// Tooltip below `anchor`, centred horizontally; fades in shortly after.
pub fn spawn_tooltip<S: Surface + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    anchor: NodeId,
    title: &str,
    description: &str,
    style: &TooltipStyle,
) -> Option<NodeId> {
    let body = surface.body()?;
    let rect: Rect = surface.rect(anchor);
    let tooltip = surface.create("div");
    surface.set_class_name(tooltip, &style.class_name);
    let heading = surface.create("h4");
    surface.set_text(heading, title);
    let text = surface.create("p");
    surface.set_text(text, description);
    surface.append(tooltip, heading);
    surface.append(tooltip, text);
    surface.set_styles(tooltip, &style.base);
    surface.set_styles(
        tooltip,
        &styles(&[
            ("left", format!("{}px", rect.left + rect.width / 2.0).as_str()),
            ("top", format!("{}px", rect.bottom() + TOOLTIP_GAP_PX).as_str()),
        ]),
    );
    surface.append(body, tooltip);
    scheduler.after(TOOLTIP_ENTER_DELAY_MS, Action::style(tooltip, &style.shown));
    Some(tooltip)
}

/// Remove every attached node matching `selector`. Returns how many went.
pub fn clear<S: Surface + ?Sized>(surface: &mut S, selector: &str) -> usize {
    surface
        .query_all(selector)
        .into_iter()
        .filter(|n| surface.remove(*n))
        .count()
}

/// Checkmark that pops in at the right edge of a completed field's group.
pub fn spawn_checkmark<S: Surface + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    field: NodeId,
    color: &str,
) -> Option<NodeId> {
    let group = surface.parent(field)?;
    let mark = surface.create("div");
    surface.set_text(mark, "\u{2713}");
    surface.set_styles(
        mark,
        &styles(&[
            ("position", "absolute"),
            ("right", "10px"),
            ("top", "50%"),
            ("transform", "translateY(-50%) scale(0)"),
            ("color", color),
            ("font-weight", "bold"),
            (
                "transition",
                "transform 0.3s cubic-bezier(0.68, -0.55, 0.265, 1.55)",
            ),
        ]),
    );
    surface.set_style(group, "position", "relative");
    surface.append(group, mark);
    scheduler.after(
        FIELD_CHECKMARK_ENTER_MS,
        Action::Style {
            node: mark,
            styles: styles(&[("transform", "translateY(-50%) scale(1)")]),
        },
    );
    scheduler.after(FIELD_CHECKMARK_LIFETIME_MS, Action::Remove(mark));
    Some(mark)
}

/// Full-screen dimmed overlay with a spinner and a message.
pub fn spawn_loading_overlay<S: Surface + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    message: &str,
    lifetime_ms: f64,
) -> Option<NodeId> {
    let body = surface.body()?;
    let overlay = surface.create("div");
    surface.set_styles(
        overlay,
        &styles(&[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("background", "rgba(0, 0, 0, 0.8)"),
            ("display", "flex"),
            ("flex-direction", "column"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("z-index", "10000"),
            ("color", "white"),
            ("font-family", "Inter, sans-serif"),
        ]),
    );
    let spinner = surface.create("div");
    surface.set_styles(
        spinner,
        &styles(&[
            ("width", "50px"),
            ("height", "50px"),
            ("border", "3px solid #333"),
            ("border-top", "3px solid #E53E3E"),
            ("border-radius", "50%"),
            ("animation", "spin 1s linear infinite"),
            ("margin-bottom", "1rem"),
        ]),
    );
    let label = surface.create("p");
    surface.set_text(label, message);
    surface.set_styles(
        label,
        &styles(&[("font-size", "1.1rem"), ("font-weight", "500")]),
    );
    surface.append(overlay, spinner);
    surface.append(overlay, label);
    surface.append(body, overlay);
    scheduler.after(lifetime_ms, Action::Remove(overlay));
    Some(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn confetti() -> ConfettiStyle {
        ConfettiStyle {
            colors: vec!["#E53E3E".into(), "#16A085".into()],
            count: 12,
            size_px: 10.0,
            lifetime_ms: 1000.0,
            min_velocity: 50.0,
            velocity_spread: 50.0,
        }
    }

    #[test]
    fn burst_spreads_evenly_within_velocity_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let burst = confetti_burst(&mut rng, &confetti());
        assert_eq!(burst.len(), 12);
        for (i, p) in burst.iter().enumerate() {
            let speed = p.offset.length();
            assert!((50.0..=100.0 + 1e-3).contains(&speed), "speed {speed}");
            let expected = TAU * i as f32 / 12.0;
            let actual = p.offset.y.atan2(p.offset.x).rem_euclid(TAU);
            let diff = (actual - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "piece {i}");
            assert!(p.color < 2);
        }
    }

    #[test]
    fn connection_points_at_target() {
        let c = connection_geometry(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert!((c.length - 10.0).abs() < 1e-5);
        assert!((c.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        let back = connection_geometry(Vec2::new(3.0, 4.0), Vec2::ZERO);
        assert!((back.length - 5.0).abs() < 1e-5);
    }
}
