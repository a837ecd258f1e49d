use crate::notify::NoticeKind;
use crate::surface::{NodeId, Styles};

/// Deferred page mutation, queued on the controller's scheduler.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Style { node: NodeId, styles: Styles },
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    SetClassName { node: NodeId, class_name: String },
    /// Detach a node; a node that is already gone is ignored.
    Remove(NodeId),
    Html { node: NodeId, html: String },
    Disable { node: NodeId, disabled: bool },
    Navigate(String),
    Notify { message: String, kind: NoticeKind },
    /// Clear the contact form and return the submit button to idle.
    ResetForm,
    Confetti(NodeId),
    /// Smooth-scroll so `target` sits `offset` pixels below the top.
    ScrollToNode { target: NodeId, offset: f32, duration_ms: f64 },
    CounterTick(NodeId),
    /// One beat of an ambient pulse; reschedules itself.
    Pulse { rule: usize, node: NodeId, period_ms: f64 },
    /// Nudge every idle drifting element; reschedules itself.
    Drift,
    /// Take back one drift offset, if the transform still carries it.
    Undrift { node: NodeId, suffix: String },
    CloseMenu,
    ToggleMenu,
    HighlightCard(NodeId),
}

impl Action {
    pub fn style(node: NodeId, styles: &Styles) -> Self {
        Action::Style {
            node,
            styles: styles.clone(),
        }
    }
}
