//! Toast notifications.
//!
//! A notice is built hidden, slid in after a short delay, dismissed after a
//! fixed time and detached once its exit transition has run. An optional close
//! button detaches it early; the pending removal then finds nothing to do.

use crate::action::Action;
use crate::scheduler::{Scheduler, Sequence};
use crate::surface::{NodeId, Styles, Surface};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
    #[default]
    Info,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }

    /// Font Awesome class list for the leading icon.
    pub fn icon(self) -> &'static str {
        match self {
            NoticeKind::Success => "fas fa-check-circle",
            NoticeKind::Warning => "fas fa-exclamation-triangle",
            NoticeKind::Error => "fas fa-times-circle",
            NoticeKind::Info => "fas fa-info-circle",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NoticeKind::Success),
            "warning" => Ok(NoticeKind::Warning),
            "error" => Ok(NoticeKind::Error),
            "info" => Ok(NoticeKind::Info),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoticeColors {
    pub background: String,
    pub color: String,
    pub border: Option<String>,
}

impl NoticeColors {
    pub fn new(background: &str, color: &str, border: Option<&str>) -> Self {
        Self {
            background: background.to_string(),
            color: color.to_string(),
            border: border.map(str::to_string),
        }
    }

    fn to_styles(&self) -> Styles {
        let mut out = vec![
            ("background".to_string(), self.background.clone()),
            ("color".to_string(), self.color.clone()),
        ];
        if let Some(border) = &self.border {
            out.push(("border".to_string(), format!("1px solid {border}")));
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoticePalette {
    pub success: NoticeColors,
    pub warning: NoticeColors,
    pub error: NoticeColors,
    pub info: NoticeColors,
}

impl NoticePalette {
    pub fn get(&self, kind: NoticeKind) -> &NoticeColors {
        match kind {
            NoticeKind::Success => &self.success,
            NoticeKind::Warning => &self.warning,
            NoticeKind::Error => &self.error,
            NoticeKind::Info => &self.info,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoticeTheme {
    /// Base class; the kind is added as `notification-<kind>`.
    pub class_name: String,
    pub base: Styles,
    pub hidden: Styles,
    pub shown: Styles,
    pub row: Styles,
    pub icon: Styles,
    pub text: Styles,
    pub palette: NoticePalette,
    pub close_button: bool,
    pub enter_delay_ms: f64,
    pub dismiss_after_ms: f64,
    pub exit_ms: f64,
}

/// Nodes of a freshly inserted notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub node: NodeId,
    pub close: Option<NodeId>,
}

/// Insert a notice into the body and queue its enter, dismiss and removal.
pub fn show<S: Surface + ?Sized>(
    surface: &mut S,
    scheduler: &mut Scheduler<Action>,
    theme: &NoticeTheme,
    message: &str,
    kind: NoticeKind,
) -> Option<Notice> {
    let body = surface.body()?;
    let node = surface.create("div");
    surface.set_class_name(node, &format!("{} notification-{}", theme.class_name, kind));
    surface.set_styles(node, &theme.base);
    surface.set_styles(node, &theme.palette.get(kind).to_styles());
    surface.set_styles(node, &theme.hidden);

    let row = surface.create("div");
    surface.set_styles(row, &theme.row);
    let icon = surface.create("i");
    surface.set_class_name(icon, kind.icon());
    surface.set_styles(icon, &theme.icon);
    let text = surface.create("span");
    surface.set_text(text, message);
    surface.set_styles(text, &theme.text);
    surface.append(row, icon);
    surface.append(row, text);
    surface.append(node, row);

    let close = theme.close_button.then(|| {
        let button = surface.create("button");
        surface.set_styles(
            button,
            &crate::surface::styles(&[
                ("position", "absolute"),
                ("top", "0.5rem"),
                ("right", "0.5rem"),
                ("background", "none"),
                ("border", "none"),
                ("cursor", "pointer"),
                ("opacity", "0.7"),
            ]),
        );
        let cross = surface.create("i");
        surface.set_class_name(cross, "fas fa-times");
        surface.append(button, cross);
        surface.append(node, button);
        button
    });

    surface.append(body, node);

    let dismiss_gap = (theme.dismiss_after_ms - theme.enter_delay_ms).max(0.0);
    scheduler.run(
        Sequence::new()
            .then(theme.enter_delay_ms, Action::style(node, &theme.shown))
            .then(dismiss_gap, Action::style(node, &theme.hidden))
            .then(theme.exit_ms, Action::Remove(node)),
    );
    log::debug!("notice ({kind}): {message}");
    Some(Notice { node, close })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse() {
        for kind in [
            NoticeKind::Success,
            NoticeKind::Warning,
            NoticeKind::Error,
            NoticeKind::Info,
        ] {
            assert_eq!(kind.as_str().parse::<NoticeKind>(), Ok(kind));
        }
        assert!("fatal".parse::<NoticeKind>().is_err());
    }

    #[test]
    fn border_only_when_present() {
        let flat = NoticeColors::new("#fff", "#000", None).to_styles();
        assert_eq!(flat.len(), 2);
        let framed = NoticeColors::new("#fff", "#000", Some("#ccc")).to_styles();
        assert_eq!(framed[2].1, "1px solid #ccc");
    }
}
