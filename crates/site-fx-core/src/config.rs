//! Per-variant configuration.
//!
//! The site ships two looks ("elegant" and "enhanced") that run the same
//! interactions with different selectors, timings and styles. Everything that
//! differs lives here; [`ConfigOverrides`] lets the page adjust the scalar
//! tunables from an inline JSON block.

use crate::constants::{
    CONFETTI_COUNT, CONFETTI_LIFETIME_MS, CONFETTI_MIN_VELOCITY, CONFETTI_SIZE_PX,
    CONFETTI_VELOCITY_SPREAD, COUNTER_DURATION_MS, LOADING_OVERLAY_MS, NAV_MENU_FADE_IN_DELAY_MS,
    NOTICE_DISMISS_AFTER_MS, NOTICE_ENTER_DELAY_MS, ORB_DRIFT_HOLD_MS, ORB_DRIFT_PERIOD_MS,
    ORB_DRIFT_PX,
};
use crate::effects::{ConfettiStyle, RippleStyle, TooltipStyle};
use crate::konami::{KONAMI_CODE, SERVICENOW_CODE};
use crate::mailto::MailTemplate;
use crate::notify::{NoticeColors, NoticePalette, NoticeTheme};
use crate::observer::{Length, RootMargin};
use crate::scroll::NavThresholds;
use crate::surface::{styles, Styles};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown site variant {0:?}")]
    UnknownVariant(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Elegant,
    #[default]
    Enhanced,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Elegant => "elegant",
            Variant::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elegant" => Ok(Variant::Elegant),
            "enhanced" | "" => Ok(Variant::Enhanced),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

/// Mobile menu toggle with a fade and an icon swap.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuAnimation {
    pub open_delay_ms: f64,
    pub close_ms: f64,
    pub open_icon: String,
    pub closed_icon: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavConfig {
    pub navbar: String,
    pub links: String,
    pub toggle: String,
    pub menu: String,
    pub scrolled_class: String,
    pub menu_active_class: String,
    pub thresholds: NavThresholds,
    pub hidden: Styles,
    pub shown: Styles,
    /// Gap left above an anchor target after scrolling to it.
    pub anchor_offset: f32,
    pub scroll_duration_ms: f64,
    pub press: Styles,
    pub release: Styles,
    pub menu_hidden: Styles,
    pub menu_shown: Styles,
    pub menu_close_ms: f64,
    pub toggle_press: Styles,
    pub toggle_release: Styles,
    pub menu_animation: Option<MenuAnimation>,
}

/// Nav link highlighting for the section currently in view.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionHighlight {
    pub sections: String,
    /// Link selector; `{id}` is replaced by the section id.
    pub link_template: String,
    pub active_class: String,
    pub threshold: f32,
    pub margin: RootMargin,
}

/// Delayed entrance for one or more elements, `step_ms` apart.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggerRule {
    pub selector: String,
    pub delay_ms: f64,
    pub step_ms: f64,
    /// Only the first match, as `querySelector` would.
    pub single: bool,
    pub styles: Styles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChildHover {
    pub selector: String,
    pub single: bool,
    pub stagger_ms: f64,
    pub enter: Styles,
    pub leave: Styles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HoverRule {
    pub selector: String,
    pub enter: Styles,
    pub leave: Styles,
    pub children: Vec<ChildHover>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RippleRule {
    pub selector: String,
    pub style: RippleStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiRule {
    pub selector: String,
    pub skip_inside_links: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CursorRule {
    pub selector: String,
    /// Also set `cursor: pointer` on the element itself.
    pub on_element: bool,
}

/// Periodic scale pulse, skipped while the element is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseRule {
    pub selector: String,
    pub start_ms: f64,
    pub start_step_ms: f64,
    pub period_ms: f64,
    pub period_step_ms: f64,
    pub hold_ms: f64,
    pub pulse: Styles,
    pub rest: Styles,
}

/// Small random vertical nudge appended to the transform of idle elements.
#[derive(Clone, Debug, PartialEq)]
pub struct DriftRule {
    pub selector: String,
    pub period_ms: f64,
    /// Offsets are drawn from `-amplitude_px..amplitude_px`.
    pub amplitude_px: f32,
    pub hold_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceInfo {
    pub key: String,
    pub name: String,
    pub description: String,
}

impl ServiceInfo {
    fn new(key: &str, name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstellationConfig {
    pub orbs: String,
    pub enter: Styles,
    pub leave: Styles,
    pub connection_class: String,
    pub connection: Styles,
    pub tooltip: TooltipStyle,
    pub services: Vec<ServiceInfo>,
    pub fallback: ServiceInfo,
    /// Showcase card selector; `{service}` is replaced by the orb's `data-service`.
    pub showcase_template: String,
    pub scroll_offset: f32,
    pub scroll_duration_ms: f64,
    pub highlight_delay_ms: f64,
    pub highlight: Styles,
    pub unhighlight: Styles,
}

impl ConstellationConfig {
    pub fn service(&self, key: &str) -> &ServiceInfo {
        self.services
            .iter()
            .find(|s| s.key == key)
            .unwrap_or(&self.fallback)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntranceConfig {
    pub selectors: String,
    /// Subset of `selectors` that also count up their number.
    pub counters: String,
    pub threshold: f32,
    pub margin: RootMargin,
    pub hidden: Styles,
    pub visible: Styles,
    pub visible_class: Option<String>,
    pub counter_duration_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LazyBackgrounds {
    pub selector: String,
    pub attribute: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxConfig {
    pub selector: String,
    pub rate: f32,
}

/// Button labels and styles for each stage of a submit.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitStages {
    pub busy_html: String,
    pub busy: Styles,
    pub launch_html: String,
    pub launch: Styles,
    pub idle_html: String,
    pub idle: Styles,
    /// Busy to launch, launch to navigation, navigation to reset.
    pub delays_ms: [f64; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormMessages {
    pub missing: String,
    pub invalid_email: String,
    pub success: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormConfig {
    pub form: String,
    pub fields: String,
    pub submit_button: String,
    pub focused_class: String,
    pub completed_class: String,
    pub error_class: String,
    pub required: Vec<String>,
    pub email_field: String,
    pub first_focus: Styles,
    pub first_focus_release: Styles,
    pub focus: Styles,
    pub blur: Styles,
    pub filled_border: String,
    pub checkmark_color: String,
    pub stages: SubmitStages,
    pub messages: FormMessages,
    pub mail: MailTemplate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SecretEffect {
    pub selector: String,
    pub stagger_ms: f64,
    pub styles: Styles,
    /// `animation` shorthand; with a step, each element gets `i * step` seconds of delay.
    pub animation: Option<String>,
    pub animation_delay_step_s: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SecretMode {
    pub sequence: Vec<u32>,
    pub message: String,
    pub effects: Vec<SecretEffect>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadingConfig {
    pub links: String,
    pub href_contains: String,
    pub message: String,
    pub lifetime_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub variant: Variant,
    pub stylesheet: &'static str,
    pub nav: NavConfig,
    pub sections: Option<SectionHighlight>,
    pub hero: Vec<StaggerRule>,
    pub hover: Vec<HoverRule>,
    pub cursor: CursorRule,
    pub ripples: Vec<RippleRule>,
    pub confetti: ConfettiStyle,
    pub confetti_on_click: Vec<ConfettiRule>,
    pub pulses: Vec<PulseRule>,
    pub drift: Option<DriftRule>,
    pub constellation: Option<ConstellationConfig>,
    pub entrance: EntranceConfig,
    pub lazy_backgrounds: Option<LazyBackgrounds>,
    pub parallax: Option<ParallaxConfig>,
    pub form: FormConfig,
    pub secret: SecretMode,
    pub notices: NoticeTheme,
    pub loading: Option<LoadingConfig>,
}

/// Scalar tunables the page may override with a JSON block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub variant: Option<Variant>,
    pub scrolled_after: Option<f32>,
    pub hide_after: Option<f32>,
    pub anchor_offset: Option<f32>,
    pub scroll_duration_ms: Option<f64>,
    pub mail_address: Option<String>,
    pub notice_dismiss_ms: Option<f64>,
    pub submit_delays_ms: Option<[f64; 3]>,
    pub counter_duration_ms: Option<f64>,
    pub entrance_threshold: Option<f32>,
    pub secret_sequence: Option<Vec<u32>>,
    pub parallax_rate: Option<f32>,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

const HERO_BUTTONS: &str = ".hero-actions .btn";
const SPRING: &str = "cubic-bezier(0.34, 1.56, 0.64, 1)";
const BOUNCE: &str = "cubic-bezier(0.68, -0.55, 0.265, 1.55)";
const SMOOTH: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

fn transition(what: &str, secs: &str, curve: &str) -> String {
    format!("{what} {secs} {curve}")
}

fn tw(transform: &str) -> Styles {
    styles(&[("transform", transform)])
}

fn tw_with(transform: &str, transition: &str) -> Styles {
    styles(&[("transform", transform), ("transition", transition)])
}

fn nav_visibility() -> (Styles, Styles) {
    (tw("translateY(-100%)"), tw("translateY(0)"))
}

fn form_base(
    checkmark_color: &str,
    filled_border: &str,
    stages: SubmitStages,
    messages: FormMessages,
    mail: MailTemplate,
) -> FormConfig {
    FormConfig {
        form: "#contactForm".into(),
        fields: "input, select, textarea".into(),
        submit_button: "button[type=\"submit\"]".into(),
        focused_class: "focused".into(),
        completed_class: "completed".into(),
        error_class: "field-error".into(),
        required: ["name", "email", "service", "message"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        email_field: "email".into(),
        first_focus: Styles::new(),
        first_focus_release: Styles::new(),
        focus: Styles::new(),
        blur: Styles::new(),
        filled_border: filled_border.into(),
        checkmark_color: checkmark_color.into(),
        stages,
        messages,
        mail,
    }
}

impl SiteConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Elegant => Self::elegant(),
            Variant::Enhanced => Self::enhanced(),
        }
    }

    /// Variant from the page attribute, then overrides from the JSON block.
    /// A `variant` named inside the JSON wins over the attribute.
    pub fn load(variant_attr: Option<&str>, json: Option<&str>) -> Result<Self, ConfigError> {
        let attr = variant_attr.map(str::parse::<Variant>).transpose()?;
        let overrides = match json {
            Some(text) if !text.trim().is_empty() => ConfigOverrides::from_json(text)?,
            _ => ConfigOverrides::default(),
        };
        let variant = overrides.variant.or(attr).unwrap_or_default();
        Ok(Self::for_variant(variant).with_overrides(&overrides))
    }

    pub fn with_overrides(mut self, o: &ConfigOverrides) -> Self {
        if let Some(v) = o.scrolled_after {
            self.nav.thresholds.scrolled_after = v;
        }
        if let Some(v) = o.hide_after {
            self.nav.thresholds.hide_after = Some(v);
        }
        if let Some(v) = o.anchor_offset {
            self.nav.anchor_offset = v;
        }
        if let Some(v) = o.scroll_duration_ms {
            self.nav.scroll_duration_ms = v.max(0.0);
        }
        if let Some(v) = &o.mail_address {
            self.form.mail.address = v.clone();
        }
        if let Some(v) = o.notice_dismiss_ms {
            self.notices.dismiss_after_ms = v.max(0.0);
        }
        if let Some(v) = o.submit_delays_ms {
            self.form.stages.delays_ms = v.map(|d| d.max(0.0));
        }
        if let Some(v) = o.counter_duration_ms {
            self.entrance.counter_duration_ms = v.max(0.0);
        }
        if let Some(v) = o.entrance_threshold {
            self.entrance.threshold = v.clamp(0.0, 1.0);
        }
        if let Some(v) = &o.secret_sequence {
            self.secret.sequence = v.clone();
        }
        if let (Some(rate), Some(parallax)) = (o.parallax_rate, self.parallax.as_mut()) {
            parallax.rate = rate;
        }
        self
    }

    fn confetti_style(colors: &[&str]) -> ConfettiStyle {
        ConfettiStyle {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            count: CONFETTI_COUNT,
            size_px: CONFETTI_SIZE_PX,
            lifetime_ms: CONFETTI_LIFETIME_MS,
            min_velocity: CONFETTI_MIN_VELOCITY,
            velocity_spread: CONFETTI_VELOCITY_SPREAD,
        }
    }

    pub fn enhanced() -> Self {
        let (hidden, shown) = nav_visibility();
        let nav = NavConfig {
            navbar: ".navbar".into(),
            links: ".nav-link".into(),
            toggle: ".nav-toggle".into(),
            menu: ".nav-menu".into(),
            scrolled_class: "scrolled".into(),
            menu_active_class: "active".into(),
            thresholds: NavThresholds {
                scrolled_after: 50.0,
                hide_after: None,
            },
            hidden,
            shown,
            anchor_offset: 70.0,
            scroll_duration_ms: 1000.0,
            press: tw_with("scale(0.95)", "transform 0.1s ease"),
            release: tw("scale(1)"),
            menu_hidden: styles(&[("opacity", "0")]),
            menu_shown: styles(&[("opacity", "1")]),
            menu_close_ms: 200.0,
            toggle_press: tw_with(
                "scale(0.9) rotate(180deg)",
                &transition("transform", "0.2s", BOUNCE),
            ),
            toggle_release: tw("scale(1) rotate(0deg)"),
            menu_animation: None,
        };

        let hero = vec![
            StaggerRule {
                selector: ".hero-content h1".into(),
                delay_ms: 300.0,
                step_ms: 0.0,
                single: true,
                styles: styles(&[("opacity", "1"), ("transform", "translateY(0)")]),
            },
            StaggerRule {
                selector: ".tagline".into(),
                delay_ms: 100.0,
                step_ms: 0.0,
                single: true,
                styles: styles(&[("opacity", "1"), ("transform", "translateY(0)")]),
            },
            StaggerRule {
                selector: ".service-node".into(),
                delay_ms: 600.0,
                step_ms: 200.0,
                single: false,
                styles: styles(&[("opacity", "1"), ("transform", "scale(1)")]),
            },
            StaggerRule {
                selector: HERO_BUTTONS.into(),
                delay_ms: 800.0,
                step_ms: 100.0,
                single: false,
                styles: styles(&[("opacity", "1"), ("transform", "translateY(0)")]),
            },
        ];

        let hover = vec![
            HoverRule {
                selector: HERO_BUTTONS.into(),
                enter: tw_with(
                    "translateY(-2px) scale(1.02)",
                    &transition("all", "0.2s", SPRING),
                ),
                leave: tw("translateY(0) scale(1)"),
                children: Vec::new(),
            },
            HoverRule {
                selector: ".service-card, .tool-card, .module-card".into(),
                enter: tw_with(
                    "translateY(-8px) scale(1.02)",
                    &transition("all", "0.3s", SPRING),
                ),
                leave: tw("translateY(0) scale(1)"),
                children: vec![ChildHover {
                    selector: ".service-icon i, .tool-header i".into(),
                    single: true,
                    stagger_ms: 0.0,
                    enter: tw_with(
                        "scale(1.2) rotate(5deg)",
                        &transition("transform", "0.3s", BOUNCE),
                    ),
                    leave: tw("scale(1) rotate(0deg)"),
                }],
            },
            HoverRule {
                selector: ".feature-tag, .feature, .feature-badge".into(),
                enter: tw_with(
                    "scale(1.1) rotate(2deg)",
                    &transition("transform", "0.2s", BOUNCE),
                ),
                leave: tw("scale(1) rotate(0deg)"),
                children: Vec::new(),
            },
            HoverRule {
                selector: ".tool-link".into(),
                enter: tw_with("translateX(5px)", "transform 0.2s ease"),
                leave: tw("translateX(0)"),
                children: Vec::new(),
            },
        ];

        let ripples = vec![RippleRule {
            selector: HERO_BUTTONS.into(),
            style: RippleStyle {
                class_name: "btn-ripple".into(),
                size_factor: 1.0,
                lifetime_ms: 600.0,
                styles: Styles::new(),
                host: Styles::new(),
            },
        }];

        let pulses = vec![
            PulseRule {
                selector: ".service-node".into(),
                start_ms: 600.0,
                start_step_ms: 200.0,
                period_ms: 3000.0,
                period_step_ms: 500.0,
                hold_ms: 300.0,
                pulse: tw("scale(1.02)"),
                rest: tw("scale(1)"),
            },
            PulseRule {
                selector: ".status-badge.online".into(),
                start_ms: 0.0,
                start_step_ms: 0.0,
                period_ms: 2000.0,
                period_step_ms: 0.0,
                hold_ms: 500.0,
                pulse: tw("scale(1.05)"),
                rest: tw("scale(1)"),
            },
        ];

        let entrance = EntranceConfig {
            selectors: ".service-card, .tool-card, .module-card, .step, .trend-item, .stat-number, .achievement-number".into(),
            counters: ".stat-number, .achievement-number".into(),
            threshold: 0.1,
            margin: RootMargin::bottom_px(-50.0),
            hidden: Styles::new(),
            visible: Styles::new(),
            visible_class: Some("animate-in".into()),
            counter_duration_ms: COUNTER_DURATION_MS,
        };

        let mut form = form_base(
            "#16A085",
            "#16A085",
            SubmitStages {
                busy_html: r#"<i class="fas fa-rocket"></i> Launching..."#.into(),
                busy: tw("scale(0.95)"),
                launch_html: r#"<i class="fas fa-check-circle"></i> Opening Email..."#.into(),
                launch: styles(&[("background", "#16A085")]),
                idle_html: r#"<i class="fas fa-paper-plane"></i> Request Consultation"#.into(),
                idle: styles(&[("background", ""), ("transform", "scale(1)")]),
                delays_ms: [500.0, 1000.0, 1000.0],
            },
            FormMessages {
                missing: "Please fill in all fields to help us assist you better! \u{1F60A}".into(),
                invalid_email: "Please enter a valid email address so we can reach you! \u{1F4E7}"
                    .into(),
                success: "Your email client should now be open! We look forward to hearing from you! \u{1F680}".into(),
            },
            MailTemplate {
                address: "ck@digiconsult.ca".into(),
                subject_label: "Consultation Request".into(),
                optional_fields: Vec::new(),
                signature: None,
                timestamp: false,
            },
        );
        form.first_focus = tw_with("scale(1.02)", "transform 0.2s ease");
        form.first_focus_release = tw("scale(1)");

        let secret = SecretMode {
            sequence: KONAMI_CODE.to_vec(),
            message: "\u{1F389} Secret mode activated! DigiConsult appreciates curious minds!"
                .into(),
            effects: vec![
                SecretEffect {
                    selector: ".nav-brand img".into(),
                    stagger_ms: 0.0,
                    styles: styles(&[("filter", "hue-rotate(0deg)")]),
                    animation: Some("rainbow 3s linear infinite".into()),
                    animation_delay_step_s: None,
                },
                SecretEffect {
                    selector: ".service-node".into(),
                    stagger_ms: 200.0,
                    styles: Styles::new(),
                    animation: Some("float 2s ease-in-out infinite".into()),
                    animation_delay_step_s: Some(0.5),
                },
            ],
        };

        let notices = NoticeTheme {
            class_name: "notification".into(),
            base: styles(&[
                ("position", "fixed"),
                ("top", "20px"),
                ("right", "20px"),
                ("max-width", "400px"),
                ("padding", "1rem"),
                ("border-radius", "0.5rem"),
                ("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.15)"),
                ("z-index", "10000"),
                ("transition", transition("all", "0.3s", BOUNCE).as_str()),
                ("font-family", "Inter, sans-serif"),
            ]),
            hidden: styles(&[("opacity", "0"), ("transform", "translateX(100%)")]),
            shown: styles(&[("opacity", "1"), ("transform", "translateX(0)")]),
            row: styles(&[
                ("display", "flex"),
                ("align-items", "center"),
                ("gap", "0.75rem"),
            ]),
            icon: Styles::new(),
            text: Styles::new(),
            palette: NoticePalette {
                success: NoticeColors::new("#D4EDDA", "#155724", Some("#C3E6CB")),
                warning: NoticeColors::new("#FFF3CD", "#856404", Some("#FFEAA7")),
                error: NoticeColors::new("#F8D7DA", "#721C24", Some("#F5C6CB")),
                info: NoticeColors::new("#CCE5FF", "#004085", Some("#B3D4FC")),
            },
            close_button: true,
            enter_delay_ms: NOTICE_ENTER_DELAY_MS,
            dismiss_after_ms: NOTICE_DISMISS_AFTER_MS,
            exit_ms: 300.0,
        };

        SiteConfig {
            variant: Variant::Enhanced,
            stylesheet: crate::styles::ENHANCED_CSS,
            nav,
            sections: None,
            hero,
            hover,
            cursor: CursorRule {
                selector: "a, button, .service-card, .tool-card".into(),
                on_element: false,
            },
            ripples,
            confetti: Self::confetti_style(&["#E53E3E", "#16A085", "#3498DB", "#F39C12", "#9B59B6"]),
            confetti_on_click: vec![ConfettiRule {
                selector: ".service-card, .tool-card, .module-card".into(),
                skip_inside_links: true,
            }],
            pulses,
            drift: None,
            constellation: None,
            entrance,
            lazy_backgrounds: None,
            parallax: None,
            form,
            secret,
            notices,
            loading: Some(LoadingConfig {
                links: "a[target=\"_blank\"]".into(),
                href_contains: "digiconsult.ca".into(),
                message: "Connecting to AI Infrastructure...".into(),
                lifetime_ms: LOADING_OVERLAY_MS,
            }),
        }
    }

    pub fn elegant() -> Self {
        let (hidden, shown) = nav_visibility();
        let slide_out = styles(&[("opacity", "0"), ("transform", "translateY(-20px)")]);
        let slide_in = styles(&[("opacity", "1"), ("transform", "translateY(0)")]);
        let nav = NavConfig {
            navbar: "#navbar".into(),
            links: ".nav-link, .nav-cta".into(),
            toggle: "#nav-toggle".into(),
            menu: "#nav-menu".into(),
            scrolled_class: "scrolled".into(),
            menu_active_class: "active".into(),
            thresholds: NavThresholds {
                scrolled_after: 100.0,
                hide_after: Some(200.0),
            },
            hidden,
            shown,
            anchor_offset: 80.0,
            scroll_duration_ms: 1000.0,
            press: tw_with("scale(0.98)", &transition("transform", "0.1s", SMOOTH)),
            release: tw("scale(1)"),
            menu_hidden: slide_out.clone(),
            menu_shown: slide_in.clone(),
            menu_close_ms: 300.0,
            toggle_press: tw_with(
                "scale(0.9) rotate(180deg)",
                &transition("transform", "0.3s", BOUNCE),
            ),
            toggle_release: tw("scale(1) rotate(0deg)"),
            menu_animation: Some(MenuAnimation {
                open_delay_ms: NAV_MENU_FADE_IN_DELAY_MS,
                close_ms: 200.0,
                open_icon: "fas fa-times".into(),
                closed_icon: "fas fa-bars".into(),
            }),
        };

        let sections = SectionHighlight {
            sections: "section[id]".into(),
            link_template: ".nav-link[href=\"#{id}\"]".into(),
            active_class: "active".into(),
            threshold: 0.3,
            margin: RootMargin {
                top: Length::Px(-80.0),
                right: Length::Px(0.0),
                bottom: Length::Percent(-50.0),
                left: Length::Px(0.0),
            },
        };

        let arrive = || styles(&[("opacity", "1"), ("transform", "translateY(0)")]);
        let mut hero: Vec<StaggerRule> = [
            (".hero-tagline", 200.0),
            (".hero-title", 400.0),
            (".hero-description", 600.0),
            (".hero-actions", 800.0),
            (".hero-visual", 1000.0),
        ]
        .iter()
        .map(|(selector, delay)| StaggerRule {
            selector: selector.to_string(),
            delay_ms: *delay,
            step_ms: 0.0,
            single: true,
            styles: arrive(),
        })
        .collect();
        hero.push(StaggerRule {
            selector: ".service-orb".into(),
            delay_ms: 1200.0,
            step_ms: 200.0,
            single: false,
            styles: styles(&[("opacity", "1"), ("transform", "scale(1)")]),
        });

        let hover = vec![
            HoverRule {
                selector: HERO_BUTTONS.into(),
                enter: styles(&[
                    ("transform", "translateY(-3px) scale(1.02)"),
                    ("transition", transition("all", "0.3s", SPRING).as_str()),
                    ("box-shadow", "0 25px 50px -12px rgba(229, 62, 62, 0.25)"),
                ]),
                leave: styles(&[("transform", "translateY(0) scale(1)"), ("box-shadow", "")]),
                children: Vec::new(),
            },
            HoverRule {
                selector: ".service-showcase-card".into(),
                enter: tw_with(
                    "translateY(-12px) scale(1.02)",
                    &transition("all", "0.4s", SPRING),
                ),
                leave: tw("translateY(0) scale(1)"),
                children: vec![
                    ChildHover {
                        selector: ".service-icon-large".into(),
                        single: true,
                        stagger_ms: 0.0,
                        enter: tw_with(
                            "scale(1.1) rotate(8deg)",
                            &transition("transform", "0.4s", BOUNCE),
                        ),
                        leave: tw("scale(1) rotate(0deg)"),
                    },
                    ChildHover {
                        selector: ".highlight-tag".into(),
                        single: false,
                        stagger_ms: 50.0,
                        enter: styles(&[
                            ("transform", "translateY(-2px) scale(1.05)"),
                            ("background", "var(--brand-red)"),
                            ("color", "white"),
                        ]),
                        leave: styles(&[
                            ("transform", "translateY(0) scale(1)"),
                            ("background", ""),
                            ("color", ""),
                        ]),
                    },
                ],
            },
            HoverRule {
                selector: ".contact-info-item".into(),
                enter: Styles::new(),
                leave: Styles::new(),
                children: vec![ChildHover {
                    selector: ".contact-icon".into(),
                    single: true,
                    stagger_ms: 0.0,
                    enter: styles(&[
                        ("transform", "scale(1.2) rotate(10deg)"),
                        (
                            "background",
                            "linear-gradient(135deg, var(--brand-red), var(--gold))",
                        ),
                    ]),
                    leave: styles(&[("transform", "scale(1) rotate(0deg)"), ("background", "")]),
                }],
            },
        ];

        let ripples = vec![RippleRule {
            selector: HERO_BUTTONS.into(),
            style: RippleStyle {
                class_name: "advanced-ripple".into(),
                size_factor: 2.0,
                lifetime_ms: 800.0,
                styles: styles(&[
                    ("position", "absolute"),
                    ("border-radius", "50%"),
                    (
                        "background",
                        "radial-gradient(circle, rgba(255,255,255,0.6) 0%, transparent 70%)",
                    ),
                    ("pointer-events", "none"),
                    ("transform", "scale(0)"),
                    (
                        "animation",
                        format!("advanced-ripple 0.8s {SMOOTH} forwards").as_str(),
                    ),
                    ("z-index", "1"),
                ]),
                host: styles(&[("position", "relative"), ("overflow", "hidden")]),
            },
        }];

        let constellation = ConstellationConfig {
            orbs: ".service-orb".into(),
            enter: styles(&[
                ("transform", "scale(1.15) translateY(-8px)"),
                ("transition", transition("all", "0.4s", BOUNCE).as_str()),
                ("box-shadow", "0 25px 50px -12px rgba(0, 0, 0, 0.3)"),
                ("z-index", "10"),
            ]),
            leave: styles(&[
                ("transform", "scale(1) translateY(0)"),
                ("box-shadow", ""),
                ("z-index", ""),
            ]),
            connection_class: "constellation-connection".into(),
            connection: styles(&[
                ("position", "fixed"),
                ("background", "linear-gradient(90deg, var(--brand-red), transparent)"),
                ("transform-origin", "0 50%"),
                (
                    "animation",
                    format!("constellation-line 0.5s {BOUNCE} forwards").as_str(),
                ),
                ("pointer-events", "none"),
                ("z-index", "1"),
            ]),
            tooltip: TooltipStyle {
                class_name: "service-tooltip".into(),
                base: styles(&[
                    ("position", "fixed"),
                    ("background", "var(--charcoal)"),
                    ("color", "white"),
                    ("padding", "1rem"),
                    ("border-radius", "0.5rem"),
                    ("box-shadow", "0 10px 25px rgba(0,0,0,0.2)"),
                    ("font-size", "0.9rem"),
                    ("z-index", "1000"),
                    ("opacity", "0"),
                    ("transform", "scale(0.8)"),
                    ("transition", transition("all", "0.3s", BOUNCE).as_str()),
                    ("pointer-events", "none"),
                    ("max-width", "200px"),
                ]),
                shown: styles(&[("opacity", "1"), ("transform", "scale(1)")]),
            },
            services: vec![
                ServiceInfo::new(
                    "core",
                    "ServiceNow Platform",
                    "Complete enterprise service management ecosystem",
                ),
                ServiceInfo::new(
                    "itsm",
                    "ITSM Suite",
                    "IT Service Management with intelligent automation",
                ),
                ServiceInfo::new(
                    "itom",
                    "ITOM Operations",
                    "IT Operations Management with AIOps",
                ),
                ServiceInfo::new(
                    "spm",
                    "SPM Portfolio",
                    "Strategic Portfolio Management excellence",
                ),
                ServiceInfo::new(
                    "ai",
                    "AI Automation",
                    "Intelligent enterprise automation solutions",
                ),
            ],
            fallback: ServiceInfo::new(
                "",
                "Enterprise Solution",
                "Professional consulting services",
            ),
            showcase_template: ".service-showcase-card[data-service=\"{service}\"]".into(),
            scroll_offset: 100.0,
            scroll_duration_ms: 800.0,
            highlight_delay_ms: 400.0,
            highlight: styles(&[
                ("transform", "translateY(-12px) scale(1.03)"),
                ("box-shadow", "0 0 0 3px var(--brand-red)"),
                ("transition", transition("all", "0.4s", SPRING).as_str()),
            ]),
            unhighlight: styles(&[("transform", "translateY(0) scale(1)"), ("box-shadow", "")]),
        };

        let entrance = EntranceConfig {
            selectors: ".service-showcase-card, .metric-value, .contact-info-item, .section-intro"
                .into(),
            counters: ".metric-value".into(),
            threshold: 0.1,
            margin: RootMargin::bottom_px(-50.0),
            hidden: styles(&[
                ("opacity", "0"),
                ("transform", "translateY(30px)"),
                ("transition", transition("all", "0.8s", SMOOTH).as_str()),
            ]),
            visible: slide_in,
            visible_class: None,
            counter_duration_ms: COUNTER_DURATION_MS,
        };

        let mut form = form_base(
            "var(--teal)",
            "var(--teal)",
            SubmitStages {
                busy_html: r#"<i class="fas fa-satellite-dish"></i> Preparing consultation request..."#.into(),
                busy: tw("scale(0.98)"),
                launch_html: r#"<i class="fas fa-rocket"></i> Launching communication..."#.into(),
                launch: styles(&[(
                    "background",
                    "linear-gradient(135deg, var(--teal), var(--indigo))",
                )]),
                idle_html: r#"<i class="fas fa-paper-plane"></i> Request Strategic Consultation"#
                    .into(),
                idle: styles(&[("background", ""), ("transform", "scale(1)")]),
                delays_ms: [800.0, 1200.0, 1000.0],
            },
            FormMessages {
                missing: "Please complete all required fields to proceed with your consultation request.".into(),
                invalid_email: "Please enter a valid email address so our team can reach you.".into(),
                success: "Your consultation request is ready! We'll respond within 24 hours with strategic insights. \u{1F680}".into(),
            },
            MailTemplate {
                address: "ck@digiconsult.ca".into(),
                subject_label: "Enterprise Consultation Request".into(),
                optional_fields: vec![("company".into(), "Company".into())],
                signature: Some("Submitted via DigiConsult contact form".into()),
                timestamp: true,
            },
        );
        form.first_focus = tw("scale(1.02) translateY(-2px)");
        form.first_focus_release = tw("scale(1) translateY(0)");
        form.focus = styles(&[
            ("border-color", "var(--brand-red)"),
            ("box-shadow", "0 0 0 3px rgba(229, 62, 62, 0.1)"),
        ]);
        form.blur = styles(&[("border-color", ""), ("box-shadow", "")]);

        let secret = SecretMode {
            sequence: SERVICENOW_CODE.to_vec(),
            message: "\u{1F389} Enterprise Excellence Mode Activated! ServiceNow specialists appreciate attention to detail!".into(),
            effects: vec![
                SecretEffect {
                    selector: ".service-orb".into(),
                    stagger_ms: 200.0,
                    styles: Styles::new(),
                    animation: Some("enterprise-pulse 2s ease-in-out infinite".into()),
                    animation_delay_step_s: Some(0.3),
                },
                SecretEffect {
                    selector: ".service-showcase-card".into(),
                    stagger_ms: 0.0,
                    styles: styles(&[
                        ("border", "2px solid var(--gold)"),
                        ("box-shadow", "0 25px 50px -12px rgba(214, 158, 46, 0.2)"),
                    ]),
                    animation: None,
                    animation_delay_step_s: None,
                },
            ],
        };

        let white = "white";
        let notices = NoticeTheme {
            class_name: "elegant-notification".into(),
            base: styles(&[
                ("position", "fixed"),
                ("top", "2rem"),
                ("right", "2rem"),
                ("max-width", "400px"),
                ("padding", "1.5rem"),
                ("border-radius", "1rem"),
                ("box-shadow", "0 25px 50px -12px rgba(0, 0, 0, 0.25)"),
                ("z-index", "10000"),
                ("transition", transition("all", "0.4s", BOUNCE).as_str()),
                ("font-family", "var(--font-primary)"),
                ("font-weight", "500"),
                ("backdrop-filter", "blur(10px)"),
            ]),
            hidden: styles(&[
                ("opacity", "0"),
                ("transform", "translateX(100%) scale(0.8)"),
            ]),
            shown: styles(&[("opacity", "1"), ("transform", "translateX(0) scale(1)")]),
            row: styles(&[
                ("display", "flex"),
                ("align-items", "center"),
                ("gap", "1rem"),
            ]),
            icon: styles(&[("font-size", "1.25rem")]),
            text: styles(&[("flex", "1")]),
            palette: NoticePalette {
                success: NoticeColors::new("linear-gradient(135deg, #10B981, #059669)", white, None),
                warning: NoticeColors::new("linear-gradient(135deg, #F59E0B, #D97706)", white, None),
                error: NoticeColors::new("linear-gradient(135deg, #EF4444, #DC2626)", white, None),
                info: NoticeColors::new("linear-gradient(135deg, #3B82F6, #2563EB)", white, None),
            },
            close_button: false,
            enter_delay_ms: NOTICE_ENTER_DELAY_MS,
            dismiss_after_ms: NOTICE_DISMISS_AFTER_MS,
            exit_ms: 400.0,
        };

        SiteConfig {
            variant: Variant::Elegant,
            stylesheet: crate::styles::ELEGANT_CSS,
            nav,
            sections: Some(sections),
            hero,
            hover,
            cursor: CursorRule {
                selector: "a, button, .service-orb, .service-showcase-card".into(),
                on_element: true,
            },
            ripples,
            confetti: Self::confetti_style(&["#E53E3E", "#16A085", "#D69E2E", "#4F46E5", "#3B82F6"]),
            confetti_on_click: Vec::new(),
            pulses: Vec::new(),
            drift: Some(DriftRule {
                selector: ".service-orb".into(),
                period_ms: ORB_DRIFT_PERIOD_MS,
                amplitude_px: ORB_DRIFT_PX,
                hold_ms: ORB_DRIFT_HOLD_MS,
            }),
            constellation: Some(constellation),
            entrance,
            lazy_backgrounds: Some(LazyBackgrounds {
                selector: "[data-bg]".into(),
                attribute: "data-bg".into(),
            }),
            parallax: Some(ParallaxConfig {
                selector: ".hero".into(),
                rate: -0.3,
            }),
            form,
            secret,
            notices,
            loading: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names() {
        assert_eq!("Elegant".parse::<Variant>().ok(), Some(Variant::Elegant));
        assert_eq!("".parse::<Variant>().ok(), Some(Variant::Enhanced));
        assert!(matches!(
            "brutalist".parse::<Variant>(),
            Err(ConfigError::UnknownVariant(name)) if name == "brutalist"
        ));
    }

    #[test]
    fn variants_differ_where_expected() {
        let elegant = SiteConfig::for_variant(Variant::Elegant);
        let enhanced = SiteConfig::for_variant(Variant::Enhanced);
        assert_eq!(elegant.nav.anchor_offset, 80.0);
        assert_eq!(enhanced.nav.anchor_offset, 70.0);
        assert_eq!(elegant.nav.thresholds.hide_after, Some(200.0));
        assert_eq!(enhanced.nav.thresholds.hide_after, None);
        assert_eq!(elegant.form.stages.delays_ms, [800.0, 1200.0, 1000.0]);
        assert_eq!(enhanced.form.stages.delays_ms, [500.0, 1000.0, 1000.0]);
        assert!(elegant.constellation.is_some() && enhanced.constellation.is_none());
        assert_eq!(elegant.notices.exit_ms, 400.0);
        assert_eq!(enhanced.notices.exit_ms, 300.0);
    }

    #[test]
    fn unknown_service_uses_fallback() {
        let config = SiteConfig::elegant();
        let c = config.constellation.as_ref().map(|c| c.service("quantum").name.clone());
        assert_eq!(c.as_deref(), Some("Enterprise Solution"));
    }
}
