//! The interaction controller.
//!
//! One instance owns every piece of per-page state: scroll tracking, the key
//! buffer, field states, observers, counters and the timer queue. The host
//! feeds it DOM events, key presses and animation frames, always with the
//! current time in milliseconds; nothing in here reads a clock of its own.
//!
//! Event listeners are described as [`Binding`]s. [`Controller::start`] returns
//! the initial set and [`Controller::take_bindings`] hands over any added later
//! (for example the close button of a notification). Bindings whose element
//! is gone come back through [`Controller::take_released`] so the host can
//! drop their listeners.

use crate::action::Action;
use crate::config::{ConfigError, SiteConfig};
use crate::constants::{
    CARD_HIGHLIGHT_MS, COUNTER_TICK_MS, FIRST_FOCUS_BOUNCE_MS, FRAME_INTERVAL_MS, NAV_PRESS_MS,
    NAV_TOGGLE_DELAY_MS,
};
use crate::counter::CounterTween;
use crate::easing::SmoothScroll;
use crate::effects;
use crate::form::{validate, FieldChange, FieldState, FormData, FormError};
use crate::konami::KeySequence;
use crate::mailto;
use crate::notify::{self, NoticeKind};
use crate::observer::{RootMargin, VisibilityObserver};
use crate::scheduler::{Scheduler, Sequence, SequenceId};
use crate::scroll::{parallax_shift, NavScroll};
use crate::surface::{NodeId, Styles, Surface};
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
    Input,
    Submit,
}

impl DomEvent {
    /// Event type name as passed to `addEventListener`.
    pub fn name(self) -> &'static str {
        match self {
            DomEvent::Click => "click",
            DomEvent::MouseEnter => "mouseenter",
            DomEvent::MouseLeave => "mouseleave",
            DomEvent::Focus => "focus",
            DomEvent::Blur => "blur",
            DomEvent::Input => "input",
            DomEvent::Submit => "submit",
        }
    }
}

/// One listener the host must attach: `event` on `node`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub node: NodeId,
    pub event: DomEvent,
}

/// The parts of a DOM event the controller looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventInfo {
    pub client_x: f32,
    pub client_y: f32,
    /// The event target is an `<a>` or sits inside one.
    pub inside_link: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handled {
    pub prevent_default: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    NavLink,
    NavToggle,
    Hover(usize),
    Cursor,
    Track,
    Ripple(usize),
    Confetti(usize),
    Orb,
    Field,
    Submit,
    LoadingLink,
    NoticeClose(NodeId),
}

pub struct Controller<S: Surface> {
    surface: S,
    config: SiteConfig,
    scheduler: Scheduler<Action>,
    rng: StdRng,
    nav: NavScroll,
    smooth: Option<SmoothScroll>,
    keys: KeySequence,
    fields: FnvHashMap<NodeId, FieldState>,
    entrance: VisibilityObserver,
    counter_nodes: FnvHashSet<NodeId>,
    counters: FnvHashMap<NodeId, CounterTween>,
    sections: Option<VisibilityObserver>,
    lazy: Option<VisibilityObserver>,
    routes: FnvHashMap<Binding, SmallVec<[Role; 4]>>,
    bindings: Vec<Binding>,
    fresh: Vec<Binding>,
    released: Vec<Binding>,
    /// Close-button binding of each notice still on the page.
    notice_closers: FnvHashMap<NodeId, Binding>,
    hovered: FnvHashSet<NodeId>,
    navbar: Option<NodeId>,
    menu: Option<NodeId>,
    toggle: Option<NodeId>,
    parallax_target: Option<NodeId>,
    form: Option<NodeId>,
    submit_button: Option<NodeId>,
    submit_run: Option<SequenceId>,
    last_frame_ms: Option<f64>,
}

impl<S: Surface> Controller<S> {
    /// `seed` drives the confetti randomness.
    pub fn new(surface: S, config: SiteConfig, seed: u64) -> Self {
        let entrance = VisibilityObserver::new(
            config.entrance.threshold,
            config.entrance.margin,
            true,
        );
        let sections = config
            .sections
            .as_ref()
            .map(|s| VisibilityObserver::new(s.threshold, s.margin, false));
        let lazy = config
            .lazy_backgrounds
            .as_ref()
            .map(|_| VisibilityObserver::new(0.0, RootMargin::default(), true));
        let nav = NavScroll::new(surface.scroll_y());
        let keys = KeySequence::new(&config.secret.sequence);
        Self {
            surface,
            config,
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            nav,
            smooth: None,
            keys,
            fields: FnvHashMap::default(),
            entrance,
            counter_nodes: FnvHashSet::default(),
            counters: FnvHashMap::default(),
            sections,
            lazy,
            routes: FnvHashMap::default(),
            bindings: Vec::new(),
            fresh: Vec::new(),
            released: Vec::new(),
            notice_closers: FnvHashMap::default(),
            hovered: FnvHashSet::default(),
            navbar: None,
            menu: None,
            toggle: None,
            parallax_target: None,
            form: None,
            submit_button: None,
            submit_run: None,
            last_frame_ms: None,
        }
    }

    /// Build from the page's variant attribute and optional JSON overrides.
    pub fn from_page(
        surface: S,
        variant_attr: Option<&str>,
        overrides_json: Option<&str>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = SiteConfig::load(variant_attr, overrides_json)?;
        Ok(Self::new(surface, config, seed))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Timers still queued, including ambient pulses.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_run
            .is_some_and(|id| self.scheduler.is_running(id))
    }

    pub fn field_state(&self, field: NodeId) -> Option<FieldState> {
        self.fields.get(&field).copied()
    }

    /// Inject the stylesheet, prepare every element and return the listeners to attach.
    pub fn start(&mut self, now_ms: f64) -> Vec<Binding> {
        self.scheduler.settle(now_ms);
        self.surface.inject_stylesheet(self.config.stylesheet);

        self.wire_nav();
        self.wire_hero();
        self.wire_hover();
        self.wire_pulses();
        self.wire_drift();
        self.wire_constellation();
        self.wire_entrance();
        self.wire_sections();
        self.wire_lazy_backgrounds();
        self.wire_form();
        self.wire_loading_links();

        if let Some(p) = &self.config.parallax {
            self.parallax_target = self.surface.query(&p.selector);
        }

        log::info!(
            "site-fx started ({} variant): {} listeners",
            self.config.variant,
            self.bindings.len()
        );
        self.take_bindings()
    }

    /// Listeners registered since the last call.
    pub fn take_bindings(&mut self) -> Vec<Binding> {
        std::mem::take(&mut self.fresh)
    }

    /// Listeners whose element has left the page since the last call.
    pub fn take_released(&mut self) -> Vec<Binding> {
        std::mem::take(&mut self.released)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.scheduler.next_due_ms()
    }

    /// Every listener currently registered.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Dispatch one DOM event. Timers due before `now_ms` run first.
    pub fn handle(&mut self, binding: Binding, info: &EventInfo, now_ms: f64) -> Handled {
        self.run_timers(now_ms);
        let Some(roles) = self.routes.get(&binding).cloned() else {
            return Handled::default();
        };
        let node = binding.node;
        match binding.event {
            DomEvent::MouseEnter => {
                self.hovered.insert(node);
            }
            DomEvent::MouseLeave => {
                self.hovered.remove(&node);
            }
            _ => {}
        }

        let mut handled = Handled::default();
        for role in roles {
            match (role, binding.event) {
                (Role::NavLink, DomEvent::Click) => {
                    handled.prevent_default |= self.on_nav_link(node);
                }
                (Role::NavToggle, DomEvent::Click) => {
                    self.surface.set_styles(node, &self.config.nav.toggle_press);
                    self.scheduler.after(NAV_TOGGLE_DELAY_MS, Action::ToggleMenu);
                }
                (Role::Hover(i), DomEvent::MouseEnter) => self.hover_enter(i, node),
                (Role::Hover(i), DomEvent::MouseLeave) => self.hover_leave(i, node),
                (Role::Cursor, DomEvent::MouseEnter) => {
                    if let Some(body) = self.surface.body() {
                        self.surface.set_style(body, "cursor", "pointer");
                    }
                    if self.config.cursor.on_element {
                        self.surface.set_style(node, "cursor", "pointer");
                    }
                }
                (Role::Cursor, DomEvent::MouseLeave) => {
                    if let Some(body) = self.surface.body() {
                        self.surface.set_style(body, "cursor", "default");
                    }
                }
                (Role::Ripple(i), DomEvent::Click) => {
                    let click = Vec2::new(info.client_x, info.client_y);
                    effects::spawn_ripple(
                        &mut self.surface,
                        &mut self.scheduler,
                        node,
                        click,
                        &self.config.ripples[i].style,
                    );
                }
                (Role::Confetti(i), DomEvent::Click) => {
                    if !(self.config.confetti_on_click[i].skip_inside_links && info.inside_link) {
                        self.confetti(node);
                    }
                }
                (Role::Orb, DomEvent::MouseEnter) => self.orb_enter(node),
                (Role::Orb, DomEvent::MouseLeave) => self.orb_leave(node),
                (Role::Orb, DomEvent::Click) => self.orb_click(node),
                (Role::Field, DomEvent::Focus) => self.field_focus(node),
                (Role::Field, DomEvent::Blur) => self.field_blur(node),
                (Role::Field, DomEvent::Input) => self.field_input(node),
                (Role::Submit, DomEvent::Submit) => {
                    handled.prevent_default = true;
                    self.submit();
                }
                (Role::LoadingLink, DomEvent::Click) => self.loading_link(node),
                (Role::NoticeClose(notice), DomEvent::Click) => {
                    self.surface.remove(notice);
                    self.release_notice(notice);
                }
                _ => {}
            }
        }
        handled
    }

    /// Note a scroll event; the work happens in the next frame. Returns
    /// `true` if this call scheduled that frame.
    pub fn on_scroll(&mut self) -> bool {
        self.nav.request_frame()
    }

    /// Feed one key-down. Returns `true` if it completed the secret sequence.
    pub fn on_key_down(&mut self, key_code: u32, now_ms: f64) -> bool {
        self.run_timers(now_ms);
        if !self.keys.push(key_code) {
            return false;
        }
        self.activate_secret_mode();
        true
    }

    /// One animation frame: timers, smooth scroll, navbar, parallax, observers.
    pub fn frame(&mut self, now_ms: f64) {
        self.last_frame_ms = Some(now_ms);
        self.run_timers(now_ms);

        if let Some(scroll) = self.smooth {
            let sample = scroll.sample(now_ms);
            self.surface.scroll_to(sample.y);
            if sample.finished {
                self.smooth = None;
            }
            self.nav.request_frame();
        }

        if self.nav.frame_scheduled() {
            self.scroll_frame();
        }

        self.poll_observers();
    }

    /// Step frames at display rate up to `now_ms`, ending with a frame at `now_ms`.
    pub fn advance(&mut self, now_ms: f64) {
        let mut t = self.last_frame_ms.unwrap_or(self.scheduler.now_ms());
        while t + FRAME_INTERVAL_MS < now_ms {
            t += FRAME_INTERVAL_MS;
            self.frame(t);
        }
        self.frame(now_ms);
    }

    /// Show a toast. Returns its node, or `None` without a `<body>`.
    pub fn show_notification(&mut self, message: &str, kind: NoticeKind) -> Option<NodeId> {
        let notice = notify::show(
            &mut self.surface,
            &mut self.scheduler,
            &self.config.notices,
            message,
            kind,
        )?;
        if let Some(close) = notice.close {
            self.bind(close, DomEvent::Click, Role::NoticeClose(notice.node));
            let binding = Binding {
                node: close,
                event: DomEvent::Click,
            };
            self.notice_closers.insert(notice.node, binding);
        }
        Some(notice.node)
    }

    /// Start an eased scroll from the current offset to `target_y`.
    pub fn smooth_scroll_to(&mut self, target_y: f32, duration_ms: f64) {
        let start = self.surface.scroll_y();
        self.smooth = Some(SmoothScroll::new(
            start,
            target_y,
            self.scheduler.now_ms(),
            duration_ms,
        ));
    }

    /// Abort a submit that has not finished yet and put the button back.
    pub fn cancel_submit(&mut self) -> bool {
        let Some(id) = self.submit_run.take() else {
            return false;
        };
        let cancelled = self.scheduler.cancel(id);
        if cancelled {
            self.restore_submit_button();
            log::debug!("submit sequence cancelled");
        }
        cancelled
    }

    fn bind(&mut self, node: NodeId, event: DomEvent, role: Role) {
        let binding = Binding { node, event };
        let roles = self.routes.entry(binding).or_insert_with(|| {
            self.bindings.push(binding);
            self.fresh.push(binding);
            SmallVec::new()
        });
        if !roles.contains(&role) {
            roles.push(role);
        }
    }

    /// Forget the close-button route of a notice that left the page.
    fn release_notice(&mut self, notice: NodeId) {
        let Some(binding) = self.notice_closers.remove(&notice) else {
            return;
        };
        self.routes.remove(&binding);
        self.bindings.retain(|b| *b != binding);
        let pending = self.fresh.len();
        self.fresh.retain(|b| *b != binding);
        // never handed to the host, so nothing to detach
        if self.fresh.len() == pending {
            self.released.push(binding);
        }
    }

    fn run_timers(&mut self, now_ms: f64) {
        while let Some(action) = self.scheduler.pop_due(now_ms) {
            self.apply(action);
        }
        self.scheduler.settle(now_ms);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Style { node, styles } => self.surface.set_styles(node, &styles),
            Action::AddClass { node, class } => self.surface.add_class(node, &class),
            Action::RemoveClass { node, class } => self.surface.remove_class(node, &class),
            Action::SetClassName { node, class_name } => {
                self.surface.set_class_name(node, &class_name)
            }
            Action::Remove(node) => {
                self.surface.remove(node);
                self.release_notice(node);
            }
            Action::Html { node, html } => self.surface.set_html(node, &html),
            Action::Disable { node, disabled } => self.surface.set_disabled(node, disabled),
            Action::Navigate(url) => {
                log::info!("opening mail client");
                self.surface.navigate(&url);
            }
            Action::Notify { message, kind } => {
                self.show_notification(&message, kind);
            }
            Action::ResetForm => self.reset_form(),
            Action::Confetti(node) => self.confetti(node),
            Action::ScrollToNode {
                target,
                offset,
                duration_ms,
            } => {
                let y = (self.surface.offset_top(target) - offset).max(0.0);
                self.smooth_scroll_to(y, duration_ms);
            }
            Action::CounterTick(node) => {
                if let Some(tween) = self.counters.get_mut(&node) {
                    let frame = tween.step();
                    self.surface.set_text(node, &frame.text);
                    if frame.done {
                        self.counters.remove(&node);
                    } else {
                        self.scheduler.after(COUNTER_TICK_MS, Action::CounterTick(node));
                    }
                }
            }
            Action::Pulse {
                rule,
                node,
                period_ms,
            } => {
                let Some(pulse) = self.config.pulses.get(rule) else {
                    return;
                };
                if !self.hovered.contains(&node) {
                    self.surface.set_styles(node, &pulse.pulse);
                    self.scheduler
                        .after(pulse.hold_ms, Action::style(node, &pulse.rest));
                }
                self.scheduler.after(
                    period_ms,
                    Action::Pulse {
                        rule,
                        node,
                        period_ms,
                    },
                );
            }
            Action::Drift => self.drift(),
            Action::Undrift { node, suffix } => {
                if let Some(transform) = self.surface.style(node, "transform") {
                    let restored = transform.replacen(&suffix, "", 1);
                    self.surface.set_style(node, "transform", &restored);
                }
            }
            Action::CloseMenu => self.close_menu(),
            Action::ToggleMenu => self.toggle_menu(),
            Action::HighlightCard(card) => {
                if let Some(c) = &self.config.constellation {
                    self.surface.set_styles(card, &c.highlight);
                    self.scheduler
                        .after(CARD_HIGHLIGHT_MS, Action::style(card, &c.unhighlight));
                }
            }
        }
    }

    fn wire_nav(&mut self) {
        let nav = &self.config.nav;
        self.navbar = self.surface.query(&nav.navbar);
        self.menu = self.surface.query(&nav.menu);
        self.toggle = self.surface.query(&nav.toggle);
        if self.navbar.is_none() {
            log::debug!("no navbar matching {:?}", nav.navbar);
        }
        let links = self.surface.query_all(&nav.links);
        for link in links {
            self.bind(link, DomEvent::Click, Role::NavLink);
        }
        if let Some(toggle) = self.toggle {
            self.bind(toggle, DomEvent::Click, Role::NavToggle);
        }
    }

    fn wire_hero(&mut self) {
        for rule in &self.config.hero {
            let mut nodes = self.surface.query_all(&rule.selector);
            if rule.single {
                nodes.truncate(1);
            }
            for (i, node) in nodes.into_iter().enumerate() {
                self.scheduler.after(
                    rule.delay_ms + i as f64 * rule.step_ms,
                    Action::style(node, &rule.styles),
                );
            }
        }
    }

    fn wire_hover(&mut self) {
        for i in 0..self.config.hover.len() {
            let nodes = self.surface.query_all(&self.config.hover[i].selector);
            for node in nodes {
                self.bind(node, DomEvent::MouseEnter, Role::Hover(i));
                self.bind(node, DomEvent::MouseLeave, Role::Hover(i));
            }
        }
        let cursor = self.surface.query_all(&self.config.cursor.selector);
        for node in cursor {
            self.bind(node, DomEvent::MouseEnter, Role::Cursor);
            self.bind(node, DomEvent::MouseLeave, Role::Cursor);
        }
        for i in 0..self.config.ripples.len() {
            let nodes = self.surface.query_all(&self.config.ripples[i].selector);
            for node in nodes {
                self.bind(node, DomEvent::Click, Role::Ripple(i));
            }
        }
        for i in 0..self.config.confetti_on_click.len() {
            let nodes = self
                .surface
                .query_all(&self.config.confetti_on_click[i].selector);
            for node in nodes {
                self.bind(node, DomEvent::Click, Role::Confetti(i));
            }
        }
    }

    fn wire_pulses(&mut self) {
        for r in 0..self.config.pulses.len() {
            let nodes = self.surface.query_all(&self.config.pulses[r].selector);
            for (i, node) in nodes.into_iter().enumerate() {
                let rule = &self.config.pulses[r];
                let period_ms = rule.period_ms + i as f64 * rule.period_step_ms;
                let first = rule.start_ms + i as f64 * rule.start_step_ms + period_ms;
                self.scheduler.after(
                    first,
                    Action::Pulse {
                        rule: r,
                        node,
                        period_ms,
                    },
                );
                self.bind(node, DomEvent::MouseEnter, Role::Track);
                self.bind(node, DomEvent::MouseLeave, Role::Track);
            }
        }
    }

    fn wire_drift(&mut self) {
        if let Some(rule) = &self.config.drift {
            self.scheduler.after(rule.period_ms, Action::Drift);
        }
    }

    fn drift(&mut self) {
        let Some(rule) = &self.config.drift else {
            return;
        };
        for node in self.surface.query_all(&rule.selector) {
            if self.hovered.contains(&node) {
                continue;
            }
            let offset: f32 = if rule.amplitude_px > 0.0 {
                self.rng.gen_range(-rule.amplitude_px..rule.amplitude_px)
            } else {
                0.0
            };
            let transform = self.surface.style(node, "transform").unwrap_or_default();
            let nudge = format!("translateY({offset:.2}px)");
            let suffix = if transform.is_empty() {
                nudge
            } else {
                format!(" {nudge}")
            };
            self.surface
                .set_style(node, "transform", &format!("{transform}{suffix}"));
            self.scheduler
                .after(rule.hold_ms, Action::Undrift { node, suffix });
        }
        self.scheduler.after(rule.period_ms, Action::Drift);
    }

    fn wire_constellation(&mut self) {
        let Some(c) = &self.config.constellation else {
            return;
        };
        let orbs = self.surface.query_all(&c.orbs);
        for orb in orbs {
            self.bind(orb, DomEvent::MouseEnter, Role::Orb);
            self.bind(orb, DomEvent::MouseLeave, Role::Orb);
            self.bind(orb, DomEvent::Click, Role::Orb);
        }
    }

    fn wire_entrance(&mut self) {
        let cfg = &self.config.entrance;
        let nodes = self.surface.query_all(&cfg.selectors);
        for node in nodes {
            if !cfg.hidden.is_empty() {
                self.surface.set_styles(node, &cfg.hidden);
            }
            if self.surface.matches(node, &cfg.counters) {
                self.counter_nodes.insert(node);
            }
            self.entrance.observe(node);
        }
    }

    fn wire_sections(&mut self) {
        let (Some(cfg), Some(observer)) = (&self.config.sections, self.sections.as_mut()) else {
            return;
        };
        for section in self.surface.query_all(&cfg.sections) {
            observer.observe(section);
        }
    }

    fn wire_lazy_backgrounds(&mut self) {
        let (Some(cfg), Some(observer)) = (&self.config.lazy_backgrounds, self.lazy.as_mut())
        else {
            return;
        };
        for node in self.surface.query_all(&cfg.selector) {
            observer.observe(node);
        }
    }

    fn wire_form(&mut self) {
        let cfg = &self.config.form;
        let Some(form) = self.surface.query(&cfg.form) else {
            log::debug!("no contact form matching {:?}", cfg.form);
            return;
        };
        self.form = Some(form);
        self.submit_button = self
            .surface
            .query_within(form, &cfg.submit_button)
            .into_iter()
            .next();
        let fields = self.surface.query_within(form, &cfg.fields);
        for field in fields {
            self.fields.entry(field).or_default();
            self.bind(field, DomEvent::Focus, Role::Field);
            self.bind(field, DomEvent::Blur, Role::Field);
            self.bind(field, DomEvent::Input, Role::Field);
        }
        self.bind(form, DomEvent::Submit, Role::Submit);
    }

    fn wire_loading_links(&mut self) {
        let Some(cfg) = &self.config.loading else {
            return;
        };
        let links = self.surface.query_all(&cfg.links);
        for link in links {
            self.bind(link, DomEvent::Click, Role::LoadingLink);
        }
    }

    fn scroll_frame(&mut self) {
        let y = self.surface.scroll_y();
        let cfg = &self.config.nav;
        let update = self.nav.on_frame(y, &cfg.thresholds);
        if let Some(navbar) = self.navbar {
            if update.scrolled {
                self.surface.add_class(navbar, &cfg.scrolled_class);
            } else {
                self.surface.remove_class(navbar, &cfg.scrolled_class);
            }
            match update.hidden {
                Some(true) => self.surface.set_styles(navbar, &cfg.hidden),
                Some(false) => self.surface.set_styles(navbar, &cfg.shown),
                None => {}
            }
        }

        if let (Some(hero), Some(p)) = (self.parallax_target, &self.config.parallax) {
            let height = self.surface.viewport().height;
            if let Some(shift) = parallax_shift(y, height, p.rate) {
                self.surface
                    .set_style(hero, "transform", &format!("translateY({shift}px)"));
            }
        }
    }

    fn poll_observers(&mut self) {
        for node in self.entrance.poll(&self.surface) {
            let cfg = &self.config.entrance;
            if !cfg.visible.is_empty() {
                self.surface.set_styles(node, &cfg.visible);
            }
            if let Some(class) = &cfg.visible_class {
                self.surface.add_class(node, class);
            }
            if self.counter_nodes.contains(&node) {
                let text = self.surface.text(node);
                if let Some(tween) =
                    CounterTween::from_text(&text, cfg.counter_duration_ms, COUNTER_TICK_MS)
                {
                    self.counters.insert(node, tween);
                    self.scheduler
                        .after(COUNTER_TICK_MS, Action::CounterTick(node));
                }
            }
        }

        if let (Some(observer), Some(cfg)) = (self.sections.as_mut(), &self.config.sections) {
            for section in observer.poll(&self.surface) {
                let Some(id) = self.surface.attribute(section, "id") else {
                    continue;
                };
                for link in self.surface.query_all(&self.config.nav.links) {
                    self.surface.remove_class(link, &cfg.active_class);
                }
                let selector = cfg.link_template.replace("{id}", &id);
                if let Some(link) = self.surface.query(&selector) {
                    self.surface.add_class(link, &cfg.active_class);
                }
            }
        }

        if let (Some(observer), Some(cfg)) = (self.lazy.as_mut(), &self.config.lazy_backgrounds) {
            for node in observer.poll(&self.surface) {
                if let Some(url) = self.surface.attribute(node, &cfg.attribute) {
                    self.surface
                        .set_style(node, "background-image", &format!("url({url})"));
                }
            }
        }
    }

    fn on_nav_link(&mut self, link: NodeId) -> bool {
        let Some(href) = self.surface.attribute(link, "href") else {
            return false;
        };
        if !href.starts_with('#') {
            return false;
        }
        let Some(target) = self.surface.query(&href) else {
            log::debug!("nav link points at missing section {href}");
            return true;
        };
        let nav = &self.config.nav;
        self.surface.set_styles(link, &nav.press);
        self.scheduler.run(
            Sequence::new()
                .then(NAV_PRESS_MS, Action::style(link, &nav.release))
                .then(
                    0.0,
                    Action::ScrollToNode {
                        target,
                        offset: nav.anchor_offset,
                        duration_ms: nav.scroll_duration_ms,
                    },
                )
                .then(0.0, Action::CloseMenu),
        );
        true
    }

    fn close_menu(&mut self) {
        let Some(menu) = self.menu else {
            return;
        };
        let nav = &self.config.nav;
        if !self.surface.has_class(menu, &nav.menu_active_class) {
            return;
        }
        self.surface.set_styles(menu, &nav.menu_hidden);
        self.scheduler.run(
            Sequence::new()
                .then(
                    nav.menu_close_ms,
                    Action::RemoveClass {
                        node: menu,
                        class: nav.menu_active_class.clone(),
                    },
                )
                .then(0.0, Action::style(menu, &nav.menu_shown)),
        );
    }

    fn toggle_menu(&mut self) {
        let nav = &self.config.nav;
        if let Some(menu) = self.menu {
            let active = self.surface.has_class(menu, &nav.menu_active_class);
            match &nav.menu_animation {
                None if active => self.surface.remove_class(menu, &nav.menu_active_class),
                None => self.surface.add_class(menu, &nav.menu_active_class),
                Some(anim) => {
                    let icon = self
                        .toggle
                        .and_then(|t| self.surface.query_within(t, "i").into_iter().next());
                    self.surface.set_styles(menu, &nav.menu_hidden);
                    if active {
                        if let Some(icon) = icon {
                            self.surface.set_class_name(icon, &anim.closed_icon);
                        }
                        self.scheduler.run(
                            Sequence::new()
                                .then(
                                    anim.close_ms,
                                    Action::RemoveClass {
                                        node: menu,
                                        class: nav.menu_active_class.clone(),
                                    },
                                )
                                .then(0.0, Action::style(menu, &nav.menu_shown)),
                        );
                    } else {
                        self.surface.add_class(menu, &nav.menu_active_class);
                        if let Some(icon) = icon {
                            self.surface.set_class_name(icon, &anim.open_icon);
                        }
                        self.scheduler
                            .after(anim.open_delay_ms, Action::style(menu, &nav.menu_shown));
                    }
                }
            }
        }
        if let Some(toggle) = self.toggle {
            self.surface.set_styles(toggle, &nav.toggle_release);
        }
    }

    fn hover_enter(&mut self, rule: usize, node: NodeId) {
        let rule = &self.config.hover[rule];
        if !rule.enter.is_empty() {
            self.surface.set_styles(node, &rule.enter);
        }
        for child in &rule.children {
            let mut nodes = self.surface.query_within(node, &child.selector);
            if child.single {
                nodes.truncate(1);
            }
            for (i, n) in nodes.into_iter().enumerate() {
                if child.stagger_ms > 0.0 {
                    self.scheduler
                        .after(i as f64 * child.stagger_ms, Action::style(n, &child.enter));
                } else {
                    self.surface.set_styles(n, &child.enter);
                }
            }
        }
    }

    fn hover_leave(&mut self, rule: usize, node: NodeId) {
        let rule = &self.config.hover[rule];
        if !rule.leave.is_empty() {
            self.surface.set_styles(node, &rule.leave);
        }
        for child in &rule.children {
            let mut nodes = self.surface.query_within(node, &child.selector);
            if child.single {
                nodes.truncate(1);
            }
            for n in nodes {
                self.surface.set_styles(n, &child.leave);
            }
        }
    }

    fn orb_enter(&mut self, orb: NodeId) {
        let Some(c) = &self.config.constellation else {
            return;
        };
        self.surface.set_styles(orb, &c.enter);
        let orbs = self.surface.query_all(&c.orbs);
        effects::spawn_connections(
            &mut self.surface,
            orb,
            &orbs,
            &c.connection_class,
            &c.connection,
        );
        let key = self.surface.attribute(orb, "data-service").unwrap_or_default();
        let info = c.service(&key);
        effects::spawn_tooltip(
            &mut self.surface,
            &mut self.scheduler,
            orb,
            &info.name,
            &info.description,
            &c.tooltip,
        );
    }

    /// Connections and tooltips go immediately, whatever is still pending for them.
    fn orb_leave(&mut self, orb: NodeId) {
        let Some(c) = &self.config.constellation else {
            return;
        };
        self.surface.set_styles(orb, &c.leave);
        effects::clear(&mut self.surface, &format!(".{}", c.connection_class));
        effects::clear(&mut self.surface, &format!(".{}", c.tooltip.class_name));
    }

    fn orb_click(&mut self, orb: NodeId) {
        let Some(c) = &self.config.constellation else {
            return;
        };
        let key = self.surface.attribute(orb, "data-service").unwrap_or_default();
        let selector = c.showcase_template.replace("{service}", &key);
        if let Some(card) = self.surface.query(&selector) {
            let y = self.surface.offset_top(card) - c.scroll_offset;
            let (duration, delay) = (c.scroll_duration_ms, c.highlight_delay_ms);
            self.smooth_scroll_to(y.max(0.0), duration);
            self.scheduler.after(delay, Action::HighlightCard(card));
        }
        self.confetti(orb);
    }

    fn field_focus(&mut self, field: NodeId) {
        let change = self.fields.entry(field).or_default().focus();
        let cfg = &self.config.form;
        if let Some(group) = self.surface.parent(field) {
            self.surface.add_class(group, &cfg.focused_class);
            self.surface.remove_class(group, &cfg.error_class);
        }
        if matches!(change, FieldChange::Focused { first: true }) && !cfg.first_focus.is_empty() {
            self.surface.set_styles(field, &cfg.first_focus);
            self.scheduler.after(
                FIRST_FOCUS_BOUNCE_MS,
                Action::style(field, &cfg.first_focus_release),
            );
        }
        if !cfg.focus.is_empty() {
            self.surface.set_styles(field, &cfg.focus);
        }
    }

    fn field_blur(&mut self, field: NodeId) {
        let value = self.surface.value(field);
        let change = self.fields.entry(field).or_default().blur(&value);
        let group = self.surface.parent(field);
        let cfg = &self.config.form;
        if !cfg.blur.is_empty() {
            self.surface.set_styles(field, &cfg.blur);
        }
        let Some(group) = group else {
            return;
        };
        self.surface.remove_class(group, &cfg.focused_class);
        match change {
            FieldChange::Completed => {
                self.surface.add_class(group, &cfg.completed_class);
                effects::spawn_checkmark(
                    &mut self.surface,
                    &mut self.scheduler,
                    field,
                    &cfg.checkmark_color,
                );
            }
            FieldChange::Cleared => self.surface.remove_class(group, &cfg.completed_class),
            FieldChange::Focused { .. } => {}
        }
    }

    fn field_input(&mut self, field: NodeId) {
        let filled = !self.surface.value(field).trim().is_empty();
        let color = if filled {
            self.config.form.filled_border.as_str()
        } else {
            ""
        };
        self.surface.set_style(field, "border-color", color);
    }

    fn collect_form(&mut self, form: NodeId) -> FormData {
        let mut data = FormData::new();
        for node in self.surface.query_within(form, "[name]") {
            if let Some(name) = self.surface.attribute(node, "name") {
                let value = self.surface.value(node);
                data.insert(&name, &value);
            }
        }
        data
    }

    fn submit(&mut self) {
        let Some(form) = self.form else {
            return;
        };
        if self.is_submitting() {
            log::debug!("submit ignored while a previous one is still running");
            return;
        }
        let data = self.collect_form(form);
        let cfg = &self.config.form;
        if let Err(err) = validate(&data, &cfg.required, &cfg.email_field) {
            log::warn!("contact form rejected: {err}");
            let message = match &err {
                FormError::MissingFields(names) => {
                    let message = cfg.messages.missing.clone();
                    self.mark_missing(form, names);
                    message
                }
                FormError::InvalidEmail(_) => cfg.messages.invalid_email.clone(),
            };
            self.show_notification(&message, NoticeKind::Warning);
            return;
        }

        let draft = mailto::compose(&data, &cfg.mail, self.surface.wall_clock());
        let uri = draft.to_uri(&cfg.mail.address);
        log::info!("contact form accepted: {}", draft.subject);

        let stages = &cfg.stages;
        let [to_launch, to_navigate, to_reset] = stages.delays_ms;
        let mut seq = Sequence::new();
        if let Some(button) = self.submit_button {
            self.surface.set_html(button, &stages.busy_html);
            self.surface.set_styles(button, &stages.busy);
            self.surface.set_disabled(button, true);
            seq = seq
                .then(
                    to_launch,
                    Action::Html {
                        node: button,
                        html: stages.launch_html.clone(),
                    },
                )
                .then(0.0, Action::style(button, &stages.launch))
                .then(to_navigate, Action::Navigate(uri));
        } else {
            seq = seq.then(to_launch + to_navigate, Action::Navigate(uri));
        }
        seq = seq
            .then(
                to_reset,
                Action::Notify {
                    message: cfg.messages.success.clone(),
                    kind: NoticeKind::Success,
                },
            )
            .then(0.0, Action::ResetForm);
        if let Some(button) = self.submit_button {
            seq = seq.then(0.0, Action::Confetti(button));
        }
        self.submit_run = Some(self.scheduler.run(seq));
    }

    fn mark_missing(&mut self, form: NodeId, names: &[String]) {
        for name in names {
            let selector = format!("[name=\"{name}\"]");
            for field in self.surface.query_within(form, &selector) {
                if let Some(group) = self.surface.parent(field) {
                    self.surface.add_class(group, &self.config.form.error_class);
                }
            }
        }
    }

    fn reset_form(&mut self) {
        let Some(form) = self.form else {
            return;
        };
        self.surface.reset_form(form);
        let cfg = &self.config.form;
        let fields: Vec<NodeId> = self.fields.keys().copied().collect();
        for field in fields {
            if let Some(group) = self.surface.parent(field) {
                for class in [&cfg.focused_class, &cfg.completed_class, &cfg.error_class] {
                    self.surface.remove_class(group, class);
                }
            }
            self.surface.set_style(field, "border-color", "");
            if let Some(state) = self.fields.get_mut(&field) {
                state.reset();
            }
        }
        self.restore_submit_button();
        self.submit_run = None;
    }

    fn restore_submit_button(&mut self) {
        let Some(button) = self.submit_button else {
            return;
        };
        let stages = &self.config.form.stages;
        self.surface.set_html(button, &stages.idle_html);
        self.surface.set_styles(button, &stages.idle);
        self.surface.set_disabled(button, false);
    }

    fn loading_link(&mut self, link: NodeId) {
        let Some(cfg) = &self.config.loading else {
            return;
        };
        let href = self.surface.attribute(link, "href").unwrap_or_default();
        if href.contains(&cfg.href_contains) {
            effects::spawn_loading_overlay(
                &mut self.surface,
                &mut self.scheduler,
                &cfg.message,
                cfg.lifetime_ms,
            );
        }
    }

    fn confetti(&mut self, origin: NodeId) {
        effects::spawn_confetti(
            &mut self.surface,
            &mut self.scheduler,
            &mut self.rng,
            origin,
            &self.config.confetti,
        );
    }

    fn activate_secret_mode(&mut self) {
        log::info!("secret mode activated");
        let message = self.config.secret.message.clone();
        self.show_notification(&message, NoticeKind::Success);
        for effect in &self.config.secret.effects {
            let nodes = self.surface.query_all(&effect.selector);
            for (i, node) in nodes.into_iter().enumerate() {
                let mut styles: Styles = effect.styles.clone();
                if let Some(animation) = &effect.animation {
                    let value = match effect.animation_delay_step_s {
                        Some(step) => format!("{animation} {:.1}s", i as f32 * step),
                        None => animation.clone(),
                    };
                    styles.push(("animation".to_string(), value));
                }
                if effect.stagger_ms > 0.0 {
                    self.scheduler.after(
                        i as f64 * effect.stagger_ms,
                        Action::Style { node, styles },
                    );
                } else {
                    self.surface.set_styles(node, &styles);
                }
            }
        }
    }
}
