// Contact form: field affordances, validation and the mailto submit pipeline.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use site_fx_core::form::FieldPhase;
use site_fx_core::{
    Binding, Controller, DomEvent, EventInfo, FakeSurface, FieldChange, FieldState, NodeId,
    SiteConfig, Surface,
};

struct ContactPage {
    surface: FakeSurface,
    form: NodeId,
    name: NodeId,
    email: NodeId,
    service: NodeId,
    message: NodeId,
    company: NodeId,
    button: NodeId,
}

fn contact_page() -> ContactPage {
    let mut s = FakeSurface::new();
    let body = s.body_id();
    let form = s.add(body, "form", &[("id", "contactForm")]);
    let mut field = |tag: &str, name: &str| {
        let group = s.add(form, "div", &[("class", "form-group")]);
        s.add(group, tag, &[("name", name)])
    };
    let name = field("input", "name");
    let email = field("input", "email");
    let company = field("input", "company");
    let service = field("select", "service");
    let message = field("textarea", "message");
    let button = s.add(form, "button", &[("type", "submit")]);
    ContactPage {
        surface: s,
        form,
        name,
        email,
        service,
        message,
        company,
        button,
    }
}

fn fill(page: &mut ContactPage, values: [&str; 4]) {
    page.surface.set_value(page.name, values[0]);
    page.surface.set_value(page.email, values[1]);
    page.surface.set_value(page.service, values[2]);
    page.surface.set_value(page.message, values[3]);
}

fn submit(c: &mut Controller<FakeSurface>, form: NodeId, now: f64) -> bool {
    c.handle(
        Binding {
            node: form,
            event: DomEvent::Submit,
        },
        &EventInfo::default(),
        now,
    )
    .prevent_default
}

fn fire(c: &mut Controller<FakeSurface>, node: NodeId, event: DomEvent, now: f64) {
    c.handle(Binding { node, event }, &EventInfo::default(), now);
}

fn group(c: &mut Controller<FakeSurface>, field: NodeId) -> NodeId {
    c.surface_mut().parent(field).unwrap_or(field)
}

/// Split a mailto URI into its address and decoded subject and body.
fn decode_mailto(uri: &str) -> (String, String, String) {
    let rest = uri.strip_prefix("mailto:").unwrap_or(uri);
    let (address, query) = rest.split_once('?').unwrap_or((rest, ""));
    let mut subject = String::new();
    let mut body = String::new();
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default();
        match key {
            "subject" => subject = value,
            "body" => body = value,
            _ => {}
        }
    }
    (address.to_string(), subject, body)
}

#[test]
fn empty_required_fields_warn_and_halt() {
    let mut page = contact_page();
    page.surface.set_value(page.name, "Jane");
    let (form, name, email, message) = (page.form, page.name, page.email, page.message);
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);

    assert!(submit(&mut c, form, 0.0));
    assert_eq!(c.surface_mut().count(".notification-warning"), 1);
    assert!(!c.is_submitting());

    let name_group = group(&mut c, name);
    let email_group = group(&mut c, email);
    let message_group = group(&mut c, message);
    assert!(!c.surface().has_class(name_group, "field-error"));
    assert!(c.surface().has_class(email_group, "field-error"));
    assert!(c.surface().has_class(message_group, "field-error"));

    // focusing the field clears its error mark
    fire(&mut c, email, DomEvent::Focus, 100.0);
    assert!(!c.surface().has_class(email_group, "field-error"));

    c.advance(10_000.0);
    assert!(c.surface().navigations().is_empty());
    assert_eq!(c.surface_mut().count(".notification-warning"), 0);
}

#[test]
fn whitespace_only_counts_as_missing() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "   "]);
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::elegant(), 3);
    c.start(0.0);
    submit(&mut c, form, 0.0);
    assert_eq!(c.surface_mut().count(".notification-warning"), 1);
    c.advance(5_000.0);
    assert!(c.surface().navigations().is_empty());
}

#[test]
fn invalid_email_warns_without_building_a_link() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane.x.com", "ITSM", "Hi"]);
    let (form, button) = (page.form, page.button);
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);

    submit(&mut c, form, 0.0);
    let text = c
        .surface_mut()
        .query(".notification-warning span")
        .map(|span| c.surface().text(span));
    assert_eq!(
        text.as_deref(),
        Some("Please enter a valid email address so we can reach you! \u{1F4E7}")
    );
    assert_eq!(c.surface_mut().count(".field-error"), 0);
    assert!(!c.surface().is_disabled(button));

    c.advance(5_000.0);
    assert!(c.surface().navigations().is_empty());
}

#[test]
fn valid_submit_runs_stages_then_opens_mail_client() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let (form, button, name) = (page.form, page.button, page.name);
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);

    assert!(submit(&mut c, form, 0.0));
    assert!(c.is_submitting());
    assert!(c.surface().is_disabled(button));
    assert_eq!(
        c.surface().html(button),
        Some(r#"<i class="fas fa-rocket"></i> Launching..."#)
    );

    c.advance(600.0);
    assert_eq!(
        c.surface().html(button),
        Some(r#"<i class="fas fa-check-circle"></i> Opening Email..."#)
    );
    c.advance(1400.0);
    assert!(c.surface().navigations().is_empty());

    c.advance(1600.0);
    assert_eq!(c.surface().navigations().len(), 1);
    let (address, subject, body) = decode_mailto(&c.surface().navigations()[0]);
    assert_eq!(address, "ck@digiconsult.ca");
    assert_eq!(subject, "ITSM - Consultation Request from Jane");
    assert_eq!(
        body,
        "Name: Jane\nEmail: jane@x.com\nService Interest: ITSM\n\nMessage:\nHi"
    );

    c.advance(2600.0);
    assert_eq!(c.surface_mut().count(".notification-success"), 1);
    assert_eq!(c.surface().value(name), "");
    assert!(!c.surface().is_disabled(button));
    assert_eq!(
        c.surface().html(button),
        Some(r#"<i class="fas fa-paper-plane"></i> Request Consultation"#)
    );
    assert!(!c.is_submitting());
}

#[test]
fn decoded_link_keeps_every_value_verbatim() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::elegant(), 3);
    c.start(0.0);
    submit(&mut c, form, 0.0);
    c.advance(2100.0);

    let uri = c.surface().navigations().first().cloned().unwrap_or_default();
    assert!(uri.starts_with("mailto:ck@digiconsult.ca?subject="));
    assert!(!uri.contains(' '));
    let (_, subject, body) = decode_mailto(&uri);
    for value in ["Jane", "jane@x.com", "ITSM", "Hi"] {
        assert!(subject.contains(value) || body.contains(value), "{value}");
    }
}

#[test]
fn elegant_body_carries_company_and_timestamp() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi & bye"]);
    page.surface.set_value(page.company, "Acme");
    page.surface.set_clock(
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .unwrap_or_default(),
    );
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::elegant(), 3);
    c.start(0.0);
    submit(&mut c, form, 0.0);

    // elegant stages: 800 + 1200
    c.advance(1900.0);
    assert!(c.surface().navigations().is_empty());
    c.advance(2100.0);

    let (_, subject, body) = decode_mailto(&c.surface().navigations()[0]);
    assert_eq!(subject, "ITSM - Enterprise Consultation Request from Jane");
    assert_eq!(
        body,
        "Name: Jane\nEmail: jane@x.com\nCompany: Acme\nService Interest: ITSM\n\n\
         Message:\nHi & bye\n\n---\nSubmitted via DigiConsult contact form\n\
         Timestamp: 2025-03-14T09:26:53.000Z"
    );
}

#[test]
fn second_submit_while_running_is_ignored() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);
    submit(&mut c, form, 0.0);
    submit(&mut c, form, 100.0);
    c.advance(4_000.0);
    assert_eq!(c.surface().navigations().len(), 1);
    assert_eq!(c.surface_mut().count(".notification-success"), 1);
}

#[test]
fn cancelled_submit_never_navigates() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let (form, button) = (page.form, page.button);
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);
    submit(&mut c, form, 0.0);
    c.advance(700.0);

    assert!(c.cancel_submit());
    assert!(!c.cancel_submit());
    assert!(!c.surface().is_disabled(button));
    c.advance(4_000.0);
    assert!(c.surface().navigations().is_empty());
    assert_eq!(c.surface_mut().count(".notification-success"), 0);
}

#[test]
fn field_focus_blur_cycle() {
    let page = contact_page();
    let name = page.name;
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);
    let g = group(&mut c, name);

    fire(&mut c, name, DomEvent::Focus, 10.0);
    assert!(c.surface().has_class(g, "focused"));
    assert!(c.field_state(name).is_some_and(|f| f.phase() == FieldPhase::Focused));
    assert_eq!(c.surface().style(name, "transform").as_deref(), Some("scale(1.02)"));
    c.advance(300.0);
    assert_eq!(c.surface().style(name, "transform").as_deref(), Some("scale(1)"));

    c.surface_mut().set_value(name, "   ");
    fire(&mut c, name, DomEvent::Blur, 400.0);
    assert!(!c.surface().has_class(g, "focused"));
    assert!(!c.surface().has_class(g, "completed"));
    assert_eq!(c.surface().children(g).len(), 1);

    // second focus does not bounce again
    c.surface_mut().set_style(name, "transform", "");
    fire(&mut c, name, DomEvent::Focus, 500.0);
    assert_eq!(c.surface().style(name, "transform"), None);

    c.surface_mut().set_value(name, "Jane");
    fire(&mut c, name, DomEvent::Blur, 600.0);
    assert!(c.surface().has_class(g, "completed"));
    assert_eq!(c.surface().children(g).len(), 2);
    assert!(c.field_state(name).is_some_and(|f| f.is_completed()));

    c.advance(2_700.0);
    assert_eq!(c.surface().children(g).len(), 1);
}

#[test]
fn input_tints_border_while_filled() {
    let page = contact_page();
    let email = page.email;
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);

    c.surface_mut().set_value(email, "j");
    fire(&mut c, email, DomEvent::Input, 10.0);
    assert_eq!(
        c.surface().style(email, "border-color").as_deref(),
        Some("#16A085")
    );
    c.surface_mut().set_value(email, "");
    fire(&mut c, email, DomEvent::Input, 20.0);
    assert_eq!(c.surface().style(email, "border-color"), None);
}

#[test]
fn field_state_machine() {
    let mut f = FieldState::default();
    assert_eq!(f.focus(), FieldChange::Focused { first: true });
    assert_eq!(f.blur(" x "), FieldChange::Completed);
    assert_eq!(f.focus(), FieldChange::Focused { first: false });
    assert_eq!(f.blur("\t"), FieldChange::Cleared);
    f.reset();
    assert!(f.has_been_focused());
    assert!(!f.is_completed());
}

#[test]
fn success_toast_from_a_timer_hands_over_its_close_listener() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);
    assert!(submit(&mut c, form, 0.0));
    assert!(c.take_bindings().is_empty());

    c.advance(2600.0);
    assert_eq!(c.surface_mut().count(".notification-success"), 1);
    let fresh = c.take_bindings();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].event, DomEvent::Click);

    // expiry gives the same listener back for detaching
    c.advance(9_000.0);
    assert_eq!(c.surface_mut().count(".notification-success"), 0);
    assert_eq!(c.take_released(), fresh);
}

#[test]
fn one_late_frame_catches_up_on_a_whole_submit() {
    let mut page = contact_page();
    fill(&mut page, ["Jane", "jane@x.com", "ITSM", "Hi"]);
    let form = page.form;
    let mut c = Controller::new(page.surface, SiteConfig::enhanced(), 3);
    c.start(0.0);
    assert!(submit(&mut c, form, 0.0));
    assert!(c.next_due_ms().is_some_and(|due| due <= 60_000.0));

    // a background tab: no frames until long after every deadline
    c.frame(60_000.0);
    assert_eq!(c.surface().navigations().len(), 1);
    assert!(!c.is_submitting());
    // the toast came and went inside that frame, so there is nothing to wire
    assert_eq!(c.surface_mut().count(".notification-success"), 0);
    assert!(c.take_bindings().is_empty());
    assert!(c.take_released().is_empty());
}
