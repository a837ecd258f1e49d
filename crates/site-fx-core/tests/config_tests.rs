// Variant selection and JSON overrides as the page provides them.

use pretty_assertions::assert_eq;
use site_fx_core::{ConfigError, ConfigOverrides, Controller, FakeSurface, SiteConfig, Variant};

#[test]
fn attribute_selects_variant() {
    let elegant = SiteConfig::load(Some("elegant"), None).map(|c| c.variant);
    assert_eq!(elegant.ok(), Some(Variant::Elegant));
    let fallback = SiteConfig::load(None, None).map(|c| c.variant);
    assert_eq!(fallback.ok(), Some(Variant::Enhanced));
    let blank = SiteConfig::load(Some("  "), Some("   ")).map(|c| c.variant);
    assert_eq!(blank.ok(), Some(Variant::Enhanced));
}

#[test]
fn unknown_variant_is_an_error() {
    let err = SiteConfig::load(Some("retro"), None).err();
    assert!(matches!(err, Some(ConfigError::UnknownVariant(name)) if name == "retro"));
}

#[test]
fn json_variant_wins_over_attribute() {
    let config = SiteConfig::load(Some("enhanced"), Some(r#"{"variant": "elegant"}"#));
    assert_eq!(config.map(|c| c.variant).ok(), Some(Variant::Elegant));
}

#[test]
fn overrides_replace_scalar_tunables() {
    let json = r#"{
        "anchor_offset": 40,
        "scrolled_after": 10,
        "hide_after": 500,
        "mail_address": "hello@example.com",
        "notice_dismiss_ms": 2500,
        "submit_delays_ms": [10, 20, -5],
        "entrance_threshold": 4.0,
        "secret_sequence": [72, 73],
        "parallax_rate": -0.5
    }"#;
    let Ok(config) = SiteConfig::load(Some("elegant"), Some(json)) else {
        panic!("overrides should parse");
    };
    assert_eq!(config.nav.anchor_offset, 40.0);
    assert_eq!(config.nav.thresholds.scrolled_after, 10.0);
    assert_eq!(config.nav.thresholds.hide_after, Some(500.0));
    assert_eq!(config.form.mail.address, "hello@example.com");
    assert_eq!(config.notices.dismiss_after_ms, 2500.0);
    // negative delays clamp to zero, thresholds to [0, 1]
    assert_eq!(config.form.stages.delays_ms, [10.0, 20.0, 0.0]);
    assert_eq!(config.entrance.threshold, 1.0);
    assert_eq!(config.secret.sequence, vec![72, 73]);
    assert_eq!(config.parallax.map(|p| p.rate), Some(-0.5));
}

#[test]
fn untouched_fields_keep_variant_defaults() {
    let overrides = ConfigOverrides {
        anchor_offset: Some(12.0),
        ..ConfigOverrides::default()
    };
    let config = SiteConfig::enhanced().with_overrides(&overrides);
    let defaults = SiteConfig::enhanced();
    assert_eq!(config.nav.anchor_offset, 12.0);
    assert_eq!(config.form, defaults.form);
    assert_eq!(config.notices, defaults.notices);
    assert_eq!(config.nav.thresholds, defaults.nav.thresholds);
}

#[test]
fn unknown_keys_and_bad_json_are_rejected() {
    assert!(matches!(
        ConfigOverrides::from_json(r#"{"anchor_ofset": 3}"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        SiteConfig::load(None, Some("{not json")),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn controller_from_page_uses_loaded_config() {
    let c = Controller::from_page(
        FakeSurface::new(),
        Some("elegant"),
        Some(r#"{"mail_address": "x@y.z"}"#),
        1,
    );
    let Ok(c) = c else {
        panic!("config should load");
    };
    assert_eq!(c.config().variant, Variant::Elegant);
    assert_eq!(c.config().form.mail.address, "x@y.z");
}
