//! Timing and sizing constants shared by both site variants.
//!
//! Variant-specific values live in [`crate::config::SiteConfig`]; these are
//! the ones the two variants never disagreed on.

// Simulated frame cadence when the host steps time in bulk
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

// Key buffer for the secret-mode trigger
pub const KEY_BUFFER_LEN: usize = 10;

// Counter tween cadence (one update per ~frame)
pub const COUNTER_TICK_MS: f64 = 16.0;
pub const COUNTER_DURATION_MS: f64 = 2000.0;

// Notifications
pub const NOTICE_ENTER_DELAY_MS: f64 = 100.0; // lets the hidden style paint first
pub const NOTICE_DISMISS_AFTER_MS: f64 = 5000.0;

// Click bursts
pub const CONFETTI_COUNT: usize = 12;
pub const CONFETTI_SIZE_PX: f32 = 10.0;
pub const CONFETTI_LIFETIME_MS: f64 = 1000.0;
pub const CONFETTI_MIN_VELOCITY: f32 = 50.0;
pub const CONFETTI_VELOCITY_SPREAD: f32 = 50.0;

// Form feedback
pub const FIELD_CHECKMARK_ENTER_MS: f64 = 100.0;
pub const FIELD_CHECKMARK_LIFETIME_MS: f64 = 2000.0;
pub const FIRST_FOCUS_BOUNCE_MS: f64 = 200.0;

// Navigation
pub const NAV_PRESS_MS: f64 = 100.0;
pub const NAV_TOGGLE_DELAY_MS: f64 = 150.0;
pub const NAV_MENU_FADE_IN_DELAY_MS: f64 = 50.0;

// Hover overlays
pub const TOOLTIP_ENTER_DELAY_MS: f64 = 50.0;
pub const TOOLTIP_GAP_PX: f32 = 10.0;
pub const CONNECTION_THICKNESS_PX: f32 = 2.0;

// Loading overlay shown for outbound links to the site's own tools
pub const LOADING_OVERLAY_MS: f64 = 2000.0;

// Ambient orb drift (elegant)
pub const ORB_DRIFT_PERIOD_MS: f64 = 4000.0;
pub const ORB_DRIFT_HOLD_MS: f64 = 2000.0;
pub const ORB_DRIFT_PX: f32 = 2.0;

// Service card highlight after a constellation click
pub const CARD_HIGHLIGHT_MS: f64 = 1500.0;
