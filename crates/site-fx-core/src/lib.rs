//! Interaction and animation logic for the DigiConsult marketing site.
//!
//! Everything here is platform-free: the page is reached through the
//! [`Surface`] trait and time only moves when the host says so. The wasm
//! front end implements `Surface` over `web-sys`; tests use [`FakeSurface`].

pub mod action;
pub mod config;
pub mod constants;
pub mod controller;
pub mod counter;
pub mod easing;
pub mod effects;
pub mod fake;
pub mod form;
pub mod konami;
pub mod mailto;
pub mod notify;
pub mod observer;
pub mod scheduler;
pub mod scroll;
pub mod styles;
pub mod surface;

pub use action::Action;
pub use config::{ConfigError, ConfigOverrides, SiteConfig, Variant};
pub use controller::{Binding, Controller, DomEvent, EventInfo, Handled};
pub use easing::{ease_in_out_cubic, ScrollSample, SmoothScroll};
pub use fake::FakeSurface;
pub use form::{validate, FieldChange, FieldState, FormData, FormError};
pub use konami::KeySequence;
pub use mailto::{compose, MailDraft, MailTemplate};
pub use notify::NoticeKind;
pub use scheduler::{Scheduler, Sequence, SequenceId};
pub use surface::{NodeId, Rect, Styles, Surface, Viewport};
