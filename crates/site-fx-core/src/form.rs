//! Contact form field states and submit validation.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
}

/// Where a single field sits in its focus/blur cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldPhase {
    #[default]
    BlurredEmpty,
    Focused,
    BlurredFilled,
}

/// Outcome of a focus change, telling the caller which affordances to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldChange {
    /// Focused; `first` is set only the very first time.
    Focused { first: bool },
    Completed,
    Cleared,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldState {
    phase: FieldPhase,
    has_been_focused: bool,
}

impl FieldState {
    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == FieldPhase::BlurredFilled
    }

    pub fn has_been_focused(&self) -> bool {
        self.has_been_focused
    }

    pub fn focus(&mut self) -> FieldChange {
        let first = !self.has_been_focused;
        self.has_been_focused = true;
        self.phase = FieldPhase::Focused;
        FieldChange::Focused { first }
    }

    /// Leave the field; only the trimmed value counts as content.
    pub fn blur(&mut self, value: &str) -> FieldChange {
        if value.trim().is_empty() {
            self.phase = FieldPhase::BlurredEmpty;
            FieldChange::Cleared
        } else {
            self.phase = FieldPhase::BlurredFilled;
            FieldChange::Completed
        }
    }

    /// Forget focus and completion; the "focused once" memory survives a reset.
    pub fn reset(&mut self) {
        self.phase = FieldPhase::BlurredEmpty;
    }
}

/// Named values collected from the form at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Later values for the same name replace earlier ones.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Value for `name`, or `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Check presence of every required field, then the email shape.
pub fn validate(data: &FormData, required: &[String], email_field: &str) -> Result<(), FormError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| data.get(name).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(FormError::MissingFields(missing));
    }
    let email = data.get(email_field).unwrap_or_default();
    if !is_valid_email(email) {
        return Err(FormError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<String> {
        ["name", "email", "service", "message"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn field_cycle() {
        let mut f = FieldState::default();
        assert_eq!(f.focus(), FieldChange::Focused { first: true });
        assert_eq!(f.blur("  "), FieldChange::Cleared);
        assert_eq!(f.phase(), FieldPhase::BlurredEmpty);
        assert_eq!(f.focus(), FieldChange::Focused { first: false });
        assert_eq!(f.blur(" Jane "), FieldChange::Completed);
        assert!(f.is_completed());
        f.reset();
        assert_eq!(f.phase(), FieldPhase::BlurredEmpty);
        assert!(f.has_been_focused());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("ja ne@x.com"));
    }

    #[test]
    fn missing_fields_reported_in_order() {
        let data = FormData::new().with("name", "Jane").with("service", "  ");
        assert_eq!(
            validate(&data, &required(), "email"),
            Err(FormError::MissingFields(vec![
                "email".into(),
                "service".into(),
                "message".into()
            ]))
        );
    }

    #[test]
    fn email_checked_after_presence() {
        let data = FormData::new()
            .with("name", "Jane")
            .with("email", "not-an-email")
            .with("service", "ITSM")
            .with("message", "Hi");
        assert_eq!(
            validate(&data, &required(), "email"),
            Err(FormError::InvalidEmail("not-an-email".into()))
        );
    }
}
