//! `mailto:` link construction for the contact form.
//!
//! Delivery is left to whatever mail client the OS opens for the link.

use crate::form::FormData;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MailTemplate {
    pub address: String,
    /// Middle part of the subject: "`service` - `label` from `name`".
    pub subject_label: String,
    /// Optional `(field, label)` lines placed after the email line when filled in.
    #[serde(default)]
    pub optional_fields: Vec<(String, String)>,
    /// Footer line separated from the message by `---`.
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub timestamp: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailDraft {
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    /// `mailto:<address>?subject=<encoded>&body=<encoded>`
    pub fn to_uri(&self, address: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            address,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Build subject and body from already validated form data.
pub fn compose(data: &FormData, template: &MailTemplate, now: DateTime<Utc>) -> MailDraft {
    let field = |name: &str| data.get(name).unwrap_or_default();
    let subject = format!(
        "{} - {} from {}",
        field("service"),
        template.subject_label,
        field("name")
    );

    let mut body = format!("Name: {}\nEmail: {}", field("name"), field("email"));
    for (name, label) in &template.optional_fields {
        if let Some(value) = data.get(name) {
            body.push_str(&format!("\n{label}: {value}"));
        }
    }
    body.push_str(&format!(
        "\nService Interest: {}\n\nMessage:\n{}",
        field("service"),
        field("message")
    ));

    if template.signature.is_some() || template.timestamp {
        body.push_str("\n\n---");
        if let Some(signature) = &template.signature {
            body.push('\n');
            body.push_str(signature);
        }
        if template.timestamp {
            body.push_str("\nTimestamp: ");
            body.push_str(&now.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }

    MailDraft { subject, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn jane() -> FormData {
        FormData::new()
            .with("name", "Jane")
            .with("email", "jane@x.com")
            .with("service", "ITSM")
            .with("message", "Hi")
    }

    fn plain() -> MailTemplate {
        MailTemplate {
            address: "ck@digiconsult.ca".into(),
            subject_label: "Consultation Request".into(),
            optional_fields: Vec::new(),
            signature: None,
            timestamp: false,
        }
    }

    #[test]
    fn plain_body_layout() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let d = compose(&jane(), &plain(), when);
        assert_eq!(d.subject, "ITSM - Consultation Request from Jane");
        assert_eq!(
            d.body,
            "Name: Jane\nEmail: jane@x.com\nService Interest: ITSM\n\nMessage:\nHi"
        );
    }

    #[test]
    fn company_line_and_timestamp_footer() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let template = MailTemplate {
            optional_fields: vec![("company".into(), "Company".into())],
            signature: Some("Submitted via DigiConsult contact form".into()),
            timestamp: true,
            ..plain()
        };
        let d = compose(&jane().with("company", "Acme"), &template, when);
        assert_eq!(
            d.body,
            "Name: Jane\nEmail: jane@x.com\nCompany: Acme\nService Interest: ITSM\n\nMessage:\nHi\n\n---\nSubmitted via DigiConsult contact form\nTimestamp: 2024-05-01T12:30:05.000Z"
        );
    }

    #[test]
    fn uri_is_percent_encoded() {
        let d = MailDraft {
            subject: "a b&c".into(),
            body: "x\ny".into(),
        };
        assert_eq!(
            d.to_uri("ck@digiconsult.ca"),
            "mailto:ck@digiconsult.ca?subject=a%20b%26c&body=x%0Ay"
        );
    }
}
