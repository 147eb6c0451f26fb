use std::fmt;

use serde::Deserialize;

/// Which of the three inputs the payload is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Url,
    Text,
    Contact,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Url => "url",
            Mode::Text => "text",
            Mode::Contact => "contact",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact fields for a vCard payload. All fields are optional; empty
/// strings stand in for missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
    pub url: String,
}

impl ContactRecord {
    /// The "has enough data" gate: a vCard is only produced once at least
    /// one identifying field is filled in. Organization or website alone
    /// is not enough.
    pub fn has_identity(&self) -> bool {
        !self.first_name.is_empty()
            || !self.last_name.is_empty()
            || !self.phone.is_empty()
            || !self.email.is_empty()
    }
}

/// Normalizes a raw URL field. Blank input yields an empty payload; input
/// without an `http://` or `https://` prefix gets `https://` prepended;
/// anything else passes through unchanged (an existing `http://` is never
/// upgraded).
pub fn format_url(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return format!("https://{raw}");
    }
    raw.to_string()
}

// vCard 3.0 text escaping (RFC 2426 §2.4.2): backslash, semicolon, comma,
// and newlines must be escaped in property values.
fn escape_vcard(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Renders a contact as a vCard 3.0 record. Missing fields appear as empty
/// values; the caller is expected to apply [`ContactRecord::has_identity`]
/// before encoding.
pub fn format_vcard(contact: &ContactRecord) -> String {
    let first = escape_vcard(&contact.first_name);
    let last = escape_vcard(&contact.last_name);
    format!(
        "BEGIN:VCARD\n\
         VERSION:3.0\n\
         CHARSET:UTF-8\n\
         FN:{first} {last}\n\
         N:{last};{first};;;\n\
         ORG:{org}\n\
         TEL:{tel}\n\
         EMAIL:{email}\n\
         URL:{url}\n\
         END:VCARD",
        org = escape_vcard(&contact.organization),
        tel = escape_vcard(&contact.phone),
        email = escape_vcard(&contact.email),
        url = escape_vcard(&contact.url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_url_blank_is_empty() {
        assert_eq!(format_url(""), "");
        assert_eq!(format_url("   "), "");
    }

    #[test]
    fn format_url_adds_https_when_scheme_missing() {
        assert_eq!(format_url("example.com"), "https://example.com");
    }

    #[test]
    fn format_url_keeps_existing_scheme() {
        assert_eq!(format_url("http://x.com"), "http://x.com");
        assert_eq!(format_url("https://x.com"), "https://x.com");
    }

    #[test]
    fn format_url_is_idempotent_on_its_output() {
        let once = format_url("example.com");
        assert_eq!(format_url(&once), once);
    }

    #[test]
    fn vcard_with_only_first_name() {
        let contact = ContactRecord {
            first_name: "Jane".into(),
            ..Default::default()
        };
        let card = format_vcard(&contact);
        assert!(card.starts_with("BEGIN:VCARD\nVERSION:3.0"));
        assert!(card.ends_with("END:VCARD"));
        assert!(card.contains("FN:Jane \n"));
        assert!(card.contains("N:;Jane;;;"));
        assert!(card.contains("ORG:\n"));
        assert!(card.contains("TEL:\n"));
        assert!(card.contains("EMAIL:\n"));
        assert!(card.contains("URL:\n"));
    }

    #[test]
    fn vcard_escapes_separators() {
        let contact = ContactRecord {
            first_name: "Jane".into(),
            organization: "Acme; Widgets, Inc".into(),
            ..Default::default()
        };
        let card = format_vcard(&contact);
        assert!(card.contains("ORG:Acme\\; Widgets\\, Inc"));
    }

    #[test]
    fn vcard_escapes_newlines() {
        let contact = ContactRecord {
            first_name: "Jane".into(),
            organization: "line one\nline two".into(),
            ..Default::default()
        };
        assert!(format_vcard(&contact).contains("ORG:line one\\nline two"));
    }

    #[test]
    fn vcard_is_pure() {
        let contact = ContactRecord {
            first_name: "Jane".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        };
        assert_eq!(format_vcard(&contact), format_vcard(&contact));
    }

    #[test]
    fn identity_gate() {
        let mut contact = ContactRecord::default();
        assert!(!contact.has_identity());
        contact.organization = "Acme".into();
        contact.url = "https://acme.example".into();
        assert!(!contact.has_identity());
        contact.phone = "+1 555 0100".into();
        assert!(contact.has_identity());
    }
}
