//! Shared helpers for identity keys and link keys.

use chrono::{DateTime, Utc};
use url::Url;

/// Canonical form of an email address used as an index key.
///
/// Example: " Foo@Bar.com " → "foo@bar.com"
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Convert a display name to a URL-safe kebab-case slug.
///
/// Example: "Acme Corp" → "acme-corp"
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Derive a person ID from an email address.
///
/// Used for placeholder people created from bare addresses, where the
/// provider gave us no source id.
///
/// Example: "sarah.chen@acme.com" → "sarah-chen-acme-com"
pub fn person_id_from_email(email: &str) -> String {
    slugify(&normalize_email(email))
}

/// Canonical form of a document/activity link used as an index key.
///
/// Drive activity references documents by link, and the two sides of the
/// join do not always agree on the scheme, so the key is the link with any
/// http(s) prefix removed.
pub fn link_key(link: &str) -> &str {
    let trimmed = link.trim();
    trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
}

/// Best-effort host name of a URL, for display fallbacks.
///
/// Example: "https://docs.example.com/page?x=1" → Some("docs.example.com")
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Parse a provider timestamp.
///
/// Accepts RFC3339 first, then the bare "YYYY-MM-DD HH:MM:SS" form some
/// collectors emit (treated as UTC). Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
