//! Normalized domain types.
//!
//! Everything here is produced by the ingest boundary (`crate::ingest`)
//! from raw provider records. Fields are fully populated: optional
//! provider fields have been defaulted or the record was dropped, so the
//! stores never branch on "is this field present".

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::store::Keyed;

/// Display name given to people whose source carries no name at all.
pub const UNKNOWN_CONTRIBUTOR: &str = "Unknown contributor";

/// Sort direction for ordered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

// ============================================================================
// People
// ============================================================================

/// A person unified across contacts, calendar attendees and activity actors.
///
/// Reachable by source id and by lowercase email through `PersonIndex`;
/// both keys resolve to the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    /// Lowercase, the canonical identity key.
    pub email_address: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    /// Back-references, appended during ingestion.
    #[serde(default)]
    pub email_ids: Vec<String>,
    #[serde(default)]
    pub drive_activity_ids: Vec<String>,
    #[serde(default)]
    pub segment_ids: Vec<String>,
}

impl Keyed for Person {
    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Document kind, derived from the link URL pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Sheet,
    Slide,
    Doc,
    Unknown,
}

fn document_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(spreadsheets|presentation|document)/").unwrap())
}

impl DocumentType {
    /// Classify a document by its link.
    ///
    /// Example: ".../spreadsheets/d/abc" → Sheet
    pub fn from_link(link: &str) -> Self {
        match document_type_re()
            .captures(link)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
        {
            Some("spreadsheets") => DocumentType::Sheet,
            Some("presentation") => DocumentType::Slide,
            Some("document") => DocumentType::Doc,
            _ => DocumentType::Unknown,
        }
    }
}

/// A drive document. Activity references documents by `link`, not `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub document_type: DocumentType,
}

impl Keyed for Document {
    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Segments (calendar meetings)
// ============================================================================

/// RSVP status, ours or an attendee's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

impl ResponseStatus {
    /// Parse the provider's RSVP string; anything unrecognized is NeedsAction.
    pub fn from_provider(value: &str) -> Self {
        match value {
            "accepted" => ResponseStatus::Accepted,
            "tentative" => ResponseStatus::Tentative,
            "declined" => ResponseStatus::Declined,
            _ => ResponseStatus::NeedsAction,
        }
    }
}

/// One attendee on a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Lowercase email.
    pub email: String,
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub is_self: bool,
}

/// A calendar meeting window `[start, end)` with derived back-references
/// to the email and drive activity that happened during it.
///
/// Immutable after construction except for back-reference appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub self_response_status: ResponseStatus,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Appended by `SegmentIndex::add_emails`; not de-duplicated here.
    #[serde(default)]
    pub email_ids: Vec<String>,
    /// Appended by `SegmentIndex::add_drive_activity`; not de-duplicated here.
    #[serde(default)]
    pub drive_activity_ids: Vec<String>,
}

impl Segment {
    /// Strict interior containment: boundary timestamps do not match.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start < instant && instant < self.end
    }
}

impl Keyed for Segment {
    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Email
// ============================================================================

/// A formatted email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    #[serde(default)]
    pub snippet: String,
    /// Lowercase sender address.
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub label_ids: Vec<String>,
}

impl Keyed for Email {
    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Drive activity
// ============================================================================

/// What an actor did to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityAction {
    Create,
    Edit,
    Comment,
    Unknown,
}

impl ActivityAction {
    pub fn from_provider(value: &str) -> Self {
        match value {
            "create" => ActivityAction::Create,
            "edit" => ActivityAction::Edit,
            "comment" => ActivityAction::Comment,
            _ => ActivityAction::Unknown,
        }
    }
}

/// One action on a drive document. Targets without links are dropped at
/// the ingest boundary, so `link` is always present here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveActivity {
    pub id: String,
    pub time: DateTime<Utc>,
    pub action: ActivityAction,
    pub actor_person_id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub link: String,
}

impl Keyed for DriveActivity {
    fn key(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Websites
// ============================================================================

/// An aggregated browsing-history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub url: String,
    pub title: String,
    pub last_visited: DateTime<Utc>,
    pub visit_count: u32,
}

impl Keyed for Website {
    fn key(&self) -> &str {
        &self.id
    }
}

/// One visit to a website — the dated occurrence the ranking engine scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteVisit {
    /// Site id, shared across visits to the same site.
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub visited_at: DateTime<Utc>,
}

// ============================================================================
// Tasks
// ============================================================================

/// A provider task, ordered by its float `position` rank key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub position: f64,
    pub parent_id: Option<String>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_from_link() {
        assert_eq!(
            DocumentType::from_link("https://docs.example.com/spreadsheets/d/abc/edit"),
            DocumentType::Sheet
        );
        assert_eq!(
            DocumentType::from_link("https://docs.example.com/presentation/d/abc"),
            DocumentType::Slide
        );
        assert_eq!(
            DocumentType::from_link("https://docs.example.com/document/d/abc"),
            DocumentType::Doc
        );
        assert_eq!(
            DocumentType::from_link("https://example.com/whatever"),
            DocumentType::Unknown
        );
    }

    #[test]
    fn test_response_status_from_provider() {
        assert_eq!(
            ResponseStatus::from_provider("accepted"),
            ResponseStatus::Accepted
        );
        assert_eq!(
            ResponseStatus::from_provider("declined"),
            ResponseStatus::Declined
        );
        assert_eq!(
            ResponseStatus::from_provider("something-new"),
            ResponseStatus::NeedsAction
        );
    }

    #[test]
    fn test_segment_contains_is_strict() {
        let start = "2026-02-08T09:00:00Z".parse().unwrap();
        let end = "2026-02-08T10:00:00Z".parse().unwrap();
        let segment = Segment {
            id: "s1".to_string(),
            start,
            end,
            summary: "Sync".to_string(),
            description: String::new(),
            self_response_status: ResponseStatus::Accepted,
            attendees: Vec::new(),
            email_ids: Vec::new(),
            drive_activity_ids: Vec::new(),
        };

        assert!(segment.contains("2026-02-08T09:30:00Z".parse().unwrap()));
        assert!(!segment.contains(start));
        assert!(!segment.contains(end));
        assert!(!segment.contains("2026-02-08T11:00:00Z".parse().unwrap()));
    }
}
