//! Ingest boundary — raw provider batches normalized into internal types.
//!
//! Raw shapes mirror what collectors deliver: optional-heavy, camelCase
//! JSON. Normalization materializes defaults and applies the skip rules
//! (missing id → skip record; activity without a target link → drop;
//! events without a usable interval → drop; unparseable dates → skip the
//! record where the date is load-bearing). One bad record never blocks
//! the rest of its batch.

use serde::Deserialize;

use crate::error::EngineError;
use crate::types::{
    ActivityAction, Attendee, Document, DocumentType, DriveActivity, Email, Person,
    ResponseStatus, Segment, Task, WebsiteVisit, UNKNOWN_CONTRIBUTOR,
};
use crate::util::{normalize_email, parse_date};

// ============================================================================
// Raw shapes (as delivered by collectors)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBatch {
    pub people: Vec<RawPerson>,
    pub email_addresses: Vec<String>,
    pub calendar_events: Vec<RawCalendarEvent>,
    pub emails: Vec<RawEmail>,
    pub drive_activity: Vec<RawDriveActivity>,
    pub documents: Vec<RawDocument>,
    pub website_visits: Vec<RawWebsiteVisit>,
    pub tasks: Vec<RawTask>,
}

impl RawBatch {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPerson {
    pub id: String,
    pub name: Option<String>,
    pub email_address: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCalendarEvent {
    pub id: String,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub attendees: Vec<RawAttendee>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttendee {
    pub email: Option<String>,
    pub response_status: Option<String>,
    #[serde(rename = "self")]
    pub is_self: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEmail {
    pub id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub snippet: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub date: Option<String>,
    pub label_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDriveActivity {
    pub id: String,
    pub time: Option<String>,
    pub action: Option<String>,
    pub actor_person_id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDocument {
    pub id: String,
    pub name: Option<String>,
    pub link: Option<String>,
    pub updated_at: Option<String>,
    pub document_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWebsiteVisit {
    pub id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub visited_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTask {
    pub id: String,
    pub title: Option<String>,
    pub position: Option<f64>,
    pub parent: Option<String>,
    pub completed: Option<bool>,
    pub updated_at: Option<String>,
}

// ============================================================================
// Normalized batch
// ============================================================================

/// One fully-normalized ingestion batch, ready for the linker.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub people: Vec<Person>,
    pub email_addresses: Vec<String>,
    pub calendar_events: Vec<Segment>,
    pub emails: Vec<Email>,
    pub drive_activity: Vec<DriveActivity>,
    pub documents: Vec<Document>,
    pub website_visits: Vec<WebsiteVisit>,
    pub tasks: Vec<Task>,
}

pub fn normalize(raw: RawBatch) -> NormalizedBatch {
    NormalizedBatch {
        people: raw.people.into_iter().filter_map(normalize_person).collect(),
        email_addresses: raw
            .email_addresses
            .iter()
            .map(|a| normalize_email(a))
            .filter(|a| !a.is_empty())
            .collect(),
        calendar_events: raw
            .calendar_events
            .into_iter()
            .filter_map(normalize_event)
            .collect(),
        emails: raw.emails.into_iter().filter_map(normalize_raw_email).collect(),
        drive_activity: raw
            .drive_activity
            .into_iter()
            .filter_map(normalize_activity)
            .collect(),
        documents: raw
            .documents
            .into_iter()
            .filter_map(normalize_document)
            .collect(),
        website_visits: raw
            .website_visits
            .into_iter()
            .filter_map(normalize_visit)
            .collect(),
        tasks: raw.tasks.into_iter().filter_map(normalize_task).collect(),
    }
}

fn normalize_person(raw: RawPerson) -> Option<Person> {
    if raw.id.is_empty() {
        log::debug!("Skipping contact with no id");
        return None;
    }
    let email_address = raw.email_address.as_deref().map(normalize_email).unwrap_or_default();
    let name = match raw.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            if email_address.is_empty() {
                UNKNOWN_CONTRIBUTOR.to_string()
            } else {
                email_address.clone()
            }
        }
    };
    Some(Person {
        id: raw.id,
        email_address,
        name,
        image_url: raw.image_url.unwrap_or_default(),
        email_ids: Vec::new(),
        drive_activity_ids: Vec::new(),
        segment_ids: Vec::new(),
    })
}

fn normalize_event(raw: RawCalendarEvent) -> Option<Segment> {
    if raw.id.is_empty() {
        log::debug!("Skipping calendar event with no id");
        return None;
    }
    let (Some(start), Some(end)) = (
        raw.start.as_deref().and_then(parse_date),
        raw.end.as_deref().and_then(parse_date),
    ) else {
        log::debug!("Skipping calendar event {} without a usable interval", raw.id);
        return None;
    };

    let attendees: Vec<Attendee> = raw
        .attendees
        .into_iter()
        .filter_map(|a| {
            let email = normalize_email(a.email.as_deref()?);
            if email.is_empty() {
                return None;
            }
            Some(Attendee {
                email,
                response_status: ResponseStatus::from_provider(
                    a.response_status.as_deref().unwrap_or(""),
                ),
                is_self: a.is_self.unwrap_or(false),
            })
        })
        .collect();

    let self_response_status = attendees
        .iter()
        .find(|a| a.is_self)
        .map(|a| a.response_status)
        .unwrap_or(ResponseStatus::NeedsAction);

    Some(Segment {
        id: raw.id,
        start,
        end,
        summary: raw.summary.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        self_response_status,
        attendees,
        email_ids: Vec::new(),
        drive_activity_ids: Vec::new(),
    })
}

fn normalize_raw_email(raw: RawEmail) -> Option<Email> {
    if raw.id.is_empty() {
        log::debug!("Skipping email with no id");
        return None;
    }
    let Some(date) = raw.date.as_deref().and_then(parse_date) else {
        log::debug!("Skipping email {} with unparseable date", raw.id);
        return None;
    };
    Some(Email {
        thread_id: raw.thread_id.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        subject: raw.subject.unwrap_or_default(),
        snippet: raw.snippet.unwrap_or_default(),
        from: raw.from.as_deref().map(normalize_email).unwrap_or_default(),
        to: raw.to.iter().map(|a| normalize_email(a)).collect(),
        date,
        label_ids: raw.label_ids,
    })
}

fn normalize_activity(raw: RawDriveActivity) -> Option<DriveActivity> {
    if raw.id.is_empty() {
        log::debug!("Skipping drive activity with no id");
        return None;
    }
    let link = raw.link.unwrap_or_default();
    if link.is_empty() {
        log::debug!("Dropping drive activity {} without a target link", raw.id);
        return None;
    }
    let Some(time) = raw.time.as_deref().and_then(parse_date) else {
        log::debug!("Skipping drive activity {} with unparseable time", raw.id);
        return None;
    };
    Some(DriveActivity {
        id: raw.id,
        time,
        action: ActivityAction::from_provider(raw.action.as_deref().unwrap_or("")),
        actor_person_id: raw.actor_person_id.filter(|a| !a.is_empty()),
        title: raw.title.unwrap_or_default(),
        link,
    })
}

fn normalize_document(raw: RawDocument) -> Option<Document> {
    if raw.id.is_empty() {
        log::debug!("Skipping document with no id");
        return None;
    }
    let link = raw.link.unwrap_or_default();
    let mut document_type = DocumentType::from_link(&link);
    if document_type == DocumentType::Unknown {
        // Fall back to the collector's own tag when the link pattern
        // tells us nothing.
        document_type = match raw.document_type.as_deref() {
            Some("sheet") => DocumentType::Sheet,
            Some("slide") => DocumentType::Slide,
            Some("doc") => DocumentType::Doc,
            _ => DocumentType::Unknown,
        };
    }
    Some(Document {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        link,
        description: String::new(),
        updated_at: raw.updated_at.as_deref().and_then(parse_date),
        document_type,
    })
}

fn normalize_visit(raw: RawWebsiteVisit) -> Option<WebsiteVisit> {
    if raw.id.is_empty() {
        log::debug!("Skipping website visit with no id");
        return None;
    }
    let Some(visited_at) = raw.visited_at.as_deref().and_then(parse_date) else {
        log::debug!("Skipping website visit {} with unparseable time", raw.id);
        return None;
    };
    Some(WebsiteVisit {
        id: raw.id,
        url: raw.url.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        visited_at,
    })
}

fn normalize_task(raw: RawTask) -> Option<Task> {
    if raw.id.is_empty() {
        log::debug!("Skipping task with no id");
        return None;
    }
    Some(Task {
        id: raw.id,
        title: raw.title.unwrap_or_default(),
        position: raw.position.unwrap_or(0.0),
        parent_id: raw.parent.filter(|p| !p.is_empty()),
        completed: raw.completed.unwrap_or(false),
        updated_at: raw
            .updated_at
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
    })
}
