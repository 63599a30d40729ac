//! Batch linking — fans one normalized batch out across the stores.
//!
//! Pure orchestration with no state of its own. Ordering matters: people
//! must exist before events and activity can append to them, and segments
//! must exist before dated items can be bucketed into them.

use crate::config::SharedClock;
use crate::ingest::NormalizedBatch;
use crate::services::documents::DocumentIndex;
use crate::services::people::PersonIndex;
use crate::services::segments::SegmentIndex;
use crate::store::EntityStore;
use crate::types::{DriveActivity, Email};

/// Link one batch into the stores.
///
/// Known addresses are gathered from the batch's explicit list plus every
/// attendee and email correspondent, so each of them resolves to *some*
/// person before linking starts.
///
/// A batch carrying calendar events rebuilds the segment index from
/// scratch; a batch from some other provider links its dated items into
/// the segments already there.
pub fn link_batch(
    batch: NormalizedBatch,
    people: &mut PersonIndex,
    segments: &mut SegmentIndex,
    documents: &mut DocumentIndex,
    emails: &mut EntityStore<Email>,
    drive_activity: &mut EntityStore<DriveActivity>,
    clock: SharedClock,
) {
    let mut known_addresses = batch.email_addresses.clone();
    for event in &batch.calendar_events {
        known_addresses.extend(event.attendees.iter().map(|a| a.email.clone()));
    }
    for email in &batch.emails {
        known_addresses.push(email.from.clone());
        known_addresses.extend(email.to.iter().cloned());
    }

    people.add_contacts(batch.people);
    people.add_known_email_addresses(&known_addresses);

    if !batch.calendar_events.is_empty() {
        *segments = SegmentIndex::new(batch.calendar_events, clock);
        people.add_calendar_events(segments.records());
    }

    people.add_drive_activity(&batch.drive_activity);
    people.add_emails(&batch.emails);

    segments.add_emails(&batch.emails);
    segments.add_drive_activity(&batch.drive_activity);

    documents.upsert(batch.documents);
    emails.upsert(batch.emails);
    drive_activity.upsert(batch.drive_activity);
}
