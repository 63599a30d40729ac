//! People service — identity resolution across contacts, calendar
//! attendees and drive-activity actors.
//!
//! One owned `Person` record lives in the id-keyed store; the email index
//! maps normalized addresses to ids. An update through either key is
//! visible through the other because both resolve to the same record.

use crate::store::EntityStore;
use crate::types::{DriveActivity, Person, Segment, UNKNOWN_CONTRIBUTOR};
use crate::util::{normalize_email, person_id_from_email};

#[derive(Debug, Default)]
pub struct PersonIndex {
    store: EntityStore<Person>,
    /// normalized email → person id
    by_email: std::collections::HashMap<String, String>,
}

impl PersonIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest contact records. Creates or overwrites by source id, keyed
    /// by lowercased email as well.
    pub fn add_contacts(&mut self, people: Vec<Person>) {
        for person in people {
            if person.id.is_empty() {
                log::debug!("Skipping contact with empty id");
                continue;
            }
            if !person.email_address.is_empty() {
                self.by_email
                    .insert(person.email_address.clone(), person.id.clone());
            }
            self.store.upsert_one(person);
        }
    }

    /// Guarantee every known address resolves to *some* person.
    ///
    /// Addresses with no existing record get a placeholder whose display
    /// name is the address itself and whose id is derived from it.
    pub fn add_known_email_addresses<S: AsRef<str>>(&mut self, addresses: &[S]) {
        for address in addresses {
            let email = normalize_email(address.as_ref());
            if email.is_empty() || self.by_email.contains_key(&email) {
                continue;
            }
            let placeholder = Person {
                id: person_id_from_email(&email),
                email_address: email.clone(),
                name: email.clone(),
                image_url: String::new(),
                email_ids: Vec::new(),
                drive_activity_ids: Vec::new(),
                segment_ids: Vec::new(),
            };
            self.by_email.insert(email, placeholder.id.clone());
            self.store.upsert_one(placeholder);
        }
    }

    /// Append each event to every attendee that resolves to a person.
    /// Unmatched attendees are skipped.
    pub fn add_calendar_events(&mut self, events: &[Segment]) {
        for event in events {
            for attendee in &event.attendees {
                let Some(id) = self.by_email.get(&normalize_email(&attendee.email)).cloned()
                else {
                    continue;
                };
                if let Some(person) = self.store.get_mut(&id) {
                    person.segment_ids.push(event.id.clone());
                }
            }
        }
    }

    /// Append activity to the actor's person record.
    ///
    /// Activity whose actor id matches no person is dropped: actor ids are
    /// opaque provider ids with no email, so a record created from one
    /// could never be reached through the email index.
    pub fn add_drive_activity(&mut self, activities: &[DriveActivity]) {
        for activity in activities {
            let Some(actor_id) = activity.actor_person_id.as_deref() else {
                continue;
            };
            match self.store.get_mut(actor_id) {
                Some(person) => person.drive_activity_ids.push(activity.id.clone()),
                None => {
                    log::debug!(
                        "Dropping drive activity {} with unknown actor {}",
                        activity.id,
                        actor_id
                    );
                }
            }
        }
    }

    /// Append each email to its correspondents (sender and recipients).
    pub fn add_emails(&mut self, emails: &[crate::types::Email]) {
        for email in emails {
            let mut addresses: Vec<&str> = vec![email.from.as_str()];
            addresses.extend(email.to.iter().map(|a| a.as_str()));
            for address in addresses {
                let Some(id) = self.by_email.get(&normalize_email(address)).cloned() else {
                    continue;
                };
                if let Some(person) = self.store.get_mut(&id) {
                    person.email_ids.push(email.id.clone());
                }
            }
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Person> {
        self.store.get(id)
    }

    /// Case-insensitive email lookup.
    pub fn get_by_email(&self, email: &str) -> Option<&Person> {
        self.by_email
            .get(&normalize_email(email))
            .and_then(|id| self.store.get(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Person> {
        self.store.all()
    }

    /// People worth showing by name — everyone except nameless records.
    pub fn named(&self) -> impl Iterator<Item = &Person> {
        self.store.all().filter(|p| p.name != UNKNOWN_CONTRIBUTOR)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Replace contents wholesale (snapshot restore).
    pub(crate) fn from_records(people: Vec<Person>) -> Self {
        let mut index = Self::new();
        for person in people {
            if !person.email_address.is_empty() {
                index
                    .by_email
                    .insert(person.email_address.clone(), person.id.clone());
            }
            index.store.upsert_one(person);
        }
        index
    }
}
