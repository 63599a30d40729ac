//! Snapshot persistence over an external key-value service.
//!
//! The engine does not own a storage technology; anything that can get and
//! put strings by key can back it. Each store serializes to one JSON value
//! under a fixed key. A missing or corrupt value loads that store empty —
//! a snapshot problem must never take the dashboard down.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{EngineConfig, SharedClock};
use crate::error::EngineError;
use crate::state::Engine;
use crate::types::{Document, DriveActivity, Email, Person, Segment, Task, WebsiteVisit};

/// The external persistence seam.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: String);
}

/// In-memory implementation, used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

pub mod keys {
    pub const PEOPLE: &str = "people";
    pub const SEGMENTS: &str = "segments";
    pub const DOCUMENTS: &str = "documents";
    pub const EMAILS: &str = "emails";
    pub const DRIVE_ACTIVITY: &str = "driveActivity";
    pub const WEBSITE_VISITS: &str = "websiteVisits";
    pub const TASKS: &str = "tasks";
}

/// Write every store's records into the key-value service.
pub fn save(engine: &Engine, kv: &mut dyn KeyValueStore) -> Result<(), EngineError> {
    put_vec(kv, keys::PEOPLE, &engine.people.all().cloned().collect::<Vec<Person>>())?;
    put_vec(kv, keys::SEGMENTS, &engine.segments.records().to_vec())?;
    put_vec(
        kv,
        keys::DOCUMENTS,
        &engine.documents.all().cloned().collect::<Vec<Document>>(),
    )?;
    put_vec(kv, keys::EMAILS, &engine.emails.all().cloned().collect::<Vec<Email>>())?;
    put_vec(
        kv,
        keys::DRIVE_ACTIVITY,
        &engine
            .drive_activity
            .all()
            .cloned()
            .collect::<Vec<DriveActivity>>(),
    )?;
    put_vec(kv, keys::WEBSITE_VISITS, &engine.websites.visit_records().to_vec())?;
    put_vec(kv, keys::TASKS, &engine.tasks.all().cloned().collect::<Vec<Task>>())?;
    Ok(())
}

/// Rebuild an engine from the key-value service. Missing or corrupt
/// values load as empty stores.
pub fn load(config: EngineConfig, clock: SharedClock, kv: &dyn KeyValueStore) -> Engine {
    Engine::from_parts(
        config,
        clock,
        get_vec::<Person>(kv, keys::PEOPLE),
        get_vec::<Segment>(kv, keys::SEGMENTS),
        get_vec::<Document>(kv, keys::DOCUMENTS),
        get_vec::<Email>(kv, keys::EMAILS),
        get_vec::<DriveActivity>(kv, keys::DRIVE_ACTIVITY),
        get_vec::<WebsiteVisit>(kv, keys::WEBSITE_VISITS),
        get_vec::<Task>(kv, keys::TASKS),
    )
}

fn put_vec<T: Serialize>(
    kv: &mut dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<(), EngineError> {
    let value = serde_json::to_string(records).map_err(|e| EngineError::SnapshotEncode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    kv.put(key, value);
    Ok(())
}

fn get_vec<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let Some(value) = kv.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&value) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Corrupt snapshot value for key '{}': {}. Loading empty.", key, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use std::sync::Arc;

    fn clock() -> SharedClock {
        Arc::new(FixedClock("2026-02-08T12:00:00Z".parse().unwrap()))
    }

    fn populated_engine() -> Engine {
        let mut engine = Engine::new(EngineConfig::default(), clock());
        engine
            .ingest_json(
                r#"{
                    "people": [{"id": "p1", "name": "Casey", "emailAddress": "casey@acme.com"}],
                    "calendarEvents": [{
                        "id": "s1",
                        "summary": "Sync",
                        "start": "2026-02-08T09:00:00Z",
                        "end": "2026-02-08T10:00:00Z",
                        "attendees": [{"email": "casey@acme.com"}]
                    }],
                    "emails": [{
                        "id": "m1", "subject": "Hi", "from": "casey@acme.com",
                        "date": "2026-02-08T09:30:00Z"
                    }]
                }"#,
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_snapshot_round_trip() {
        let engine = populated_engine();
        let mut kv = MemoryKeyValueStore::new();
        save(&engine, &mut kv).unwrap();

        let restored = load(EngineConfig::default(), clock(), &kv);

        assert_eq!(restored.people.len(), engine.people.len());
        assert_eq!(restored.segments.len(), 1);
        assert_eq!(restored.emails.len(), 1);

        // Derived state survives: back-references and the email index.
        let segment = restored.segments.get("s1").unwrap();
        assert_eq!(segment.email_ids, vec!["m1"]);
        assert!(restored.people.get_by_email("casey@acme.com").is_some());
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let kv = MemoryKeyValueStore::new();
        let engine = load(EngineConfig::default(), clock(), &kv);
        assert!(engine.people.is_empty());
        assert!(engine.segments.is_empty());
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let mut kv = MemoryKeyValueStore::new();
        kv.put(keys::PEOPLE, "{ definitely not json".to_string());
        let engine = load(EngineConfig::default(), clock(), &kv);
        assert!(engine.people.is_empty());
    }
}
