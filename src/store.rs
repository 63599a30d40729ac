//! Generic keyed collection backing every index.

use std::collections::HashMap;

/// An entity with a stable string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Keyed collection with last-write-wins upsert.
///
/// Iteration order is unspecified; consumers wanting sorted output sort at
/// the read side. Records with an empty key are skipped rather than stored
/// under "".
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    records: HashMap<String, T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T: Keyed> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by id; the later write wins.
    pub fn upsert(&mut self, records: impl IntoIterator<Item = T>) {
        for record in records {
            self.upsert_one(record);
        }
    }

    pub fn upsert_one(&mut self, record: T) {
        let key = record.key();
        if key.is_empty() {
            log::debug!("Skipping record with empty id");
            return;
        }
        self.records.insert(key.to_string(), record);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.records.get_mut(id)
    }

    /// The found subset, preserving requested order, silently omitting misses.
    pub fn get_bulk<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&T> {
        ids.iter()
            .filter_map(|id| self.records.get(id.as_ref()))
            .collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
