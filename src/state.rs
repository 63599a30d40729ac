//! The engine aggregate the presentation layer holds.
//!
//! Single-threaded: every mutation runs to completion before the next
//! read, so no reader observes a half-applied batch. The only staleness
//! is cross-batch; independent providers arrive at different times and
//! the world is eventually consistent.

use crate::config::{Clock, EngineConfig, SharedClock, SystemClock};
use crate::error::EngineError;
use crate::ingest::{self, RawBatch};
use crate::linker::link_batch;
use crate::ranking::RankingEngine;
use crate::search::{SearchEntry, SearchIndex};
use crate::services::documents::DocumentIndex;
use crate::services::people::PersonIndex;
use crate::services::segments::SegmentIndex;
use crate::services::tasks::TaskStore;
use crate::services::websites::WebsiteStore;
use crate::store::EntityStore;
use crate::types::{Document, DriveActivity, Email, Person, Segment, Task, Website, WebsiteVisit};

pub struct Engine {
    pub config: EngineConfig,
    clock: SharedClock,
    pub people: PersonIndex,
    pub segments: SegmentIndex,
    pub documents: DocumentIndex,
    pub emails: EntityStore<Email>,
    pub drive_activity: EntityStore<DriveActivity>,
    pub websites: WebsiteStore,
    pub tasks: TaskStore,
    pub ranking: RankingEngine,
    search: SearchIndex,
    search_dirty: bool,
}

impl Engine {
    pub fn new(config: EngineConfig, clock: SharedClock) -> Self {
        let ranking = RankingEngine::new(config.decay_per_day, clock.clone());
        Self {
            config,
            people: PersonIndex::new(),
            segments: SegmentIndex::empty(clock.clone()),
            documents: DocumentIndex::new(),
            emails: EntityStore::new(),
            drive_activity: EntityStore::new(),
            websites: WebsiteStore::new(),
            tasks: TaskStore::new(),
            ranking,
            search: SearchIndex::new(),
            search_dirty: false,
            clock,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), std::sync::Arc::new(SystemClock))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Ingest one raw batch delivered as JSON.
    pub fn ingest_json(&mut self, json: &str) -> Result<(), EngineError> {
        self.ingest(RawBatch::from_json(json)?);
        Ok(())
    }

    /// Ingest one raw provider batch: normalize, link, and mark the
    /// search corpus stale.
    pub fn ingest(&mut self, raw: RawBatch) {
        let mut batch = ingest::normalize(raw);

        self.websites.add_visits(std::mem::take(&mut batch.website_visits));
        self.tasks.upsert(std::mem::take(&mut batch.tasks));

        link_batch(
            batch,
            &mut self.people,
            &mut self.segments,
            &mut self.documents,
            &mut self.emails,
            &mut self.drive_activity,
            self.clock.clone(),
        );

        self.search_dirty = true;
        log::info!(
            "Ingested batch: {} people, {} segments, {} documents",
            self.people.len(),
            self.segments.len(),
            self.documents.len()
        );
    }

    /// Query the search corpus, rebuilding it first if anything was
    /// ingested since the last query.
    pub fn search(&mut self, query: &str) -> Vec<&SearchEntry> {
        if self.search_dirty {
            self.search
                .rebuild(&self.documents, &self.segments, &self.people, &self.websites);
            self.search_dirty = false;
        }
        self.search.query(query)
    }

    /// Top websites by decay score over visit history.
    pub fn featured_websites(&self) -> Vec<&Website> {
        self.websites
            .featured(&self.ranking, self.config.featured_limit)
    }

    /// Top documents by decay score over the drive activity touching them.
    /// Activity references documents by link.
    pub fn featured_documents(&self) -> Vec<&Document> {
        let occurrences: Vec<DriveActivity> = self.drive_activity.all().cloned().collect();
        self.ranking
            .order_by_count(&occurrences)
            .into_iter()
            .filter_map(|activity| self.documents.get_by_link(&activity.link))
            .take(self.config.featured_limit)
            .collect()
    }

    /// Full resync: drop every store and start from scratch. The next
    /// batches rebuild the world.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let clock = self.clock.clone();
        *self = Self::new(config, clock);
        log::info!("Engine reset for full resync");
    }

    /// Rebuild an engine from persisted records (snapshot restore).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        config: EngineConfig,
        clock: SharedClock,
        people: Vec<Person>,
        segments: Vec<Segment>,
        documents: Vec<Document>,
        emails: Vec<Email>,
        drive_activity: Vec<DriveActivity>,
        website_visits: Vec<WebsiteVisit>,
        tasks: Vec<Task>,
    ) -> Self {
        let mut engine = Self::new(config, clock.clone());
        engine.people = PersonIndex::from_records(people);
        engine.segments = SegmentIndex::new(segments, clock);
        engine.documents.upsert(documents);
        engine.emails.upsert(emails);
        engine.drive_activity.upsert(drive_activity);
        engine.websites = WebsiteStore::from_visits(website_visits);
        engine.tasks.upsert(tasks);
        engine.search_dirty = true;
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use crate::search::SearchKind;
    use std::sync::Arc;

    fn engine_at(now: &str) -> Engine {
        Engine::new(
            EngineConfig::default(),
            Arc::new(FixedClock(now.parse().unwrap())),
        )
    }

    const BATCH: &str = r#"{
        "people": [{"id": "p1", "name": "Casey Kim", "emailAddress": "casey@acme.com"}],
        "calendarEvents": [{
            "id": "seg-1",
            "summary": "Kelp planning",
            "start": "2026-02-08T09:00:00Z",
            "end": "2026-02-08T10:00:00Z",
            "attendees": [{"email": "casey@acme.com", "responseStatus": "accepted", "self": true}]
        }],
        "documents": [{
            "id": "doc-1",
            "name": "Kelp Notes",
            "link": "https://docs.example.com/document/d/kelp"
        }],
        "driveActivity": [{
            "id": "act-1",
            "time": "2026-02-08T09:30:00Z",
            "action": "edit",
            "link": "docs.example.com/document/d/kelp"
        }],
        "websiteVisits": [
            {"id": "w1", "url": "https://crates.example.com", "title": "Crates", "visitedAt": "2026-02-08T11:00:00Z"}
        ],
        "tasks": [{"id": "t1", "title": "Follow up", "position": 1.0}]
    }"#;

    #[test]
    fn test_ingest_and_search_round_trip() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();

        let results = engine.search("kelp");
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|e| e.kind == SearchKind::Document));
        assert!(results.iter().any(|e| e.kind == SearchKind::Segment));
    }

    #[test]
    fn test_search_rebuilds_after_new_batch() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();
        assert_eq!(engine.search("kelp").len(), 2);

        engine
            .ingest_json(
                r#"{"documents": [{"id": "doc-2", "name": "Kelp budget", "link": "https://docs.example.com/spreadsheets/d/b"}]}"#,
            )
            .unwrap();
        // The document-only batch adds to the corpus without wiping the
        // calendar-derived entries.
        assert_eq!(engine.search("kelp").len(), 3);
        assert_eq!(engine.search("budget").len(), 1);
    }

    #[test]
    fn test_featured_documents_rank_by_activity() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();

        let featured = engine.featured_documents();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "doc-1");
    }

    #[test]
    fn test_featured_websites() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();

        let featured = engine.featured_websites();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "w1");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();
        engine.reset();

        assert!(engine.people.is_empty());
        assert!(engine.segments.is_empty());
        assert!(engine.documents.is_empty());
        assert!(engine.search("kelp").is_empty());
    }

    #[test]
    fn test_tasks_and_websites_ingested() {
        let mut engine = engine_at("2026-02-08T12:00:00Z");
        engine.ingest_json(BATCH).unwrap();

        assert_eq!(engine.tasks.len(), 1);
        assert_eq!(engine.websites.len(), 1);
    }
}
