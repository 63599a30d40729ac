//! Flattened search corpus over documents, meetings, people and websites.
//!
//! The corpus is rebuilt from scratch by re-scanning every store — fine at
//! personal-dashboard scale (hundreds of records, not millions). Matching
//! is case-insensitive substring containment; results come back in corpus
//! order. Callers wanting relevance apply the ranking engine themselves.

use serde::Serialize;

use crate::services::documents::DocumentIndex;
use crate::services::people::PersonIndex;
use crate::services::segments::SegmentIndex;
use crate::services::websites::WebsiteStore;
use crate::types::{Document, Person, Segment, SortDirection, Website};

/// What kind of record a corpus entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Document,
    Segment,
    Person,
    Website,
}

/// The record behind a corpus entry.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchRecord {
    Document(Document),
    Segment(Segment),
    Person(Person),
    Website(Website),
}

/// One searchable entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    /// Lowercased name/title/summary of the source record.
    pub searchable_text: String,
    pub kind: SearchKind,
    pub record: SearchRecord,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    corpus: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scan every store into a fresh corpus.
    ///
    /// A broken source degrades to its entries being absent; construction
    /// itself never fails, so one bad provider cannot blank the dashboard.
    pub fn rebuild(
        &mut self,
        documents: &DocumentIndex,
        segments: &SegmentIndex,
        people: &PersonIndex,
        websites: &WebsiteStore,
    ) {
        let mut corpus = Vec::new();

        for document in documents.all() {
            corpus.push(SearchEntry {
                searchable_text: document.name.to_lowercase(),
                kind: SearchKind::Document,
                record: SearchRecord::Document(document.clone()),
            });
        }
        for segment in segments.all(SortDirection::Ascending) {
            corpus.push(SearchEntry {
                searchable_text: segment.summary.to_lowercase(),
                kind: SearchKind::Segment,
                record: SearchRecord::Segment(segment.clone()),
            });
        }
        // Nameless contributor records are excluded; their placeholder
        // name would match queries for no reason.
        for person in people.named() {
            corpus.push(SearchEntry {
                searchable_text: person.name.to_lowercase(),
                kind: SearchKind::Person,
                record: SearchRecord::Person(person.clone()),
            });
        }
        for website in websites.all() {
            corpus.push(SearchEntry {
                searchable_text: website.title.to_lowercase(),
                kind: SearchKind::Website,
                record: SearchRecord::Website(website.clone()),
            });
        }

        self.corpus = corpus;
    }

    /// Case-insensitive substring query. An empty query matches nothing.
    pub fn query(&self, query: &str) -> Vec<&SearchEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.corpus
            .iter()
            .filter(|entry| entry.searchable_text.contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use crate::types::{DocumentType, ResponseStatus, UNKNOWN_CONTRIBUTOR};
    use std::sync::Arc;

    fn build_index() -> SearchIndex {
        let mut documents = DocumentIndex::new();
        documents.upsert(vec![Document {
            id: "d1".to_string(),
            name: "Kelp Notes".to_string(),
            link: "https://docs.example.com/document/d/kelp".to_string(),
            description: String::new(),
            updated_at: None,
            document_type: DocumentType::Doc,
        }]);

        let segments = SegmentIndex::new(
            vec![Segment {
                id: "s1".to_string(),
                start: "2026-02-08T09:00:00Z".parse().unwrap(),
                end: "2026-02-08T10:00:00Z".parse().unwrap(),
                summary: "Kelp planning sync".to_string(),
                description: String::new(),
                self_response_status: ResponseStatus::Accepted,
                attendees: Vec::new(),
                email_ids: Vec::new(),
                drive_activity_ids: Vec::new(),
            }],
            Arc::new(FixedClock("2026-02-08T08:00:00Z".parse().unwrap())),
        );

        let mut people = PersonIndex::new();
        people.add_contacts(vec![Person {
            id: "p1".to_string(),
            email_address: "casey@example.com".to_string(),
            name: "Casey Kim".to_string(),
            image_url: String::new(),
            email_ids: Vec::new(),
            drive_activity_ids: Vec::new(),
            segment_ids: Vec::new(),
        }]);
        people.add_contacts(vec![Person {
            id: "p2".to_string(),
            email_address: "mystery@example.com".to_string(),
            name: UNKNOWN_CONTRIBUTOR.to_string(),
            image_url: String::new(),
            email_ids: Vec::new(),
            drive_activity_ids: Vec::new(),
            segment_ids: Vec::new(),
        }]);

        let websites = WebsiteStore::new();

        let mut search = SearchIndex::new();
        search.rebuild(&documents, &segments, &people, &websites);
        search
    }

    #[test]
    fn test_query_matches_substring_case_insensitive() {
        let search = build_index();
        let results = search.query("kelp");
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|e| e.kind == SearchKind::Document));
        assert!(results.iter().any(|e| e.kind == SearchKind::Segment));
    }

    #[test]
    fn test_query_finds_people_by_name() {
        let search = build_index();
        let results = search.query("Casey");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, SearchKind::Person);
    }

    #[test]
    fn test_unknown_contributor_excluded() {
        let search = build_index();
        assert!(search.query("unknown contributor").is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let search = build_index();
        assert!(search.query("").is_empty());
        assert!(search.query("   ").is_empty());
    }

    #[test]
    fn test_empty_corpus_returns_empty() {
        let search = SearchIndex::new();
        assert!(search.query("anything").is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let search = build_index();
        assert!(search.query("zebra").is_empty());
    }
}
