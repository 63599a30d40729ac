//! Documents service — id-keyed store with a by-link secondary index.

use std::collections::HashMap;

use crate::store::EntityStore;
use crate::types::Document;
use crate::util::link_key;

#[derive(Debug, Default)]
pub struct DocumentIndex {
    store: EntityStore<Document>,
    /// scheme-stripped link → document id
    by_link: HashMap<String, String>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, documents: Vec<Document>) {
        for document in documents {
            if document.id.is_empty() {
                log::debug!("Skipping document with empty id");
                continue;
            }
            if !document.link.is_empty() {
                self.by_link
                    .insert(link_key(&document.link).to_string(), document.id.clone());
            }
            self.store.upsert_one(document);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.store.get(id)
    }

    /// Resolve a document by link. Both sides of the lookup are
    /// scheme-stripped, so activity that references "docs.example.com/…"
    /// finds a document stored as "https://docs.example.com/…".
    pub fn get_by_link(&self, link: &str) -> Option<&Document> {
        self.by_link
            .get(link_key(link))
            .and_then(|id| self.store.get(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Document> {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;

    fn make_document(id: &str, link: &str) -> Document {
        Document {
            id: id.to_string(),
            name: format!("Doc {}", id),
            link: link.to_string(),
            description: String::new(),
            updated_at: None,
            document_type: DocumentType::from_link(link),
        }
    }

    #[test]
    fn test_get_by_link_ignores_scheme() {
        let mut index = DocumentIndex::new();
        index.upsert(vec![make_document(
            "d1",
            "https://docs.example.com/document/d/abc",
        )]);

        assert!(index.get_by_link("docs.example.com/document/d/abc").is_some());
        assert!(index
            .get_by_link("http://docs.example.com/document/d/abc")
            .is_some());
        assert!(index.get_by_link("docs.example.com/document/d/other").is_none());
    }

    #[test]
    fn test_upsert_rebinds_link_index() {
        let mut index = DocumentIndex::new();
        index.upsert(vec![make_document("d1", "https://x.com/document/d/1")]);
        index.upsert(vec![Document {
            name: "Renamed".to_string(),
            ..make_document("d1", "https://x.com/document/d/1")
        }]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get_by_link("x.com/document/d/1").unwrap().name, "Renamed");
    }

    #[test]
    fn test_document_type_derived() {
        let mut index = DocumentIndex::new();
        index.upsert(vec![make_document(
            "d1",
            "https://docs.example.com/spreadsheets/d/abc",
        )]);
        assert_eq!(index.get("d1").unwrap().document_type, DocumentType::Sheet);
    }
}
