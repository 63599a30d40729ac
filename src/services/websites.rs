//! Browsing-history service.
//!
//! Visits are the dated occurrences the ranking engine scores; the store
//! aggregates them into one `Website` record per site for display.

use crate::ranking::RankingEngine;
use crate::store::EntityStore;
use crate::types::{Website, WebsiteVisit};
use crate::util::host_of;

#[derive(Debug, Default)]
pub struct WebsiteStore {
    store: EntityStore<Website>,
    /// Every ingested visit, retained for decay ranking.
    visits: Vec<WebsiteVisit>,
}

impl WebsiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of visits into the per-site aggregates.
    pub fn add_visits(&mut self, visits: Vec<WebsiteVisit>) {
        for visit in visits {
            if visit.id.is_empty() {
                log::debug!("Skipping website visit with empty id");
                continue;
            }
            let site = match self.store.get(&visit.id) {
                Some(existing) => Website {
                    id: existing.id.clone(),
                    url: existing.url.clone(),
                    title: if visit.title.is_empty() {
                        existing.title.clone()
                    } else {
                        visit.title.clone()
                    },
                    last_visited: existing.last_visited.max(visit.visited_at),
                    visit_count: existing.visit_count + 1,
                },
                None => Website {
                    id: visit.id.clone(),
                    url: visit.url.clone(),
                    title: if visit.title.is_empty() {
                        host_of(&visit.url).unwrap_or_else(|| visit.url.clone())
                    } else {
                        visit.title.clone()
                    },
                    last_visited: visit.visited_at,
                    visit_count: 1,
                },
            };
            self.store.upsert_one(site);
            self.visits.push(visit);
        }
    }

    /// Top sites by decay score over their visit history.
    pub fn featured(&self, ranking: &RankingEngine, limit: usize) -> Vec<&Website> {
        ranking
            .order_by_count(&self.visits)
            .into_iter()
            .filter_map(|visit| self.store.get(&visit.id))
            .take(limit)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Website> {
        self.store.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Website> {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub(crate) fn visit_records(&self) -> &[WebsiteVisit] {
        &self.visits
    }

    pub(crate) fn from_visits(visits: Vec<WebsiteVisit>) -> Self {
        let mut store = Self::new();
        store.add_visits(visits);
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(value: &str) -> DateTime<Utc> {
        value.parse().unwrap()
    }

    fn visit(id: &str, title: &str, at: &str) -> WebsiteVisit {
        WebsiteVisit {
            id: id.to_string(),
            url: format!("https://{}.example.com/page", id),
            title: title.to_string(),
            visited_at: ts(at),
        }
    }

    #[test]
    fn test_visits_aggregate_per_site() {
        let mut store = WebsiteStore::new();
        store.add_visits(vec![
            visit("a", "Site A", "2026-02-08T09:00:00Z"),
            visit("a", "Site A", "2026-02-08T11:00:00Z"),
            visit("b", "Site B", "2026-02-08T10:00:00Z"),
        ]);

        assert_eq!(store.len(), 2);
        let a = store.get("a").unwrap();
        assert_eq!(a.visit_count, 2);
        assert_eq!(a.last_visited, ts("2026-02-08T11:00:00Z"));
    }

    #[test]
    fn test_untitled_visit_falls_back_to_host() {
        let mut store = WebsiteStore::new();
        store.add_visits(vec![visit("a", "", "2026-02-08T09:00:00Z")]);
        assert_eq!(store.get("a").unwrap().title, "a.example.com");
    }

    #[test]
    fn test_out_of_order_visit_keeps_latest_timestamp() {
        let mut store = WebsiteStore::new();
        store.add_visits(vec![
            visit("a", "Site A", "2026-02-08T11:00:00Z"),
            visit("a", "Site A", "2026-02-08T09:00:00Z"),
        ]);
        assert_eq!(store.get("a").unwrap().last_visited, ts("2026-02-08T11:00:00Z"));
    }
}
