//! Recency-decay scoring for "featured" surfacing.
//!
//! Pure math over dated occurrences, no store access. An occurrence is
//! worth 1.0 on the day it happens and loses a fixed fraction of its value
//! per elapsed calendar day; an entity's score is the sum over all of its
//! occurrences. Asymptotic toward zero, never reaching it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::SharedClock;
use crate::types::SortDirection;

/// A dated occurrence of some entity (a website visit, an action on a
/// document). The id joins occurrences of the same entity.
pub trait Occurrence {
    fn occurrence_id(&self) -> &str;
    fn occurrence_date(&self) -> Option<DateTime<Utc>>;
}

impl Occurrence for crate::types::WebsiteVisit {
    fn occurrence_id(&self) -> &str {
        &self.id
    }

    fn occurrence_date(&self) -> Option<DateTime<Utc>> {
        Some(self.visited_at)
    }
}

/// Drive activity ranks the *document* it touched, which activity
/// references by link.
impl Occurrence for crate::types::DriveActivity {
    fn occurrence_id(&self) -> &str {
        &self.link
    }

    fn occurrence_date(&self) -> Option<DateTime<Utc>> {
        Some(self.time)
    }
}

/// Ranking options for the diagnostics-oriented variant.
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub direction: SortDirection,
    /// Keep every occurrence instead of deduplicating to one
    /// representative per id.
    pub keep_all: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            direction: SortDirection::Descending,
            keep_all: false,
        }
    }
}

/// An item paired with its entity's total decay score.
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub item: T,
    pub score: f64,
}

pub struct RankingEngine {
    decay_per_day: f64,
    clock: SharedClock,
}

struct Tally<T> {
    representative: T,
    latest: Option<DateTime<Utc>>,
    score: f64,
}

impl RankingEngine {
    pub fn new(decay_per_day: f64, clock: SharedClock) -> Self {
        Self {
            decay_per_day,
            clock,
        }
    }

    /// Value of a single occurrence: 1.0 today or in the future, decayed
    /// per elapsed calendar day otherwise, 0.0 when the date is missing.
    pub fn value_for_date(&self, date: Option<DateTime<Utc>>) -> f64 {
        let Some(date) = date else {
            return 0.0;
        };
        let today = self.clock.now().date_naive();
        let day = date.date_naive();
        if day >= today {
            return 1.0;
        }
        let elapsed = (today - day).num_days() as i32;
        self.decay_per_day.powi(elapsed)
    }

    /// Unique items by id, ranked by decay score descending. Ties break by
    /// latest date descending, then id ascending, so the order is
    /// deterministic across runs.
    ///
    /// The representative kept per id is the occurrence with the latest
    /// date; occurrences with an empty id are skipped.
    pub fn order_by_count<T: Occurrence + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut tallies = self.tally(items);
        Self::sort_tallies(&mut tallies, SortDirection::Descending);
        tallies.into_iter().map(|t| t.representative).collect()
    }

    /// The options variant: ascending order and/or every occurrence kept,
    /// each paired with its id's total score.
    pub fn rank<T: Occurrence + Clone>(&self, items: &[T], options: RankOptions) -> Vec<Scored<T>> {
        if options.keep_all {
            let scores: HashMap<String, f64> = self
                .tally(items)
                .into_iter()
                .map(|t| (t.representative.occurrence_id().to_string(), t.score))
                .collect();
            let mut out: Vec<Scored<T>> = items
                .iter()
                .filter(|item| !item.occurrence_id().is_empty())
                .map(|item| Scored {
                    score: scores.get(item.occurrence_id()).copied().unwrap_or(0.0),
                    item: item.clone(),
                })
                .collect();
            out.sort_by(|a, b| {
                let ordering = a
                    .score
                    .total_cmp(&b.score)
                    .then_with(|| {
                        cmp_dates(a.item.occurrence_date(), b.item.occurrence_date())
                    })
                    .reverse()
                    .then_with(|| a.item.occurrence_id().cmp(b.item.occurrence_id()));
                match options.direction {
                    SortDirection::Descending => ordering,
                    SortDirection::Ascending => ordering.reverse(),
                }
            });
            return out;
        }

        let mut tallies = self.tally(items);
        Self::sort_tallies(&mut tallies, options.direction);
        tallies
            .into_iter()
            .map(|t| Scored {
                score: t.score,
                item: t.representative,
            })
            .collect()
    }

    fn tally<T: Occurrence + Clone>(&self, items: &[T]) -> Vec<Tally<T>> {
        let mut by_id: HashMap<&str, Tally<T>> = HashMap::new();
        for item in items {
            let id = item.occurrence_id();
            if id.is_empty() {
                continue;
            }
            let value = self.value_for_date(item.occurrence_date());
            match by_id.entry(id) {
                Entry::Occupied(mut entry) => {
                    let tally = entry.get_mut();
                    tally.score += value;
                    // Latest-dated occurrence becomes the representative.
                    if item.occurrence_date() > tally.latest {
                        tally.latest = item.occurrence_date();
                        tally.representative = item.clone();
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(Tally {
                        latest: item.occurrence_date(),
                        representative: item.clone(),
                        score: value,
                    });
                }
            }
        }
        by_id.into_values().collect()
    }

    fn sort_tallies<T: Occurrence>(tallies: &mut [Tally<T>], direction: SortDirection) {
        tallies.sort_by(|a, b| {
            let ordering = a
                .score
                .total_cmp(&b.score)
                .then_with(|| cmp_dates(a.latest, b.latest))
                .reverse()
                .then_with(|| {
                    a.representative
                        .occurrence_id()
                        .cmp(b.representative.occurrence_id())
                });
            match direction {
                SortDirection::Descending => ordering,
                SortDirection::Ascending => ordering.reverse(),
            }
        });
    }
}

/// Missing dates sort below any present date.
fn cmp_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> std::cmp::Ordering {
    a.cmp(&b)
}
