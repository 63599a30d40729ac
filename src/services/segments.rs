//! Meetings service — the time-bucketed segment store.
//!
//! Segments are kept sorted by start. Containment linking binary-searches
//! the partition point for a timestamp and walks candidates backward, bounded
//! by the longest segment duration, so linking is O(log n + k) per item and
//! overlap-safe: an item is appended to *every* segment containing it.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::SharedClock;
use crate::types::{DriveActivity, Email, Segment, SortDirection};

pub struct SegmentIndex {
    /// Sorted by start ascending.
    segments: Vec<Segment>,
    by_id: HashMap<String, usize>,
    max_duration: Duration,
    clock: SharedClock,
}

impl SegmentIndex {
    /// Build the index from one batch of normalized calendar events.
    /// Duplicate ids collapse to the last record in the batch.
    pub fn new(events: Vec<Segment>, clock: SharedClock) -> Self {
        let mut latest: HashMap<String, usize> = HashMap::new();
        let mut segments: Vec<Segment> = Vec::with_capacity(events.len());
        for event in events {
            if event.id.is_empty() {
                log::debug!("Skipping calendar event with empty id");
                continue;
            }
            match latest.entry(event.id.clone()) {
                Entry::Occupied(entry) => segments[*entry.get()] = event,
                Entry::Vacant(entry) => {
                    entry.insert(segments.len());
                    segments.push(event);
                }
            }
        }
        segments.sort_by_key(|s| s.start);

        let by_id = segments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let max_duration = segments
            .iter()
            .map(|s| s.end - s.start)
            .max()
            .unwrap_or_else(Duration::zero);

        Self {
            segments,
            by_id,
            max_duration,
            clock,
        }
    }

    pub fn empty(clock: SharedClock) -> Self {
        Self::new(Vec::new(), clock)
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.by_id.get(id).map(|&i| &self.segments[i])
    }

    /// All segments ordered by start.
    pub fn all(&self, direction: SortDirection) -> Vec<&Segment> {
        let mut out: Vec<&Segment> = self.segments.iter().collect();
        if direction == SortDirection::Descending {
            out.reverse();
        }
        out
    }

    /// Segments starting on the given calendar day, by start time.
    pub fn on_day(&self, date: NaiveDate) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.start.date_naive() == date)
            .collect()
    }

    /// Segments grouped into calendar-day buckets, days ascending.
    pub fn by_day(&self, direction: SortDirection) -> BTreeMap<NaiveDate, Vec<&Segment>> {
        let mut days: BTreeMap<NaiveDate, Vec<&Segment>> = BTreeMap::new();
        for segment in &self.segments {
            days.entry(segment.start.date_naive()).or_default().push(segment);
        }
        if direction == SortDirection::Descending {
            for bucket in days.values_mut() {
                bucket.reverse();
            }
        }
        days
    }

    /// Segments that have not started yet, soonest first.
    pub fn upcoming(&self, exclude: Option<&str>) -> Vec<&Segment> {
        let now = self.clock.now();
        self.segments
            .iter()
            .filter(|s| s.start > now)
            .filter(|s| Some(s.id.as_str()) != exclude)
            .collect()
    }

    /// Segments that have already ended, most recent first.
    pub fn past(&self, exclude: Option<&str>) -> Vec<&Segment> {
        let now = self.clock.now();
        self.segments
            .iter()
            .rev()
            .filter(|s| s.end <= now)
            .filter(|s| Some(s.id.as_str()) != exclude)
            .collect()
    }

    /// The meeting happening now, or failing that the next one to start.
    pub fn current_or_next(&self) -> Option<&Segment> {
        let now = self.clock.now();
        self.segments.iter().find(|s| s.end > now)
    }

    /// Link each email to every segment containing its date.
    pub fn add_emails(&mut self, emails: &[Email]) {
        for email in emails {
            let id = email.id.clone();
            for index in self.containing(email.date) {
                self.segments[index].email_ids.push(id.clone());
            }
        }
    }

    /// Link each activity to every segment containing its timestamp.
    pub fn add_drive_activity(&mut self, activities: &[DriveActivity]) {
        for activity in activities {
            let id = activity.id.clone();
            for index in self.containing(activity.time) {
                self.segments[index].drive_activity_ids.push(id.clone());
            }
        }
    }

    /// Indices of every segment with `start < instant < end`, ascending.
    ///
    /// Candidates sit below the partition point where starts reach
    /// `instant`; the backward walk stops once starts fall behind
    /// `instant - max_duration`, past which no interval can still cover it.
    fn containing(&self, instant: DateTime<Utc>) -> Vec<usize> {
        let upper = self.segments.partition_point(|s| s.start < instant);
        let horizon = instant - self.max_duration;

        let mut matches = Vec::new();
        for index in (0..upper).rev() {
            let segment = &self.segments[index];
            if segment.start <= horizon {
                break;
            }
            if instant < segment.end {
                matches.push(index);
            }
        }
        matches.reverse();
        matches
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The raw records, for snapshots.
    pub(crate) fn records(&self) -> &[Segment] {
        &self.segments
    }
}
