//! Per-domain usage aggregates.
//!
//! The durable output of the session machine: a mapping from canonical
//! domain to cumulative usage. All mutation goes through [`Aggregates::accumulate`];
//! the tracker persists the whole mapping write-through after each call.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Productivity};

/// Cumulative usage for one canonical domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAggregate {
    /// Cumulative tracked seconds. Only grows, except on full reset.
    pub total_seconds: u64,
    /// Number of discrete focus periods flushed into this domain.
    pub session_count: u64,
    pub last_visited_at: DateTime<Utc>,
    /// Computed once when the aggregate is first created and stable
    /// thereafter, even if the classification lists change later.
    pub productivity: Productivity,
}

/// The full domain → aggregate mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregates {
    map: BTreeMap<String, DomainAggregate>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flushed focus period to `domain`.
    ///
    /// Creates the aggregate on first touch (classifying the domain at
    /// that point), then adds `elapsed_secs`, bumps the session count
    /// and stamps the visit time.
    pub fn accumulate(&mut self, domain: &str, elapsed_secs: u64, now: DateTime<Utc>) {
        let entry = self
            .map
            .entry(domain.to_string())
            .or_insert_with(|| DomainAggregate {
                total_seconds: 0,
                session_count: 0,
                last_visited_at: now,
                productivity: classify(domain),
            });
        entry.total_seconds += elapsed_secs;
        entry.session_count += 1;
        entry.last_visited_at = now;
    }

    pub fn get(&self, domain: &str) -> Option<&DomainAggregate> {
        self.map.get(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DomainAggregate)> {
        self.map.iter()
    }

    /// Number of distinct tracked domains.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sum of `total_seconds` across every domain.
    pub fn total_seconds(&self) -> u64 {
        self.map.values().map(|a| a.total_seconds).sum()
    }

    /// Sum of `total_seconds` across domains of one class.
    pub fn seconds_by_class(&self, class: Productivity) -> u64 {
        self.map
            .values()
            .filter(|a| a.productivity == class)
            .map(|a| a.total_seconds)
            .sum()
    }

    /// Number of domains of one class.
    pub fn count_by_class(&self, class: Productivity) -> usize {
        self.map
            .values()
            .filter(|a| a.productivity == class)
            .count()
    }

    /// Sum of `session_count` across domains of one class, or all
    /// domains when `class` is `None`.
    pub fn sessions_by_class(&self, class: Option<Productivity>) -> u64 {
        self.map
            .values()
            .filter(|a| class.map_or(true, |c| a.productivity == c))
            .map(|a| a.session_count)
            .sum()
    }

    /// Drop every aggregate (full reset).
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
