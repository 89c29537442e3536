//! Derived statistics and the focus score.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregates;
use crate::classify::Productivity;

/// Read-only summary over the aggregate mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_domains: usize,
    pub productive_count: usize,
    pub neutral_count: usize,
    pub distracting_count: usize,
    pub productive_seconds: u64,
    pub neutral_seconds: u64,
    pub distracting_seconds: u64,
    pub total_seconds: u64,
    /// Productive share of tracked time, rounded to a whole percent.
    pub focus_score: u32,
    pub is_tracking: bool,
}

impl StatsSummary {
    pub fn from_aggregates(aggregates: &Aggregates, is_tracking: bool) -> Self {
        let productive_seconds = aggregates.seconds_by_class(Productivity::Productive);
        let neutral_seconds = aggregates.seconds_by_class(Productivity::Neutral);
        let distracting_seconds = aggregates.seconds_by_class(Productivity::Distracting);
        let total_seconds = productive_seconds + neutral_seconds + distracting_seconds;
        Self {
            total_domains: aggregates.len(),
            productive_count: aggregates.count_by_class(Productivity::Productive),
            neutral_count: aggregates.count_by_class(Productivity::Neutral),
            distracting_count: aggregates.count_by_class(Productivity::Distracting),
            productive_seconds,
            neutral_seconds,
            distracting_seconds,
            total_seconds,
            focus_score: focus_score(productive_seconds, total_seconds),
            is_tracking,
        }
    }
}

/// Ratio of productive time to total tracked time as a percentage.
/// Zero when nothing has been tracked yet.
pub fn focus_score(productive_seconds: u64, total_seconds: u64) -> u32 {
    if total_seconds == 0 {
        return 0;
    }
    (productive_seconds as f64 / total_seconds as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn focus_score_rounding() {
        assert_eq!(focus_score(0, 0), 0);
        assert_eq!(focus_score(1, 3), 33);
        assert_eq!(focus_score(2, 3), 67);
        assert_eq!(focus_score(5, 5), 100);
    }

    #[test]
    fn summary_from_aggregates() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut aggs = Aggregates::new();
        aggs.accumulate("github.com", 300, now);
        aggs.accumulate("youtube.com", 100, now);
        aggs.accumulate("example.org", 100, now);

        let stats = StatsSummary::from_aggregates(&aggs, true);
        assert_eq!(stats.total_domains, 3);
        assert_eq!(stats.productive_count, 1);
        assert_eq!(stats.distracting_count, 1);
        assert_eq!(stats.neutral_count, 1);
        assert_eq!(stats.total_seconds, 500);
        assert_eq!(stats.focus_score, 60);
        assert!(stats.is_tracking);
    }
}
