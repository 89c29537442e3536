//! Streak continuity and temporal flags.
//!
//! Day-to-day streak detection runs once at process start and once per
//! periodic tick; the same-day no-op keeps the update to at most once
//! per calendar day. The night/weekend flags are one-shot: set while a
//! session is active, cleared only by full reset.

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Persisted streak state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub last_tracked_date: Option<NaiveDate>,
    pub current_streak: u32,
}

impl StreakState {
    /// Observe that the engine is alive on `today`.
    ///
    /// Returns `true` when the streak value changed:
    /// - same day: no-op
    /// - gap of exactly one day: streak + 1
    /// - larger gap or first observation: streak restarts at 1
    pub fn observe(&mut self, today: NaiveDate) -> bool {
        match self.last_tracked_date {
            Some(last) if last == today => false,
            Some(last) => {
                let gap = (today - last).num_days();
                if gap == 1 {
                    self.current_streak += 1;
                } else {
                    self.current_streak = 1;
                }
                self.last_tracked_date = Some(today);
                true
            }
            None => {
                self.current_streak = 1;
                self.last_tracked_date = Some(today);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One-shot temporal flags, set while a session is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalFlags {
    /// A session was active with the local hour in [22,24) ∪ [0,5).
    pub night_session: bool,
    /// A session was active on a Saturday or Sunday.
    pub weekend_tracking: bool,
}

impl TemporalFlags {
    /// Update the flags from the local hour and weekday of an active
    /// session. Returns `true` when either flag newly turned on.
    pub fn observe(&mut self, local_hour: u32, weekday: Weekday) -> bool {
        let mut changed = false;
        if !self.night_session && (local_hour >= 22 || local_hour < 5) {
            self.night_session = true;
            changed = true;
        }
        if !self.weekend_tracking && matches!(weekday, Weekday::Sat | Weekday::Sun) {
            self.weekend_tracking = true;
            changed = true;
        }
        changed
    }

    /// Convenience wrapper extracting hour and weekday from a datetime.
    pub fn observe_at<Tz: chrono::TimeZone>(&mut self, now: &chrono::DateTime<Tz>) -> bool {
        self.observe(now.hour(), now.weekday())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_observation_starts_at_one() {
        let mut streak = StreakState::default();
        assert!(streak.observe(day(1)));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_tracked_date, Some(day(1)));
    }

    #[test]
    fn same_day_is_noop() {
        let mut streak = StreakState::default();
        streak.observe(day(1));
        assert!(!streak.observe(day(1)));
        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn consecutive_days_increment() {
        let mut streak = StreakState::default();
        streak.observe(day(1));
        streak.observe(day(2));
        streak.observe(day(3));
        assert_eq!(streak.current_streak, 3);
    }

    #[test]
    fn gap_resets_to_one() {
        let mut streak = StreakState::default();
        streak.observe(day(1));
        streak.observe(day(2));
        assert!(streak.observe(day(5)));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_tracked_date, Some(day(5)));
    }

    #[test]
    fn night_flag_window() {
        let mut flags = TemporalFlags::default();
        assert!(!flags.observe(12, Weekday::Mon));
        assert!(!flags.night_session);
        assert!(flags.observe(23, Weekday::Mon));
        assert!(flags.night_session);
        // Monotonic: observing a daytime hour afterwards changes nothing.
        assert!(!flags.observe(12, Weekday::Tue));
        assert!(flags.night_session);

        let mut early = TemporalFlags::default();
        assert!(early.observe(4, Weekday::Wed));
        let mut five = TemporalFlags::default();
        assert!(!five.observe(5, Weekday::Wed));
    }

    #[test]
    fn weekend_flag() {
        let mut flags = TemporalFlags::default();
        assert!(flags.observe(10, Weekday::Sat));
        assert!(flags.weekend_tracking);
        assert!(!flags.observe(10, Weekday::Sun));
    }
}
