use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every observable state change in the tracker produces an Event.
/// Consumers (CLI, dashboards) render or log them; the engine itself
/// never reacts to its own events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new focus period started on `domain`.
    SessionStarted {
        domain: String,
        tab_id: u64,
        at: DateTime<Utc>,
    },
    /// A measured focus period was added to a domain aggregate.
    SessionFlushed {
        domain: String,
        seconds: u64,
        at: DateTime<Utc>,
    },
    /// The tracker returned to idle (no trackable tab focused).
    WentIdle { at: DateTime<Utc> },
    /// The day-to-day streak advanced or restarted.
    StreakUpdated { current_streak: u32, at: DateTime<Utc> },
    /// An achievement unlocked; carries the notification payload.
    AchievementUnlocked {
        id: String,
        title: String,
        description: String,
        points: u32,
        at: DateTime<Utc>,
    },
    /// Tracking was enabled or disabled via the message channel.
    TrackingToggled { tracking: bool, at: DateTime<Utc> },
    /// All aggregates and derived state were cleared.
    DataReset { at: DateTime<Utc> },
}
