//! Achievement rule engine.
//!
//! A fixed, ordered table of declarative achievements. Each definition
//! carries a pure predicate over an immutable [`Snapshot`]; the engine
//! walks the table in order, unlocks monotonically, and emits one
//! notification event per unlock. Re-evaluating an unchanged snapshot
//! unlocks nothing, and an unlock is never reverted even if the
//! predicate later turns false again (only a full reset re-locks).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregates;
use crate::classify::Productivity;
use crate::events::Event;

/// Immutable read of the state achievements are judged against.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub domains: &'a Aggregates,
    pub focus_sessions: u64,
    pub streak: u32,
    pub night_session: bool,
    pub weekend_tracking: bool,
    pub completed_goals: u32,
}

/// One achievement definition. Predicates must not mutate anything.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
    pub check: fn(&Snapshot) -> bool,
}

/// Domain name fragments counted as social media.
const SOCIAL_FRAGMENTS: &[&str] = &[
    "facebook", "twitter", "instagram", "linkedin", "tiktok", "youtube",
];

/// Domain name fragments counted as educational.
const EDUCATIONAL_FRAGMENTS: &[&str] = &["coursera", "udemy", "khanacademy", "edx", "codecademy"];

fn first_steps(snap: &Snapshot) -> bool {
    !snap.domains.is_empty()
}

fn productivity_master(snap: &Snapshot) -> bool {
    snap.domains.seconds_by_class(Productivity::Productive) >= 36_000
}

fn focus_warrior(snap: &Snapshot) -> bool {
    snap.focus_sessions >= 5
}

fn explorer(snap: &Snapshot) -> bool {
    snap.domains.len() >= 20
}

fn early_bird(snap: &Snapshot) -> bool {
    snap.streak >= 7
}

fn night_owl(snap: &Snapshot) -> bool {
    snap.night_session
}

fn time_traveler(snap: &Snapshot) -> bool {
    snap.domains.total_seconds() >= 86_400
}

fn goal_crusher(snap: &Snapshot) -> bool {
    snap.completed_goals >= 5
}

fn balanced_life(snap: &Snapshot) -> bool {
    let productive = snap.domains.seconds_by_class(Productivity::Productive) as f64;
    let distracting = snap.domains.seconds_by_class(Productivity::Distracting) as f64;
    productive > 0.0
        && distracting > 0.0
        && (productive - distracting).abs() < productive.max(distracting) * 0.3
}

fn weekend_warrior(snap: &Snapshot) -> bool {
    snap.weekend_tracking
}

fn social_butterfly(snap: &Snapshot) -> bool {
    let count = snap
        .domains
        .iter()
        .filter(|(domain, _)| SOCIAL_FRAGMENTS.iter().any(|s| domain.contains(s)))
        .count();
    count >= 5
}

fn learning_champion(snap: &Snapshot) -> bool {
    let seconds: u64 = snap
        .domains
        .iter()
        .filter(|(domain, _)| EDUCATIONAL_FRAGMENTS.iter().any(|e| domain.contains(e)))
        .map(|(_, agg)| agg.total_seconds)
        .sum();
    seconds >= 18_000
}

/// The fixed achievement table, in evaluation order.
pub const DEFINITIONS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_steps",
        title: "First Steps",
        description: "Track your first website",
        points: 10,
        check: first_steps,
    },
    AchievementDef {
        id: "productivity_master",
        title: "Productivity Master",
        description: "Spend 10 productive hours",
        points: 50,
        check: productivity_master,
    },
    AchievementDef {
        id: "focus_warrior",
        title: "Focus Warrior",
        description: "Complete 5 focus sessions",
        points: 30,
        check: focus_warrior,
    },
    AchievementDef {
        id: "explorer",
        title: "Explorer",
        description: "Visit 20 different websites",
        points: 40,
        check: explorer,
    },
    AchievementDef {
        id: "early_bird",
        title: "Early Bird",
        description: "Track time for 7 consecutive days",
        points: 60,
        check: early_bird,
    },
    AchievementDef {
        id: "night_owl",
        title: "Night Owl",
        description: "Track time after 10 PM",
        points: 25,
        check: night_owl,
    },
    AchievementDef {
        id: "time_traveler",
        title: "Time Traveler",
        description: "Track over 24 hours total",
        points: 75,
        check: time_traveler,
    },
    AchievementDef {
        id: "goal_crusher",
        title: "Goal Crusher",
        description: "Complete 5 goals",
        points: 45,
        check: goal_crusher,
    },
    AchievementDef {
        id: "balanced_life",
        title: "Balanced Life",
        description: "Balance productive and leisure time",
        points: 35,
        check: balanced_life,
    },
    AchievementDef {
        id: "weekend_warrior",
        title: "Weekend Warrior",
        description: "Track time on both weekend days",
        points: 20,
        check: weekend_warrior,
    },
    AchievementDef {
        id: "social_butterfly",
        title: "Social Butterfly",
        description: "Visit 5 different social media sites",
        points: 30,
        check: social_butterfly,
    },
    AchievementDef {
        id: "learning_champion",
        title: "Learning Champion",
        description: "Spend 5 hours on educational sites",
        points: 55,
        check: learning_champion,
    },
];

/// Display row for one achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub unlocked: bool,
}

/// Tracks which achievements have unlocked. Only the unlocked id set is
/// persisted; titles, points and predicates live in [`DEFINITIONS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementBook {
    unlocked: BTreeSet<String>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every locked achievement against `snapshot`, in
    /// definition order. Returns one notification event per new unlock;
    /// an empty vec means nothing changed.
    pub fn evaluate(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        for def in DEFINITIONS {
            if self.unlocked.contains(def.id) {
                continue;
            }
            if (def.check)(snapshot) {
                self.unlocked.insert(def.id.to_string());
                events.push(Event::AchievementUnlocked {
                    id: def.id.to_string(),
                    title: def.title.to_string(),
                    description: def.description.to_string(),
                    points: def.points,
                    at: now,
                });
            }
        }
        events
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Sum of points across unlocked achievements.
    pub fn total_points(&self) -> u32 {
        DEFINITIONS
            .iter()
            .filter(|d| self.unlocked.contains(d.id))
            .map(|d| d.points)
            .sum()
    }

    /// Full table with unlock status, in definition order.
    pub fn statuses(&self) -> Vec<AchievementStatus> {
        DEFINITIONS
            .iter()
            .map(|d| AchievementStatus {
                id: d.id.to_string(),
                title: d.title.to_string(),
                description: d.description.to_string(),
                points: d.points,
                unlocked: self.unlocked.contains(d.id),
            })
            .collect()
    }

    /// Re-lock everything (full reset).
    pub fn reset(&mut self) {
        self.unlocked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn empty_snapshot(aggs: &Aggregates) -> Snapshot<'_> {
        Snapshot {
            domains: aggs,
            focus_sessions: 0,
            streak: 0,
            night_session: false,
            weekend_tracking: false,
            completed_goals: 0,
        }
    }

    #[test]
    fn first_steps_unlocks_on_first_domain() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("example.org", 10, now());
        let mut book = AchievementBook::new();

        let events = book.evaluate(&empty_snapshot(&aggs), now());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::AchievementUnlocked { id, points: 10, .. } if id == "first_steps"
        ));
        assert_eq!(book.total_points(), 10);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("example.org", 10, now());
        let mut book = AchievementBook::new();

        assert_eq!(book.evaluate(&empty_snapshot(&aggs), now()).len(), 1);
        assert!(book.evaluate(&empty_snapshot(&aggs), now()).is_empty());
        assert_eq!(book.unlocked_count(), 1);
    }

    #[test]
    fn unlock_survives_predicate_turning_false() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("example.org", 10, now());
        let mut book = AchievementBook::new();
        book.evaluate(&empty_snapshot(&aggs), now());

        // The aggregates shrinking does not re-lock anything.
        let empty = Aggregates::new();
        assert!(book.evaluate(&empty_snapshot(&empty), now()).is_empty());
        assert!(book.is_unlocked("first_steps"));
    }

    #[test]
    fn productivity_master_threshold() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("github.com", 35_999, now());
        let mut book = AchievementBook::new();
        book.evaluate(&empty_snapshot(&aggs), now());
        assert!(!book.is_unlocked("productivity_master"));

        aggs.accumulate("github.com", 1, now());
        book.evaluate(&empty_snapshot(&aggs), now());
        assert!(book.is_unlocked("productivity_master"));
    }

    #[test]
    fn balanced_life_requires_both_sides() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("github.com", 1000, now());
        let mut book = AchievementBook::new();
        book.evaluate(&empty_snapshot(&aggs), now());
        assert!(!book.is_unlocked("balanced_life"));

        aggs.accumulate("youtube.com", 900, now());
        book.evaluate(&empty_snapshot(&aggs), now());
        assert!(book.is_unlocked("balanced_life"));
    }

    #[test]
    fn counter_driven_predicates() {
        let aggs = Aggregates::new();
        let mut book = AchievementBook::new();
        let snap = Snapshot {
            domains: &aggs,
            focus_sessions: 5,
            streak: 7,
            night_session: true,
            weekend_tracking: true,
            completed_goals: 5,
        };
        let events = book.evaluate(&snap, now());
        let ids: Vec<_> = events
            .iter()
            .map(|e| match e {
                Event::AchievementUnlocked { id, .. } => id.clone(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                "focus_warrior",
                "early_bird",
                "night_owl",
                "goal_crusher",
                "weekend_warrior"
            ]
        );
    }

    #[test]
    fn reset_relocks_everything() {
        let mut aggs = Aggregates::new();
        aggs.accumulate("example.org", 10, now());
        let mut book = AchievementBook::new();
        book.evaluate(&empty_snapshot(&aggs), now());
        assert!(book.total_points() > 0);

        book.reset();
        assert_eq!(book.unlocked_count(), 0);
        assert_eq!(book.total_points(), 0);
        // And the same unlock can fire again afterwards.
        assert_eq!(book.evaluate(&empty_snapshot(&aggs), now()).len(), 1);
    }
}
