//! The session tracking engine.
//!
//! [`Tracker`] is a wall-clock-based state machine. It has no internal
//! threads and never looks at the clock itself - the host loop delivers
//! focus events and calls `tick()` periodically, passing an explicit
//! `now`. All handlers run to completion; there is no locking because
//! at most one session exists and every mutation happens inside one
//! handler call.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Tracking(domain, tab, started_at) -> Idle
//! ```
//!
//! A focus change flushes the elapsed time of the previous session into
//! the aggregate store when it falls inside `(0, 3600]` seconds, then
//! either starts a new session or goes idle. The periodic tick flushes
//! partial time in `(10, 3600]` without leaving the Tracking state,
//! bounding data loss on crash to one tick interval.

use chrono::{DateTime, Local, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::achievements::{AchievementBook, Snapshot};
use crate::aggregate::Aggregates;
use crate::domain::canonical_domain;
use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::goals::{self, Goal, GoalType};
use crate::storage::{Config, KvStore, SqliteStore, TrackingConfig};
use crate::streak::{StreakState, TemporalFlags};

/// Lower bound (exclusive) for flushing on an explicit focus change.
pub const MIN_FLUSH_SECS: i64 = 0;
/// Lower bound (exclusive) for flushing from the periodic tick.
pub const PERIODIC_MIN_FLUSH_SECS: i64 = 10;
/// Upper bound (inclusive) for any flush. Larger deltas are implausible
/// (system sleep, host clock jumps) and are discarded, not flushed.
pub const MAX_FLUSH_SECS: i64 = 3600;

// Persistence keys, one per piece of durable state.
const KEY_DOMAIN_TIMES: &str = "domain_times";
const KEY_STREAK: &str = "streak";
const KEY_FLAGS: &str = "temporal_flags";
const KEY_ACHIEVEMENTS: &str = "achievements";
const KEY_GOALS: &str = "goals";
const KEY_FOCUS_SESSIONS: &str = "focus_sessions";
const KEY_TRACKING_ENABLED: &str = "tracking_enabled";

/// The single in-flight focus period. Ephemeral: its effect on durable
/// state happens only through flushes into the aggregate mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub domain: String,
    pub tab_id: u64,
    pub started_at: DateTime<Utc>,
}

/// The tracking engine and the owner of all engine state.
pub struct Tracker {
    aggregates: Aggregates,
    session: Option<ActiveSession>,
    tracking_enabled: bool,
    streak: StreakState,
    flags: TemporalFlags,
    focus_sessions: u64,
    goals: Vec<Goal>,
    achievements: AchievementBook,
    tick_interval_secs: u64,
    store: Box<dyn KvStore>,
}

impl Tracker {
    /// Open the tracker against the default SQLite store and TOML
    /// config.
    ///
    /// # Errors
    /// Returns an error if the store or configuration cannot be opened.
    pub fn open(now: DateTime<Local>) -> Result<Self, CoreError> {
        let config = Config::load()?;
        let store = SqliteStore::open()?;
        Ok(Self::with_store(Box::new(store), &config.tracking, now))
    }

    /// Build a tracker over an arbitrary store, loading whatever state
    /// it already holds. Missing keys fall back to defaults; corrupt
    /// values are logged and replaced by defaults.
    pub fn with_store(
        store: Box<dyn KvStore>,
        config: &TrackingConfig,
        now: DateTime<Local>,
    ) -> Self {
        let aggregates = load_key(store.as_ref(), KEY_DOMAIN_TIMES).unwrap_or_default();
        let streak = load_key(store.as_ref(), KEY_STREAK).unwrap_or_default();
        let flags = load_key(store.as_ref(), KEY_FLAGS).unwrap_or_default();
        let achievements = load_key(store.as_ref(), KEY_ACHIEVEMENTS).unwrap_or_default();
        let focus_sessions = load_key(store.as_ref(), KEY_FOCUS_SESSIONS).unwrap_or(0);
        let tracking_enabled =
            load_key(store.as_ref(), KEY_TRACKING_ENABLED).unwrap_or(config.enabled);
        let goals: Vec<Goal> = load_key(store.as_ref(), KEY_GOALS)
            .unwrap_or_else(|| goals::default_goals(now.with_timezone(&Utc)));

        Self {
            aggregates,
            session: None,
            tracking_enabled,
            streak,
            flags,
            focus_sessions,
            goals,
            achievements,
            tick_interval_secs: config.tick_interval_secs,
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn is_tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn flags(&self) -> TemporalFlags {
        self.flags
    }

    pub fn focus_sessions(&self) -> u64 {
        self.focus_sessions
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    /// Seconds between periodic ticks the host loop should honor.
    pub fn tick_interval_secs(&self) -> u64 {
        self.tick_interval_secs
    }

    /// Tear the tracker down, handing the store back (used by tests to
    /// verify reload behavior).
    pub fn into_store(self) -> Box<dyn KvStore> {
        self.store
    }

    /// Goals with their `progress` field refreshed from the current
    /// aggregates.
    pub fn goals_with_progress(&self) -> Vec<Goal> {
        self.goals
            .iter()
            .map(|g| {
                let mut goal = g.clone();
                goal.progress = goals::progress(g, &self.aggregates);
                goal
            })
            .collect()
    }

    // ── Host events ──────────────────────────────────────────────────

    /// The user focused tab `tab_id`, now showing `url`. Also fired
    /// when the focused tab's URL changes in place. `url = None` means
    /// the tab vanished before it could be inspected; the session start
    /// is aborted and the tracker goes idle.
    pub fn on_focus_changed(
        &mut self,
        tab_id: u64,
        url: Option<&str>,
        now: DateTime<Local>,
    ) -> Vec<Event> {
        if !self.tracking_enabled {
            return Vec::new();
        }
        let now_utc = now.with_timezone(&Utc);
        let was_tracking = self.session.is_some();
        let mut events = Vec::new();

        events.extend(self.flush_session(MIN_FLUSH_SECS, now_utc));

        let domain = url.and_then(canonical_domain);
        match domain {
            Some(domain) => {
                self.session = Some(ActiveSession {
                    domain: domain.clone(),
                    tab_id,
                    started_at: now_utc,
                });
                if self.flags.observe_at(&now) {
                    self.persist(KEY_FLAGS);
                }
                events.push(Event::SessionStarted {
                    domain,
                    tab_id,
                    at: now_utc,
                });
            }
            None => {
                if url.is_none() {
                    log::debug!("focus change on tab {tab_id}: tab lookup failed, going idle");
                }
                self.session = None;
                if was_tracking {
                    events.push(Event::WentIdle { at: now_utc });
                }
            }
        }

        events.extend(self.evaluate_achievements(now_utc));
        events
    }

    /// The tab currently being tracked was closed. Events for other
    /// tabs are ignored.
    pub fn on_tab_closed(&mut self, tab_id: u64, now: DateTime<Local>) -> Vec<Event> {
        if !self.tracking_enabled {
            return Vec::new();
        }
        if self.session.as_ref().map(|s| s.tab_id) != Some(tab_id) {
            return Vec::new();
        }
        let now_utc = now.with_timezone(&Utc);
        let mut events: Vec<Event> = self.flush_session(MIN_FLUSH_SECS, now_utc).into_iter().collect();
        self.session = None;
        events.push(Event::WentIdle { at: now_utc });
        events.extend(self.evaluate_achievements(now_utc));
        events
    }

    /// The periodic tick. Runs the streak detector, flushes partial
    /// session time in `(10, 3600]` seconds without leaving the
    /// Tracking state, and re-evaluates achievements.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let now_utc = now.with_timezone(&Utc);
        let mut events = Vec::new();

        if self.streak.observe(now.date_naive()) {
            self.persist(KEY_STREAK);
            events.push(Event::StreakUpdated {
                current_streak: self.streak.current_streak,
                at: now_utc,
            });
        }

        if self.tracking_enabled && self.session.is_some() {
            let due = self.session.as_ref().and_then(|s| {
                let elapsed = (now_utc - s.started_at).num_seconds();
                (elapsed > PERIODIC_MIN_FLUSH_SECS && elapsed <= MAX_FLUSH_SECS)
                    .then(|| (s.domain.clone(), elapsed as u64))
            });
            if let Some((domain, seconds)) = due {
                self.aggregates.accumulate(&domain, seconds, now_utc);
                self.persist(KEY_DOMAIN_TIMES);
                if let Some(session) = &mut self.session {
                    session.started_at = now_utc;
                }
                events.push(Event::SessionFlushed {
                    domain,
                    seconds,
                    at: now_utc,
                });
            }
            if self.flags.observe_at(&now) {
                self.persist(KEY_FLAGS);
            }
        }

        events.extend(self.evaluate_achievements(now_utc));
        events
    }

    /// Run the once-per-process-start observations: streak continuity
    /// and a first achievement pass over the loaded state.
    pub fn startup(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let now_utc = now.with_timezone(&Utc);
        let mut events = Vec::new();
        if self.streak.observe(now.date_naive()) {
            self.persist(KEY_STREAK);
            events.push(Event::StreakUpdated {
                current_streak: self.streak.current_streak,
                at: now_utc,
            });
        }
        events.extend(self.evaluate_achievements(now_utc));
        events
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enable or disable tracking. Disabling discards any in-flight
    /// session without flushing it; focus events are ignored until
    /// tracking is re-enabled.
    pub fn toggle_tracking(&mut self, tracking: bool, now: DateTime<Local>) -> Event {
        self.tracking_enabled = tracking;
        if !tracking {
            self.session = None;
        }
        self.persist(KEY_TRACKING_ENABLED);
        Event::TrackingToggled {
            tracking,
            at: now.with_timezone(&Utc),
        }
    }

    /// Record one completed focus session (the countdown timer in the
    /// user-facing layer finished).
    pub fn record_focus_session(&mut self, now: DateTime<Local>) -> Vec<Event> {
        self.focus_sessions += 1;
        self.persist(KEY_FOCUS_SESSIONS);
        self.evaluate_achievements(now.with_timezone(&Utc))
    }

    /// Add a validated goal.
    ///
    /// # Errors
    /// Rejects empty titles and non-positive targets before anything
    /// reaches engine state.
    pub fn add_goal(
        &mut self,
        title: &str,
        goal_type: GoalType,
        target: f64,
        category: &str,
        due_date: DateTime<Utc>,
        now: DateTime<Local>,
    ) -> Result<Goal, ValidationError> {
        let goal = Goal::new(
            title,
            goal_type,
            target,
            category,
            due_date,
            now.with_timezone(&Utc),
        )?;
        self.goals.push(goal.clone());
        self.persist(KEY_GOALS);
        Ok(goal)
    }

    /// Mark the goal with `id` completed. Returns any achievement
    /// unlocks this triggers, or `None` if the goal does not exist.
    pub fn complete_goal(&mut self, id: uuid::Uuid, now: DateTime<Local>) -> Option<Vec<Event>> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.completed = true;
        self.persist(KEY_GOALS);
        Some(self.evaluate_achievements(now.with_timezone(&Utc)))
    }

    /// Remove the goal with `id`. Returns `true` when it existed.
    pub fn remove_goal(&mut self, id: uuid::Uuid) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let removed = self.goals.len() != before;
        if removed {
            self.persist(KEY_GOALS);
        }
        removed
    }

    /// Clear every aggregate and all derived state back to defaults:
    /// empty mapping, zero streak, cleared flags, default goals, all
    /// achievements re-locked. The tracking-enabled flag is left alone.
    pub fn reset(&mut self, now: DateTime<Local>) -> Event {
        let now_utc = now.with_timezone(&Utc);
        self.aggregates.clear();
        self.session = None;
        self.streak.reset();
        self.flags.reset();
        self.focus_sessions = 0;
        self.goals = goals::default_goals(now_utc);
        self.achievements.reset();

        self.persist(KEY_DOMAIN_TIMES);
        self.persist(KEY_STREAK);
        self.persist(KEY_FLAGS);
        self.persist(KEY_FOCUS_SESSIONS);
        self.persist(KEY_GOALS);
        self.persist(KEY_ACHIEVEMENTS);

        Event::DataReset { at: now_utc }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Flush the current session if its elapsed time falls inside
    /// `(min_exclusive, MAX_FLUSH_SECS]`. Out-of-window elapsed time is
    /// silently discarded. Leaves `self.session` untouched; callers
    /// decide the next state.
    fn flush_session(&mut self, min_exclusive: i64, now_utc: DateTime<Utc>) -> Option<Event> {
        let session = self.session.as_ref()?;
        let elapsed = (now_utc - session.started_at).num_seconds();
        if elapsed <= min_exclusive || elapsed > MAX_FLUSH_SECS {
            return None;
        }
        let domain = session.domain.clone();
        self.aggregates.accumulate(&domain, elapsed as u64, now_utc);
        self.persist(KEY_DOMAIN_TIMES);
        Some(Event::SessionFlushed {
            domain,
            seconds: elapsed as u64,
            at: now_utc,
        })
    }

    fn evaluate_achievements(&mut self, now_utc: DateTime<Utc>) -> Vec<Event> {
        let completed_goals = self.goals.iter().filter(|g| g.completed).count() as u32;
        let snapshot = Snapshot {
            domains: &self.aggregates,
            focus_sessions: self.focus_sessions,
            streak: self.streak.current_streak,
            night_session: self.flags.night_session,
            weekend_tracking: self.flags.weekend_tracking,
            completed_goals,
        };
        let events = self.achievements.evaluate(&snapshot, now_utc);
        if !events.is_empty() {
            self.persist(KEY_ACHIEVEMENTS);
        }
        events
    }

    /// Write one piece of state through to the store. Failures are
    /// logged and absorbed; the in-memory state stays authoritative and
    /// the next successful write carries the delta forward.
    fn persist(&mut self, key: &str) {
        let value = match key {
            KEY_DOMAIN_TIMES => serde_json::to_string(&self.aggregates),
            KEY_STREAK => serde_json::to_string(&self.streak),
            KEY_FLAGS => serde_json::to_string(&self.flags),
            KEY_ACHIEVEMENTS => serde_json::to_string(&self.achievements),
            KEY_GOALS => serde_json::to_string(&self.goals),
            KEY_FOCUS_SESSIONS => serde_json::to_string(&self.focus_sessions),
            KEY_TRACKING_ENABLED => serde_json::to_string(&self.tracking_enabled),
            other => {
                log::warn!("unknown persistence key '{other}'");
                return;
            }
        };
        match value {
            Ok(json) => {
                if let Err(e) = self.store.set(key, &json) {
                    log::warn!("failed to persist '{key}': {e}");
                }
            }
            Err(e) => log::warn!("failed to encode '{key}': {e}"),
        }
    }
}

fn load_key<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log::warn!("failed to read '{key}': {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("corrupt value for '{key}', using defaults: {e}");
            None
        }
    }
}
