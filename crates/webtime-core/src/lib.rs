//! # Webtime Core Library
//!
//! Core engine for Webtime, a browser usage tracker. It turns an
//! unreliable stream of tab focus events into durable per-domain time
//! aggregates, then derives productivity stats, streaks, achievements
//! and goal progress from them. The host environment (browser bridge,
//! CLI replayer, GUI) stays a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Tracker**: a wall-clock-based state machine driven entirely by
//!   the caller - host events and a periodic `tick()`, each with an
//!   explicit `now`
//! - **Storage**: an abstract key-value contract with SQLite and
//!   in-memory implementations, written through after every mutation
//! - **Rule layers**: productivity classification, streak detection and
//!   a fixed achievement table evaluated over immutable snapshots
//!
//! ## Key Components
//!
//! - [`Tracker`]: session state machine and owner of all engine state
//! - [`Aggregates`]: the domain → usage mapping
//! - [`AchievementBook`]: monotonic achievement unlock state
//! - [`KvStore`]: persistence contract

pub mod achievements;
pub mod aggregate;
pub mod classify;
pub mod domain;
pub mod error;
pub mod events;
pub mod goals;
pub mod messages;
pub mod session;
pub mod stats;
pub mod storage;
pub mod streak;

pub use achievements::{AchievementBook, AchievementStatus, Snapshot};
pub use aggregate::{Aggregates, DomainAggregate};
pub use classify::{classify, Productivity};
pub use domain::canonical_domain;
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use goals::{Goal, GoalType};
pub use messages::{Request, Response};
pub use session::{ActiveSession, Tracker};
pub use stats::{focus_score, StatsSummary};
pub use storage::{Config, KvStore, MemoryStore, SqliteStore, TrackingConfig};
pub use streak::{StreakState, TemporalFlags};
