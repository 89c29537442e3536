//! Persistence layer.
//!
//! The engine only assumes an abstract durable key-value contract:
//! string keys mapped to JSON-encoded values, read once at startup and
//! written through after every mutation. Two implementations are
//! provided: a SQLite-backed store for real use and an in-memory store
//! for tests.

mod config;
pub mod memory;
pub mod sqlite;

pub use config::{Config, TrackingConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Abstract durable key-value store.
///
/// Values are JSON strings; decoding is the caller's concern. A failed
/// `set` leaves the in-memory state authoritative until the next
/// successful write, so implementations must not partially apply a
/// write.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Returns the webtime data directory, creating it if needed.
///
/// Defaults to `~/.config/webtime/`; set WEBTIME_DATA_DIR to override
/// (used by tests and for development profiles).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("WEBTIME_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("webtime"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
