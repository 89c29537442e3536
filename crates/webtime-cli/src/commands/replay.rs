use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Deserialize;
use webtime_core::Tracker;

/// One entry of a recorded host event log. Timestamps are RFC 3339.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostEvent {
    FocusChanged {
        tab_id: u64,
        #[serde(default)]
        url: Option<String>,
        at: DateTime<Local>,
    },
    TabClosed {
        tab_id: u64,
        at: DateTime<Local>,
    },
    Tick {
        at: DateTime<Local>,
    },
}

impl HostEvent {
    fn at(&self) -> DateTime<Local> {
        match self {
            HostEvent::FocusChanged { at, .. }
            | HostEvent::TabClosed { at, .. }
            | HostEvent::Tick { at } => *at,
        }
    }
}

pub fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(file)?;
    let log: Vec<HostEvent> = serde_json::from_str(&raw)?;

    let start = log.first().map_or_else(Local::now, HostEvent::at);
    let mut tracker = Tracker::open(start)?;
    let mut emitted = tracker.startup(start);

    for entry in log {
        let events = match entry {
            HostEvent::FocusChanged { tab_id, url, at } => {
                tracker.on_focus_changed(tab_id, url.as_deref(), at)
            }
            HostEvent::TabClosed { tab_id, at } => tracker.on_tab_closed(tab_id, at),
            HostEvent::Tick { at } => tracker.tick(at),
        };
        emitted.extend(events);
    }

    println!("{}", serde_json::to_string_pretty(&emitted)?);
    Ok(())
}
