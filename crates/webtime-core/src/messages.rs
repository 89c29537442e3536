//! The request/response message channel.
//!
//! Mirrors the command surface the host exposes to external consumers
//! (popup, dashboard, CLI). Requests are tagged by `action` so recorded
//! message logs stay readable.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregates;
use crate::session::Tracker;
use crate::stats::StatsSummary;

/// Commands accepted over the message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Clear all aggregates, goals, achievements, streak and flags.
    Reset,
    /// The raw domain mapping plus the tracking flag.
    GetData,
    /// Derived summary counts and the focus score.
    GetStats,
    /// Enable or disable tracking.
    ToggleTracking { tracking: bool },
}

/// Responses over the message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ack {
        success: bool,
    },
    Data {
        domain_times: Aggregates,
        is_tracking: bool,
    },
    Stats(StatsSummary),
}

impl Tracker {
    /// Dispatch one message-channel request.
    pub fn handle_request(&mut self, request: Request, now: DateTime<Local>) -> Response {
        match request {
            Request::Reset => {
                self.reset(now);
                Response::Ack { success: true }
            }
            Request::GetData => Response::Data {
                domain_times: self.aggregates().clone(),
                is_tracking: self.is_tracking_enabled(),
            },
            Request::GetStats => Response::Stats(StatsSummary::from_aggregates(
                self.aggregates(),
                self.is_tracking_enabled(),
            )),
            Request::ToggleTracking { tracking } => {
                self.toggle_tracking(tracking, now);
                Response::Ack { success: true }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TrackingConfig};
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn tracker() -> Tracker {
        Tracker::with_store(Box::new(MemoryStore::new()), &TrackingConfig::default(), now())
    }

    #[test]
    fn request_wire_format() {
        let req: Request = serde_json::from_str(r#"{"action":"getData"}"#).unwrap();
        assert_eq!(req, Request::GetData);
        let req: Request =
            serde_json::from_str(r#"{"action":"toggleTracking","tracking":false}"#).unwrap();
        assert_eq!(req, Request::ToggleTracking { tracking: false });
    }

    #[test]
    fn get_stats_reports_counts() {
        let mut t = tracker();
        t.on_focus_changed(1, Some("https://github.com/x"), now());
        t.on_tab_closed(1, now() + chrono::Duration::seconds(90));

        match t.handle_request(Request::GetStats, now()) {
            Response::Stats(stats) => {
                assert_eq!(stats.total_domains, 1);
                assert_eq!(stats.productive_count, 1);
                assert_eq!(stats.focus_score, 100);
                assert!(stats.is_tracking);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn reset_acks_and_clears() {
        let mut t = tracker();
        t.on_focus_changed(1, Some("https://github.com/x"), now());
        t.on_tab_closed(1, now() + chrono::Duration::seconds(90));

        let resp = t.handle_request(Request::Reset, now());
        assert_eq!(resp, Response::Ack { success: true });
        match t.handle_request(Request::GetData, now()) {
            Response::Data { domain_times, .. } => assert!(domain_times.is_empty()),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn toggle_tracking_round_trip() {
        let mut t = tracker();
        t.handle_request(Request::ToggleTracking { tracking: false }, now());
        match t.handle_request(Request::GetData, now()) {
            Response::Data { is_tracking, .. } => assert!(!is_tracking),
            other => panic!("unexpected response {other:?}"),
        }
    }
}
