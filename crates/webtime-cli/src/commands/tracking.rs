use chrono::Local;
use clap::Subcommand;
use webtime_core::Tracker;

#[derive(Subcommand)]
pub enum TrackingAction {
    /// Enable tracking
    On,
    /// Disable tracking
    Off,
}

pub fn run(action: TrackingAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut tracker = Tracker::open(now)?;
    let enabled = matches!(action, TrackingAction::On);
    let event = tracker.toggle_tracking(enabled, now);
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
