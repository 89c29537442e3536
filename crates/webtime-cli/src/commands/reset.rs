use chrono::Local;
use webtime_core::Tracker;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut tracker = Tracker::open(now)?;
    let event = tracker.reset(now);
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
