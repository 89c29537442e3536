use chrono::Local;
use webtime_core::{Request, Tracker};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut tracker = Tracker::open(now)?;
    let response = tracker.handle_request(Request::GetData, now);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
