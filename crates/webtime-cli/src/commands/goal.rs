use chrono::{Duration, Local, Utc};
use clap::{Subcommand, ValueEnum};
use uuid::Uuid;
use webtime_core::{GoalType, Tracker};

#[derive(Clone, Copy, ValueEnum)]
pub enum GoalKind {
    /// Hours spent in the matching category
    Time,
    /// Number of visits in the matching category
    Visits,
}

impl From<GoalKind> for GoalType {
    fn from(kind: GoalKind) -> Self {
        match kind {
            GoalKind::Time => GoalType::Time,
            GoalKind::Visits => GoalType::VisitCount,
        }
    }
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Goal title
        title: String,
        /// What the target measures
        #[arg(long = "type", value_enum, default_value = "time")]
        kind: GoalKind,
        /// Target value (hours or visit count)
        #[arg(long)]
        target: f64,
        /// Goal category (productivity, limitation, leisure, ...)
        #[arg(long, default_value = "productivity")]
        category: String,
        /// Days until the goal is due
        #[arg(long, default_value = "30")]
        due_days: i64,
    },
    /// List goals with current progress
    List,
    /// Mark a goal completed
    Done {
        /// Goal ID
        id: Uuid,
    },
    /// Remove a goal
    Remove {
        /// Goal ID
        id: Uuid,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut tracker = Tracker::open(now)?;

    match action {
        GoalAction::Add {
            title,
            kind,
            target,
            category,
            due_days,
        } => {
            let due = now.with_timezone(&Utc) + Duration::days(due_days);
            let goal = tracker.add_goal(&title, kind.into(), target, &category, due, now)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List => {
            let goals = tracker.goals_with_progress();
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Done { id } => match tracker.complete_goal(id, now) {
            Some(events) => println!("{}", serde_json::to_string_pretty(&events)?),
            None => return Err(format!("no goal with id {id}").into()),
        },
        GoalAction::Remove { id } => {
            if !tracker.remove_goal(id) {
                return Err(format!("no goal with id {id}").into());
            }
            println!("{{\"removed\": \"{id}\"}}");
        }
    }
    Ok(())
}
