//! Goals and goal progress.
//!
//! Goals are owned by the user-facing layer; the engine validates them
//! at the boundary, stores them, and derives progress from the
//! aggregate mapping. Invalid goals (empty title, non-positive target)
//! never reach the engine state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregates;
use crate::classify::Productivity;
use crate::error::ValidationError;

/// What a goal's `target` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Target is hours of tracked time.
    Time,
    /// Target is a number of focus periods.
    VisitCount,
}

/// A user goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub goal_type: GoalType,
    pub target: f64,
    pub category: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Build a validated goal.
    ///
    /// # Errors
    /// Rejects empty titles and non-positive targets.
    pub fn new(
        title: &str,
        goal_type: GoalType,
        target: f64,
        category: &str,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "title".to_string(),
            });
        }
        if !target.is_finite() || target <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "target".to_string(),
                value: target,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            goal_type,
            target,
            category: category.to_string(),
            due_date,
            completed: false,
            progress: 0.0,
            created_at: now,
        })
    }
}

/// Map a goal category to the productivity class it counts, or `None`
/// for "all domains".
fn class_for_category(category: &str) -> Option<Productivity> {
    match category {
        "productivity" => Some(Productivity::Productive),
        "limitation" | "leisure" => Some(Productivity::Distracting),
        _ => None,
    }
}

/// Derive a goal's current progress from the aggregate mapping.
///
/// The goal's category selects which domains count: `"productivity"`
/// counts Productive domains, `"limitation"` and `"leisure"` count
/// Distracting domains, and any other category counts every domain.
/// `Time` goals report the matching `total_seconds` sum in hours;
/// `VisitCount` goals report the matching `session_count` sum.
pub fn progress(goal: &Goal, aggregates: &Aggregates) -> f64 {
    let class = class_for_category(&goal.category);
    match goal.goal_type {
        GoalType::Time => {
            let seconds: u64 = aggregates
                .iter()
                .filter(|(_, a)| class.map_or(true, |c| a.productivity == c))
                .map(|(_, a)| a.total_seconds)
                .sum();
            seconds as f64 / 3600.0
        }
        GoalType::VisitCount => aggregates.sessions_by_class(class) as f64,
    }
}

/// The default goal set seeded on first run and after a reset.
pub fn default_goals(now: DateTime<Utc>) -> Vec<Goal> {
    vec![
        Goal {
            id: Uuid::new_v4(),
            title: "Complete 4 productive hours daily".to_string(),
            goal_type: GoalType::Time,
            target: 4.0,
            category: "productivity".to_string(),
            due_date: now + Duration::days(30),
            completed: false,
            progress: 0.0,
            created_at: now,
        },
        Goal {
            id: Uuid::new_v4(),
            title: "Limit social media to 1 hour".to_string(),
            goal_type: GoalType::Time,
            target: 1.0,
            category: "limitation".to_string(),
            due_date: now + Duration::days(7),
            completed: false,
            progress: 0.0,
            created_at: now,
        },
    ]
}
