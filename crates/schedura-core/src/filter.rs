//! Record filters for list views.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Event, Goal, Habit, Task};
use crate::range::{within, DateBounds};
use crate::suggest::Quadrant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Open => !completed,
            Self::Completed => completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" | "pending" | "active" => Ok(Self::Open),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Task list filter. Bounds apply to the due date; tasks without one are
/// excluded whenever bounds are set.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub bounds: Option<DateBounds>,
    pub category_id: Option<String>,
    pub status: StatusFilter,
    pub quadrant: Option<Quadrant>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(bounds) = &self.bounds {
            match task.due_date {
                Some(due) if bounds.contains(due) => {}
                _ => return false,
            }
        }
        if let Some(category_id) = &self.category_id {
            if task.category_id.as_ref() != Some(category_id) {
                return false;
            }
        }
        if let Some(quadrant) = self.quadrant {
            if task.quadrant() != quadrant {
                return false;
            }
        }
        self.status.matches(task.completed)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Events starting within `bounds`, ordered by start time.
pub fn events_in<'a>(events: &'a [Event], bounds: Option<&DateBounds>) -> Vec<&'a Event> {
    let mut found: Vec<&Event> = events
        .iter()
        .filter(|e| within(bounds, e.start_time.date()))
        .collect();
    found.sort_by_key(|e| e.start_time);
    found
}

/// Habits with at least one check-in within `bounds`.
pub fn habits_active_in<'a>(habits: &'a [Habit], bounds: Option<&DateBounds>) -> Vec<&'a Habit> {
    habits
        .iter()
        .filter(|h| match bounds {
            None => true,
            Some(b) => h.check_ins.iter().any(|d| b.contains(*d)),
        })
        .collect()
}

/// Goals whose target date falls within `bounds`.
pub fn goals_due_in<'a>(goals: &'a [Goal], bounds: Option<&DateBounds>) -> Vec<&'a Goal> {
    goals
        .iter()
        .filter(|g| match bounds {
            None => true,
            Some(b) => g.target_date.is_some_and(|d| b.contains(d)),
        })
        .collect()
}
