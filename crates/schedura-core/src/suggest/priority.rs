//! Eisenhower-style priority from importance and urgency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Task;

/// Priority bucket derived from importance and urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Critical,
    High,
    Medium,
    Low,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown quadrant '{s}' (critical, high, medium, low)"))
    }
}

/// Both at least 4 is Critical, exactly one is High, both at most 2 is Low.
pub fn priority_quadrant(importance: u8, urgency: u8) -> Quadrant {
    match (importance >= 4, urgency >= 4) {
        (true, true) => Quadrant::Critical,
        (true, false) | (false, true) => Quadrant::High,
        _ if importance <= 2 && urgency <= 2 => Quadrant::Low,
        _ => Quadrant::Medium,
    }
}

pub fn priority_score(importance: u8, urgency: u8) -> u32 {
    u32::from(importance) * u32::from(urgency)
}

/// The `n` open tasks with the highest score, keeping input order on ties.
pub fn next_tasks(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut open: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    open.sort_by(|a, b| b.priority_score().cmp(&a.priority_score()));
    open.truncate(n);
    open
}

/// Rough effort estimate in minutes.
pub fn estimate_duration(task: &Task) -> u32 {
    estimate_minutes(&task.title, &task.description, task.importance, task.urgency)
}

pub(crate) fn estimate_minutes(title: &str, description: &str, importance: u8, urgency: u8) -> u32 {
    let mut minutes: i64 = if importance >= 4 || urgency >= 4 {
        90
    } else if importance <= 2 && urgency <= 2 {
        30
    } else {
        60
    };

    let title_len = title.chars().count();
    if title_len > 50 {
        minutes += 30;
    } else if title_len < 20 {
        minutes -= 15;
    }
    if description.chars().count() > 200 {
        minutes += 30;
    }
    minutes.max(15) as u32
}
