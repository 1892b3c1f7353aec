use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            completed: false,
        }
    }
}

/// A long-term goal broken into ordered milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Percent of milestones done, rounded down.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub points_awarded: u32,
    pub created_at: NaiveDateTime,
}

impl Goal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: String::new(),
            category_id: None,
            target_date: None,
            milestones: Vec::new(),
            progress: 0,
            completed: false,
            completed_at: None,
            points_awarded: 0,
            created_at: super::now(),
        }
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// floor(done * 100 / total); 0 when there are no milestones.
    pub fn compute_progress(&self) -> u8 {
        let total = self.milestones.len();
        if total == 0 {
            return 0;
        }
        (self.completed_milestones() * 100 / total) as u8
    }

    pub fn all_milestones_done(&self) -> bool {
        !self.milestones.is_empty() && self.milestones.iter().all(|m| m.completed)
    }
}
