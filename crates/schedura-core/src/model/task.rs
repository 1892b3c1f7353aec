use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::error::ValidationError;

fn default_score() -> u8 {
    3
}

/// A to-do item scored on importance and urgency (1..=5 each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_score")]
    pub importance: u8,
    #[serde(default = "default_score")]
    pub urgency: u8,
    #[serde(default)]
    pub completed: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    /// Points credited for the current completion, revoked on re-open.
    #[serde(default)]
    pub points_awarded: u32,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: String::new(),
            category_id: None,
            due_date: None,
            importance: default_score(),
            urgency: default_score(),
            completed: false,
            created_at: super::now(),
            completed_at: None,
            points_awarded: 0,
        }
    }

    pub fn priority_score(&self) -> u32 {
        crate::suggest::priority_score(self.importance, self.urgency)
    }

    pub fn quadrant(&self) -> crate::suggest::Quadrant {
        crate::suggest::priority_quadrant(self.importance, self.urgency)
    }

    /// Due before `today` and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()));
        }
        validate_score("importance", self.importance)?;
        validate_score("urgency", self.urgency)?;
        Ok(())
    }
}

pub(crate) fn validate_score(field: &str, value: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_neutral_and_open() {
        let task = Task::new("Write report");
        assert_eq!(task.importance, 3);
        assert_eq!(task.urgency, 3);
        assert!(!task.completed);
        assert_eq!(task.points_awarded, 0);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_title_and_bad_scores() {
        let mut task = Task::new("   ");
        assert_eq!(
            task.validate(),
            Err(ValidationError::EmptyField("title".to_string()))
        );

        task.title = "ok".to_string();
        task.urgency = 6;
        assert!(matches!(
            task.validate(),
            Err(ValidationError::ScoreOutOfRange { value: 6, .. })
        ));
    }

    #[test]
    fn legacy_task_without_scores_defaults_to_three() {
        let json = r#"{
            "id": "t1",
            "title": "Call dentist",
            "created_at": "2024-03-01T09:30:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.importance, 3);
        assert_eq!(task.urgency, 3);
        assert_eq!(task.description, "");
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut task = Task::new("File taxes");
        task.due_date = NaiveDate::from_ymd_opt(2024, 5, 9);
        assert!(task.is_overdue(today));
        task.completed = true;
        assert!(!task.is_overdue(today));
    }
}
