use chrono::NaiveDate;

use super::Session;
use crate::error::{CoreError, EntityKind, Result, ValidationError};
use crate::model::{EntityId, Frequency, Habit};

#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub category_id: Option<Option<EntityId>>,
}

impl Session {
    fn habit_index(&self, id: &str) -> Result<usize> {
        self.document
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Habit, id))
    }

    pub fn add_habit(&mut self, mut habit: Habit, today: NaiveDate) -> Result<Habit> {
        if habit.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()).into());
        }
        self.require_category(habit.category_id.as_deref())?;
        habit.refresh_streaks(today);
        self.document.habits.push(habit.clone());
        self.persist("add_habit")?;
        Ok(habit)
    }

    pub fn update_habit(&mut self, id: &str, patch: HabitPatch, today: NaiveDate) -> Result<Habit> {
        let index = self.habit_index(id)?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyField("title".to_string()).into());
            }
        }
        if let Some(Some(category_id)) = &patch.category_id {
            self.require_category(Some(category_id))?;
        }

        let habit = &mut self.document.habits[index];
        if let Some(title) = patch.title {
            habit.title = title;
        }
        if let Some(description) = patch.description {
            habit.description = description;
        }
        if let Some(frequency) = patch.frequency {
            habit.frequency = frequency;
        }
        if let Some(category_id) = patch.category_id {
            habit.category_id = category_id;
        }
        habit.refresh_streaks(today);
        self.persist("update_habit")?;
        Ok(self.document.habits[index].clone())
    }

    /// Log a check-in for `date` and award check-in points.
    ///
    /// Dates after `today` and repeated dates are rejected.
    pub fn check_in_habit(&mut self, id: &str, date: NaiveDate, today: NaiveDate) -> Result<Habit> {
        let index = self.habit_index(id)?;
        if date > today {
            return Err(ValidationError::InvalidValue {
                field: "date".to_string(),
                message: format!("{date} is in the future"),
            }
            .into());
        }
        self.document.habits[index].check_in(date, today)?;
        self.award(self.points.habit_check_in);

        let habit = &self.document.habits[index];
        tracing::debug!(habit = %habit.title, streak = habit.current_streak, "checked in");
        self.persist("check_in_habit")?;
        Ok(self.document.habits[index].clone())
    }

    /// Recompute every habit's streaks as of `today`.
    pub fn refresh_habits(&mut self, today: NaiveDate) -> Result<()> {
        let mut changed = false;
        for habit in &mut self.document.habits {
            let before = (habit.current_streak, habit.best_streak);
            habit.refresh_streaks(today);
            changed |= before != (habit.current_streak, habit.best_streak);
        }
        if changed {
            self.persist("refresh_habits")?;
        }
        Ok(())
    }

    pub fn clear_habit_history(&mut self, id: &str) -> Result<Habit> {
        let index = self.habit_index(id)?;
        self.document.habits[index].clear_history();
        self.persist("clear_habit_history")?;
        Ok(self.document.habits[index].clone())
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<Habit> {
        let index = self.habit_index(id)?;
        let habit = self.document.habits.remove(index);
        self.persist("delete_habit")?;
        Ok(habit)
    }
}
