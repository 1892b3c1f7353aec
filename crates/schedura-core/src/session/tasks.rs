use chrono::NaiveDate;

use super::Session;
use crate::error::{CoreError, EntityKind, Result};
use crate::model::{self, EntityId, Event, Task};
use crate::suggest::{estimate_duration, suggest_slot};

/// Field changes for [`Session::update_task`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Option<EntityId>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub importance: Option<u8>,
    pub urgency: Option<u8>,
}

impl TaskPatch {
    fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(importance) = self.importance {
            task.importance = importance;
        }
        if let Some(urgency) = self.urgency {
            task.urgency = urgency;
        }
    }
}

impl Session {
    fn task_index(&self, id: &str) -> Result<usize> {
        self.document
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id))
    }

    pub fn add_task(&mut self, mut task: Task) -> Result<Task> {
        task.validate()?;
        self.require_category(task.category_id.as_deref())?;
        task.completed = false;
        task.completed_at = None;
        task.points_awarded = 0;
        self.document.tasks.push(task.clone());
        self.persist("add_task")?;
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let index = self.task_index(id)?;
        let mut task = self.document.tasks[index].clone();
        patch.apply(&mut task);
        task.validate()?;
        self.require_category(task.category_id.as_deref())?;
        self.document.tasks[index] = task.clone();
        self.persist("update_task")?;
        Ok(task)
    }

    /// Mark done and award task points. Completing a done task is a no-op.
    pub fn complete_task(&mut self, id: &str) -> Result<Task> {
        self.set_task_completed(id, true)
    }

    /// Re-open a done task, revoking exactly the points it earned.
    pub fn reopen_task(&mut self, id: &str) -> Result<Task> {
        self.set_task_completed(id, false)
    }

    pub fn set_task_completed(&mut self, id: &str, completed: bool) -> Result<Task> {
        let index = self.task_index(id)?;
        if self.document.tasks[index].completed == completed {
            return Ok(self.document.tasks[index].clone());
        }

        if completed {
            let points = self.points.task;
            let task = &mut self.document.tasks[index];
            task.completed = true;
            task.completed_at = Some(model::now());
            task.points_awarded = points;
            self.award(points);
        } else {
            let task = &mut self.document.tasks[index];
            let points = std::mem::take(&mut task.points_awarded);
            task.completed = false;
            task.completed_at = None;
            self.revoke(points);
        }
        self.persist(if completed { "complete_task" } else { "reopen_task" })?;
        Ok(self.document.tasks[index].clone())
    }

    /// Remove a task. Events scheduled for it stay but lose the link.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let index = self.task_index(id)?;
        let task = self.document.tasks.remove(index);
        for event in &mut self.document.events {
            if event.task_id.as_deref() == Some(id) {
                event.task_id = None;
            }
        }
        self.persist("delete_task")?;
        Ok(task)
    }

    /// Book a calendar slot for the task on or after `day`.
    ///
    /// Without an explicit duration the task's estimate is used.
    pub fn schedule_task(
        &mut self,
        id: &str,
        day: NaiveDate,
        duration_minutes: Option<u32>,
    ) -> Result<Event> {
        let index = self.task_index(id)?;
        let task = &self.document.tasks[index];
        let minutes = duration_minutes.unwrap_or_else(|| estimate_duration(task));
        let slot = suggest_slot(
            minutes,
            &self.document.events,
            &self.document.profile.productivity_peaks,
            day,
            &self.suggestions,
        );

        let mut event = Event::new(task.title.clone(), slot.start, slot.end);
        event.description = task.description.clone();
        event.category_id = task.category_id.clone();
        event.task_id = Some(task.id.clone());
        event.validate()?;
        tracing::debug!(task = %task.title, start = %slot.start, minutes, "task scheduled");

        self.document.events.push(event.clone());
        self.persist("schedule_task")?;
        Ok(event)
    }
}
