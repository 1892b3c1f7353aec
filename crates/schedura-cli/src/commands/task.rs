//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use schedura_core::model::today;
use schedura_core::suggest::{estimate_duration, next_tasks, Quadrant};
use schedura_core::{DateRange, StatusFilter, Task, TaskFilter, TaskPatch};

use super::{category_id, open_session, parse_date, print_json, resolve_range, CommandResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Category name or id (suggested from the text when omitted)
        #[arg(long)]
        category: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        /// Importance 1-5 (suggested when omitted)
        #[arg(long)]
        importance: Option<u8>,
        /// Urgency 1-5 (suggested when omitted)
        #[arg(long)]
        urgency: Option<u8>,
    },
    /// List tasks
    List {
        /// Due-date range (today, next-7-days, this-month, all, FROM..TO)
        #[arg(long)]
        range: Option<DateRange>,
        /// Category name or id
        #[arg(long)]
        category: Option<String>,
        /// all, open or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// critical, high, medium or low
        #[arg(long)]
        quadrant: Option<Quadrant>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category name or id
        #[arg(long, conflicts_with = "no_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        no_category: bool,
        /// New due date
        #[arg(long, value_parser = parse_date, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        no_due: bool,
        /// New importance
        #[arg(long)]
        importance: Option<u8>,
        /// New urgency
        #[arg(long)]
        urgency: Option<u8>,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Mark a completed task open again
    Reopen {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Highest-priority open tasks
    Next {
        /// How many tasks to show
        #[arg(long, default_value = "3")]
        count: usize,
    },
    /// Book a calendar slot for a task
    Schedule {
        /// Task ID
        id: String,
        /// First day to search (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Duration in minutes (default: the task's estimate)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Estimated duration in minutes
    Estimate {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        TaskAction::Add {
            title,
            description,
            category,
            due,
            importance,
            urgency,
        } => {
            let suggestion = session.suggest(&title, &description);
            let mut task = Task::new(title);
            task.description = description;
            task.category_id = match category {
                Some(key) => Some(category_id(session.document(), &key)?),
                None => suggestion.category_id,
            };
            task.due_date = due;
            task.importance = importance.unwrap_or(suggestion.importance);
            task.urgency = urgency.unwrap_or(suggestion.urgency);
            let task = session.add_task(task)?;
            print_json(&task)?;
        }
        TaskAction::List {
            range,
            category,
            status,
            quadrant,
        } => {
            let category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            let filter = TaskFilter {
                bounds: resolve_range(range)?,
                category_id,
                status,
                quadrant,
            };
            print_json(&filter.apply(&session.document().tasks))?;
        }
        TaskAction::Get { id } => match session.document().task(&id) {
            Some(task) => print_json(task)?,
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Update {
            id,
            title,
            description,
            category,
            no_category,
            due,
            no_due,
            importance,
            urgency,
        } => {
            let category_id = match (category, no_category) {
                (Some(key), _) => Some(Some(category_id(session.document(), &key)?)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let due_date = match (due, no_due) {
                (Some(date), _) => Some(Some(date)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let patch = TaskPatch {
                title,
                description,
                category_id,
                due_date,
                importance,
                urgency,
            };
            print_json(&session.update_task(&id, patch)?)?;
        }
        TaskAction::Complete { id } => print_json(&session.complete_task(&id)?)?,
        TaskAction::Reopen { id } => print_json(&session.reopen_task(&id)?)?,
        TaskAction::Delete { id } => {
            let task = session.delete_task(&id)?;
            eprintln!("Task deleted: {}", task.title);
            print_json(&task)?;
        }
        TaskAction::Next { count } => {
            print_json(&next_tasks(&session.document().tasks, count))?;
        }
        TaskAction::Schedule { id, date, minutes } => {
            let event = session.schedule_task(&id, date.unwrap_or_else(today), minutes)?;
            print_json(&event)?;
        }
        TaskAction::Estimate { id } => {
            let task = session
                .document()
                .task(&id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            print_json(&serde_json::json!({
                "id": task.id,
                "estimated_minutes": estimate_duration(task),
            }))?;
        }
    }
    Ok(())
}
