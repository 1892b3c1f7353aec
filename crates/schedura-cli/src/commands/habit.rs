//! Habit tracking commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use schedura_core::filter::habits_active_in;
use schedura_core::model::today;
use schedura_core::{DateRange, Frequency, Habit, HabitPatch};

use super::{category_id, open_session, parse_date, print_json, resolve_range, CommandResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Add {
        /// Habit title
        title: String,
        /// daily, weekdays, weekends, weekly or a day count such as 3
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        #[arg(long, default_value = "")]
        description: String,
        /// Category name or id
        #[arg(long)]
        category: Option<String>,
    },
    /// List habits with streaks as of today
    List {
        /// Only habits with check-ins in this range
        #[arg(long)]
        range: Option<DateRange>,
    },
    /// Record a check-in
    CheckIn {
        /// Habit ID
        id: String,
        /// Day to check in (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        frequency: Option<Frequency>,
        /// New category name or id
        #[arg(long)]
        category: Option<String>,
    },
    /// Clear all check-ins
    Clear {
        /// Habit ID
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> CommandResult {
    let mut session = open_session()?;
    let today = today();
    match action {
        HabitAction::Add {
            title,
            frequency,
            description,
            category,
        } => {
            let mut habit = Habit::new(title, frequency);
            habit.description = description;
            habit.category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            print_json(&session.add_habit(habit, today)?)?;
        }
        HabitAction::List { range } => {
            session.refresh_habits(today)?;
            let bounds = resolve_range(range)?;
            print_json(&habits_active_in(&session.document().habits, bounds.as_ref()))?;
        }
        HabitAction::CheckIn { id, date } => {
            let habit = session.check_in_habit(&id, date.unwrap_or(today), today)?;
            print_json(&habit)?;
        }
        HabitAction::Update {
            id,
            title,
            description,
            frequency,
            category,
        } => {
            let category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            let patch = HabitPatch {
                title,
                description,
                frequency,
                category_id: category_id.map(Some),
            };
            print_json(&session.update_habit(&id, patch, today)?)?;
        }
        HabitAction::Clear { id } => print_json(&session.clear_habit_history(&id)?)?,
        HabitAction::Delete { id } => print_json(&session.delete_habit(&id)?)?,
    }
    Ok(())
}
