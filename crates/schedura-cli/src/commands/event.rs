//! Calendar event commands for CLI.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Subcommand;
use schedura_core::filter::events_in;
use schedura_core::model::today;
use schedura_core::suggest::SlotFinder;
use schedura_core::{DateRange, Event, EventPatch};

use super::{
    category_id, open_session, parse_date, parse_datetime, print_json, resolve_range,
    CommandResult,
};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create an event
    Add {
        /// Event title
        title: String,
        /// Start (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// End (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse_datetime, conflicts_with = "minutes")]
        end: Option<NaiveDateTime>,
        /// Length in minutes instead of an end time
        #[arg(long, default_value = "60")]
        minutes: i64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        /// Category name or id
        #[arg(long)]
        category: Option<String>,
        /// Linked task ID
        #[arg(long)]
        task: Option<String>,
    },
    /// List events by start date
    List {
        #[arg(long)]
        range: Option<DateRange>,
    },
    /// Update an event
    Update {
        /// Event ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_datetime)]
        start: Option<NaiveDateTime>,
        #[arg(long, value_parser = parse_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// New category name or id
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
    /// Free windows on a day
    Free {
        /// Day (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: EventAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        EventAction::Add {
            title,
            start,
            end,
            minutes,
            description,
            location,
            category,
            task,
        } => {
            let end = end.unwrap_or(start + Duration::minutes(minutes));
            let mut event = Event::new(title, start, end);
            event.description = description;
            event.location = location;
            event.category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            event.task_id = task;
            print_json(&session.add_event(event)?)?;
        }
        EventAction::List { range } => {
            let bounds = resolve_range(range)?;
            print_json(&events_in(&session.document().events, bounds.as_ref()))?;
        }
        EventAction::Update {
            id,
            title,
            start,
            end,
            description,
            location,
            category,
        } => {
            let category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            let patch = EventPatch {
                title,
                description,
                location,
                category_id: category_id.map(Some),
                start_time: start,
                end_time: end,
            };
            print_json(&session.update_event(&id, patch)?)?;
        }
        EventAction::Delete { id } => print_json(&session.delete_event(&id)?)?,
        EventAction::Free { date } => {
            let document = session.document();
            let finder = SlotFinder::from_config(session.suggestion_config());
            let windows = finder.free_windows(
                &document.events,
                &document.profile.productivity_peaks,
                date.unwrap_or_else(today),
            );
            print_json(&windows)?;
        }
    }
    Ok(())
}
