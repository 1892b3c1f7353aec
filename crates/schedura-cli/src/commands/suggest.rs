//! Heuristic suggestion commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use schedura_core::model::today;
use schedura_core::suggest::suggest_slot;

use super::{open_session, parse_date, print_json, CommandResult};

#[derive(Subcommand)]
pub enum SuggestAction {
    /// Category, importance, urgency and duration for a task text
    Task {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// First free calendar slot
    Slot {
        /// Required length in minutes
        #[arg(long, default_value = "60")]
        minutes: u32,
        /// First day to search (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: SuggestAction) -> CommandResult {
    let session = open_session()?;
    match action {
        SuggestAction::Task { title, description } => {
            print_json(&session.suggest(&title, &description))?;
        }
        SuggestAction::Slot { minutes, date } => {
            let document = session.document();
            let slot = suggest_slot(
                minutes,
                &document.events,
                &document.profile.productivity_peaks,
                date.unwrap_or_else(today),
                session.suggestion_config(),
            );
            print_json(&slot)?;
        }
    }
    Ok(())
}
