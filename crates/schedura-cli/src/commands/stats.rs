use clap::Subcommand;
use schedura_core::model::today;
use schedura_core::DateRange;

use super::{open_session, print_json, resolve_range, CommandResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Tasks, goals, habits, events and categories over a range
    Summary {
        /// today, last-7-days, last-30-days, last-90-days, all or FROM..TO
        #[arg(long, default_value = "last-30-days")]
        range: DateRange,
    },
}

pub fn run(action: StatsAction) -> CommandResult {
    let session = open_session()?;
    match action {
        StatsAction::Summary { range } => {
            let bounds = resolve_range(Some(range))?;
            print_json(&session.summary(bounds, today()))?;
        }
    }
    Ok(())
}
