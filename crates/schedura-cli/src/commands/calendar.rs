//! ICS exchange and calendar sync commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use schedura_core::{CalendarSyncProvider, DateRange, NoopSyncProvider};

use super::{open_session, print_json, resolve_range, CommandResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Write events as an .ics document
    Export {
        /// Only events starting in this range
        #[arg(long)]
        range: Option<DateRange>,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import events from an .ics file
    Import {
        /// Path to the .ics file
        file: PathBuf,
    },
    /// Push local events to a provider and pull its events back
    Sync {
        /// Provider name
        #[arg(long, default_value = "noop")]
        provider: String,
        #[arg(long, default_value = "")]
        client_id: String,
        #[arg(long, default_value = "")]
        client_secret: String,
        /// Authorization code
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long)]
        range: Option<DateRange>,
    },
}

pub fn run(action: CalendarAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        CalendarAction::Export { range, output } => {
            let bounds = resolve_range(range)?;
            let ics = session.export_ics(bounds.as_ref());
            match output {
                Some(path) => {
                    std::fs::write(&path, ics)?;
                    eprintln!("Calendar exported to {}", path.display());
                }
                None => print!("{ics}"),
            }
        }
        CalendarAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            print_json(&session.import_ics(&text)?)?;
        }
        CalendarAction::Sync {
            provider,
            client_id,
            client_secret,
            code,
            range,
        } => {
            let mut provider: Box<dyn CalendarSyncProvider> = match provider.as_str() {
                "noop" => Box::new(NoopSyncProvider::new()),
                other => return Err(format!("unknown calendar provider: {other}").into()),
            };
            provider.authenticate(&client_id, &client_secret, &code)?;
            let bounds = resolve_range(range)?;
            print_json(&session.sync_calendar(&*provider, bounds.as_ref())?)?;
        }
    }
    Ok(())
}
