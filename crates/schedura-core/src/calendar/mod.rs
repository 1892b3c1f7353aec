//! Calendar exchange: ICS files and remote sync providers.

pub mod ics;
mod provider;

pub use ics::{export_events, parse_events, ImportReport, IcsEvent, ParsedCalendar};
pub use provider::{CalendarSyncProvider, NoopSyncProvider};

use serde::Serialize;

/// Outcome of one sync round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub provider: String,
    pub pushed: usize,
    pub pulled: usize,
    pub updated: usize,
}
