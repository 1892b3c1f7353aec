pub mod calendar;
pub mod category;
pub mod completions;
pub mod config;
pub mod data;
pub mod event;
pub mod goal;
pub mod habit;
pub mod profile;
pub mod reward;
pub mod stats;
pub mod suggest;
pub mod task;

use std::error::Error;

use chrono::{NaiveDate, NaiveDateTime};
use schedura_core::model::today;
use schedura_core::{Config, DateBounds, DateRange, Document, Session};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Open the configured document.
pub fn open_session() -> Result<Session, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(Session::open(&config)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `YYYY-MM-DD`, `today` or `tomorrow`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today()),
        "tomorrow" => Ok(today() + chrono::Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{s}': {e}")),
    }
}

/// `YYYY-MM-DD HH:MM`, with `T` accepted as the separator and optional seconds.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
        .ok_or_else(|| format!("invalid date-time '{s}' (expected YYYY-MM-DD HH:MM)"))
}

/// Resolve a `--range` flag against today; no flag means all time.
pub fn resolve_range(range: Option<DateRange>) -> Result<Option<DateBounds>, Box<dyn Error>> {
    match range {
        Some(range) => Ok(range.resolve(today())?),
        None => Ok(None),
    }
}

/// Accept a category id or a case-insensitive name.
pub fn category_id(document: &Document, key: &str) -> Result<String, Box<dyn Error>> {
    document
        .category(key)
        .or_else(|| document.category_by_name(key))
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("unknown category: {key}").into())
}

/// Parse a snake_case enum value the same way the data file stores it.
pub fn parse_enum<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T, String> {
    let token = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(token))
        .map_err(|_| format!("invalid {field}: {value}"))
}

/// Destructive commands refuse to run without `--yes`.
pub fn require_confirmation(yes: bool, what: &str) -> CommandResult {
    if yes {
        Ok(())
    } else {
        Err(format!("refusing to {what} without --yes").into())
    }
}
