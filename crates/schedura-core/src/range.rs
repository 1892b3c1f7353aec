//! Named date ranges resolved against a reference day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inclusive `[from, to]` day bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateBounds {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let from = self.from;
        (0..self.days()).map(move |offset| from + Duration::days(offset))
    }
}

/// `true` when `bounds` is unbounded or contains `date`.
pub fn within(bounds: Option<&DateBounds>, date: NaiveDate) -> bool {
    bounds.map_or(true, |b| b.contains(date))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Next7Days,
    ThisMonth,
    Last7Days,
    Last30Days,
    Last90Days,
    AllTime,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl DateRange {
    /// Inclusive bounds relative to `today`; `None` means unbounded.
    pub fn resolve(&self, today: NaiveDate) -> Result<Option<DateBounds>, ValidationError> {
        let bounds = match *self {
            Self::Today => DateBounds::single(today),
            Self::Next7Days => DateBounds {
                from: today,
                to: today + Duration::days(6),
            },
            Self::ThisMonth => DateBounds {
                from: first_of_month(today),
                to: last_of_month(today),
            },
            Self::Last7Days => trailing(today, 7),
            Self::Last30Days => trailing(today, 30),
            Self::Last90Days => trailing(today, 90),
            Self::AllTime => return Ok(None),
            Self::Custom { from, to } => DateBounds::new(from, to)?,
        };
        Ok(Some(bounds))
    }
}

fn trailing(today: NaiveDate, days: i64) -> DateBounds {
    DateBounds {
        from: today - Duration::days(days),
        to: today,
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn last_of_month(day: NaiveDate) -> NaiveDate {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(day)
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::Next7Days => f.write_str("next-7-days"),
            Self::ThisMonth => f.write_str("this-month"),
            Self::Last7Days => f.write_str("last-7-days"),
            Self::Last30Days => f.write_str("last-30-days"),
            Self::Last90Days => f.write_str("last-90-days"),
            Self::AllTime => f.write_str("all"),
            Self::Custom { from, to } => write!(f, "{from}..{to}"),
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    /// Named tokens, or `YYYY-MM-DD..YYYY-MM-DD` for a custom range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace('_', "-");
        match token.as_str() {
            "today" => Ok(Self::Today),
            "next-7-days" | "week" => Ok(Self::Next7Days),
            "this-month" | "month" => Ok(Self::ThisMonth),
            "last-7-days" => Ok(Self::Last7Days),
            "last-30-days" => Ok(Self::Last30Days),
            "last-90-days" => Ok(Self::Last90Days),
            "all" | "all-time" => Ok(Self::AllTime),
            other => {
                let (from, to) = other
                    .split_once("..")
                    .ok_or_else(|| format!("unknown date range: {s}"))?;
                let parse = |v: &str| {
                    NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                        .map_err(|e| format!("invalid date '{v}': {e}"))
                };
                Ok(Self::Custom {
                    from: parse(from)?,
                    to: parse(to)?,
                })
            }
        }
    }
}
