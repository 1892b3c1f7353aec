//! Habits and streak derivation.
//!
//! Streaks are never edited directly; they are recomputed from the check-in
//! log. Two check-ins belong to the same run when the gap between them is at
//! most the habit's expected interval. Weekday and weekend habits instead
//! break a run only when a due day between two check-ins was skipped. The
//! current run survives only while the reference date is still linked to the
//! latest check-in by the same rule.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    #[serde(alias = "Daily")]
    Daily,
    /// Monday to Friday.
    #[serde(alias = "Weekdays")]
    Weekdays,
    /// Saturday and Sunday.
    #[serde(alias = "Weekends")]
    Weekends,
    #[serde(alias = "Weekly")]
    Weekly,
    Custom { every_days: u32 },
}

impl Frequency {
    /// Expected number of days between check-ins.
    pub fn interval_days(&self) -> i64 {
        match self {
            Self::Daily | Self::Weekdays => 1,
            Self::Weekends | Self::Weekly => 7,
            Self::Custom { every_days } => i64::from((*every_days).max(1)),
        }
    }

    /// Whether a check-in is expected on `date`.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        match self {
            Self::Weekdays => !weekend,
            Self::Weekends => weekend,
            _ => true,
        }
    }

    /// True when nothing due was missed strictly between the two dates.
    fn links(&self, earlier: NaiveDate, later: NaiveDate) -> bool {
        match self {
            Self::Weekdays | Self::Weekends => {
                let mut day = earlier + Duration::days(1);
                while day < later {
                    if self.is_due(day) {
                        return false;
                    }
                    day += Duration::days(1);
                }
                true
            }
            _ => (later - earlier).num_days() <= self.interval_days(),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    /// Accepts `daily`, `weekdays`, `weekends`, `weekly` or a day count such as `3` / `every-3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "daily" => Ok(Self::Daily),
            "weekdays" => Ok(Self::Weekdays),
            "weekends" => Ok(Self::Weekends),
            "weekly" => Ok(Self::Weekly),
            other => {
                let digits = other.trim_start_matches("every-");
                digits
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .map(|every_days| Self::Custom { every_days })
                    .ok_or_else(|| format!("unknown frequency: {other}"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    /// Sorted, without duplicates.
    #[serde(default)]
    pub check_ins: Vec<NaiveDate>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    pub created_at: NaiveDateTime,
}

impl Habit {
    pub fn new(title: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: String::new(),
            frequency,
            category_id: None,
            check_ins: Vec::new(),
            current_streak: 0,
            best_streak: 0,
            created_at: super::now(),
        }
    }

    /// Log a check-in for `date` and refresh streaks as of `today`.
    pub fn check_in(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        match self.check_ins.binary_search(&date) {
            Ok(_) => Err(ValidationError::DuplicateCheckIn(date)),
            Err(pos) => {
                self.check_ins.insert(pos, date);
                self.refresh_streaks(today);
                Ok(())
            }
        }
    }

    pub fn is_checked_in(&self, date: NaiveDate) -> bool {
        self.check_ins.binary_search(&date).is_ok()
    }

    pub fn clear_history(&mut self) {
        self.check_ins.clear();
        self.current_streak = 0;
    }

    /// Recompute streaks relative to `today`. `best_streak` never drops.
    pub fn refresh_streaks(&mut self, today: NaiveDate) {
        self.check_ins.sort_unstable();
        self.check_ins.dedup();
        let (current, best) = compute_streaks(&self.check_ins, self.frequency, today);
        self.current_streak = current;
        self.best_streak = self.best_streak.max(best);
    }
}

/// Returns `(current, best)` for a sorted, de-duplicated check-in log.
pub fn compute_streaks(
    check_ins: &[NaiveDate],
    frequency: Frequency,
    today: NaiveDate,
) -> (u32, u32) {
    let Some(&latest) = check_ins.last() else {
        return (0, 0);
    };
    let mut run = 1u32;
    let mut best = 1u32;
    for pair in check_ins.windows(2) {
        if frequency.links(pair[0], pair[1]) {
            run += 1;
        } else {
            run = 1;
        }
        best = best.max(run);
    }

    let current = if today <= latest || frequency.links(latest, today) {
        run
    } else {
        0
    };
    (current, best)
}
