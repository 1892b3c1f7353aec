//! Free-slot search over calendar events.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::{Event, ProductivityPeak};
use crate::storage::SuggestionConfig;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// Finds the first conflict-free slot for a piece of work.
#[derive(Debug, Clone)]
pub struct SlotFinder {
    step_minutes: i64,
    lookahead_days: i64,
    default_start_hour: u32,
}

impl SlotFinder {
    /// 30-minute steps, a week of lookahead, starting at 09:00.
    pub fn new() -> Self {
        Self {
            step_minutes: 30,
            lookahead_days: 7,
            default_start_hour: 9,
        }
    }

    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self::new()
            .with_step(config.slot_step_minutes)
            .with_lookahead(config.lookahead_days)
            .with_default_start_hour(config.default_start_hour)
    }

    pub fn with_step(mut self, minutes: u32) -> Self {
        self.step_minutes = i64::from(minutes.max(1));
        self
    }

    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = i64::from(days);
        self
    }

    pub fn with_default_start_hour(mut self, hour: u32) -> Self {
        self.default_start_hour = hour.min(23);
        self
    }

    fn start_hour(&self, peaks: &[ProductivityPeak]) -> u32 {
        peaks
            .iter()
            .map(|p| p.start_hour())
            .min()
            .unwrap_or(self.default_start_hour)
    }

    /// First slot of `duration_minutes` that overlaps no event.
    ///
    /// Scans `day` from the earliest productive peak, then the following
    /// days from the same hour. Only the start has to fall on the scanned
    /// day; the slot may run past midnight. When the whole lookahead window
    /// is busy the slot is placed after the latest event.
    pub fn find(
        &self,
        duration_minutes: u32,
        events: &[Event],
        peaks: &[ProductivityPeak],
        day: NaiveDate,
    ) -> TimeRange {
        let duration = Duration::minutes(i64::from(duration_minutes).max(self.step_minutes));
        let step = Duration::minutes(self.step_minutes);
        let start_time =
            NaiveTime::from_hms_opt(self.start_hour(peaks), 0, 0).unwrap_or(NaiveTime::MIN);

        for offset in 0..=self.lookahead_days {
            let date = day + Duration::days(offset);
            let midnight = (date + Duration::days(1)).and_time(NaiveTime::MIN);
            let mut t = date.and_time(start_time);
            while t < midnight {
                let end = t + duration;
                if !events.iter().any(|e| e.overlaps(t, end)) {
                    return TimeRange::new(t, end);
                }
                t += step;
            }
        }

        let after_window = (day + Duration::days(self.lookahead_days + 1)).and_time(start_time);
        let start = events
            .iter()
            .map(|e| e.end_time)
            .max()
            .map_or(after_window, |latest| latest.max(after_window));
        tracing::debug!(%start, "no free slot in lookahead window");
        TimeRange::new(start, start + duration)
    }

    /// Free windows between `day`'s events, from the start hour to midnight.
    pub fn free_windows(
        &self,
        events: &[Event],
        peaks: &[ProductivityPeak],
        day: NaiveDate,
    ) -> Vec<TimeRange> {
        let start_time =
            NaiveTime::from_hms_opt(self.start_hour(peaks), 0, 0).unwrap_or(NaiveTime::MIN);
        let day_start = day.and_time(start_time);
        let day_end = (day + Duration::days(1)).and_time(NaiveTime::MIN);

        let mut busy: Vec<&Event> = events
            .iter()
            .filter(|e| e.overlaps(day_start, day_end))
            .collect();
        busy.sort_by_key(|e| e.start_time);

        let mut windows = Vec::new();
        let mut cursor = day_start;
        for event in busy {
            if event.end_time <= cursor {
                continue;
            }
            if event.start_time > cursor {
                windows.push(TimeRange::new(cursor, event.start_time));
            }
            cursor = event.end_time;
        }
        if cursor < day_end {
            windows.push(TimeRange::new(cursor, day_end));
        }
        windows
            .into_iter()
            .filter(|w| w.duration_minutes() >= self.step_minutes)
            .collect()
    }
}

impl Default for SlotFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SlotFinder::find`] with the configured step, lookahead and start hour.
pub fn suggest_slot(
    duration_minutes: u32,
    events: &[Event],
    peaks: &[ProductivityPeak],
    day: NaiveDate,
    config: &SuggestionConfig,
) -> TimeRange {
    SlotFinder::from_config(config).find(duration_minutes, events, peaks, day)
}
