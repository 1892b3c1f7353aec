use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::error::ValidationError;

/// Where an event came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    #[default]
    Local,
    IcsImport,
    Sync,
}

/// A calendar entry. `end_time` is exclusive and always after `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Task this event was scheduled from. Not owning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<EntityId>,
    #[serde(default)]
    pub source: EventSource,
    /// UID in an external calendar (ICS file or sync provider).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uid: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            category_id: None,
            start_time,
            end_time,
            task_id: None,
            source: EventSource::Local,
            external_uid: None,
            created_at: Some(super::now()),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// `[start, end)` intersects `[other_start, other_end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }

    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_time.date() == date
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()));
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn end_must_follow_start() {
        let event = Event::new("Standup", at(9, 0), at(9, 0));
        assert!(matches!(
            event.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
        let event = Event::new("Standup", at(9, 0), at(9, 15));
        assert!(event.validate().is_ok());
        assert_eq!(event.duration_minutes(), 15);
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let event = Event::new("Review", at(10, 0), at(11, 0));
        assert!(!event.overlaps(at(11, 0), at(12, 0)));
        assert!(!event.overlaps(at(9, 0), at(10, 0)));
        assert!(event.overlaps(at(10, 30), at(10, 45)));
        assert!(event.overlaps(at(9, 0), at(12, 0)));
    }
}
