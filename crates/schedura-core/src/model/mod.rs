//! Planner data model.
//!
//! The [`Document`] is the single root aggregate: it owns every collection.
//! Tasks, goals, habits and events point at categories by id only.

pub mod category;
pub mod document;
pub mod event;
pub mod goal;
pub mod habit;
pub mod profile;
pub mod reward;
pub mod task;

pub use category::{Category, CategoryDomain};
pub use document::{CategoryUsage, Document, SCHEMA_VERSION};
pub use event::{Event, EventSource};
pub use goal::{Goal, Milestone};
pub use habit::{compute_streaks, Frequency, Habit};
pub use profile::{
    BreakFrequency, GoalTimeframe, HabitFormation, ProductivityPeak, Profile, Theme, WorkRoutine,
};
pub use reward::{Reward, UnlockedReward};
pub use task::Task;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Identifier type shared by every entity.
pub type EntityId = String;

/// Generate a fresh entity id.
pub fn new_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

/// Current local wall-clock time, second precision.
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Current local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
