//! # Schedura Core Library
//!
//! Core logic for the Schedura personal planner: tasks, goals, habits,
//! calendar events and rewards kept in a single JSON document. The CLI is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session**: owns the live document and persists it after every mutation
//! - **Storage**: whole-document JSON store with backups, TOML configuration
//! - **Suggestions**: keyword heuristics for category, importance and urgency,
//!   Eisenhower quadrants and free-slot search
//! - **Calendar**: ICS exchange and a pluggable sync provider
//!
//! ## Key Components
//!
//! - [`Session`]: every mutating operation
//! - [`Store`]: load/save/export/import of the document
//! - [`Config`]: application configuration management
//! - [`CalendarSyncProvider`]: trait for external calendars

pub mod analytics;
pub mod calendar;
pub mod error;
pub mod filter;
pub mod model;
pub mod range;
pub mod session;
pub mod storage;
pub mod suggest;

pub use analytics::Summary;
pub use calendar::{CalendarSyncProvider, ImportReport, NoopSyncProvider, SyncReport};
pub use error::{ConfigError, CoreError, EntityKind, Result, ValidationError};
pub use filter::{StatusFilter, TaskFilter};
pub use model::{
    Category, CategoryDomain, Document, Event, EventSource, Frequency, Goal, Habit, Milestone,
    ProductivityPeak, Profile, Reward, Task, UnlockedReward,
};
pub use range::{DateBounds, DateRange};
pub use session::{CategoryPatch, EventPatch, GoalPatch, HabitPatch, Session, TaskPatch};
pub use storage::{Config, Store};
pub use suggest::{Quadrant, Suggestion, TimeRange};
