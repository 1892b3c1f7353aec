//! Core error types for schedura-core.
//!
//! Every failure is scoped to the single operation that raised it; nothing
//! here is fatal to the process. Variants that represent user-correctable
//! input (validation, referential integrity, malformed imports) are always
//! surfaced to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for schedura-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced entity id does not exist in the document
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Deleting a category that is still referenced
    #[error(
        "category {category_id} is still in use by {tasks} task(s), {goals} goal(s), \
         {habits} habit(s) and {events} event(s)"
    )]
    ReferentialIntegrity {
        category_id: String,
        tasks: usize,
        goals: usize,
        habits: usize,
        events: usize,
    },

    /// Malformed import payload or calendar block
    #[error("Format error: {0}")]
    Format(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar provider errors
    #[error("Integration error for '{service}': {message}")]
    Integration { service: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Entity families addressable by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Task,
    Goal,
    Milestone,
    Habit,
    Event,
    Reward,
    Backup,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Category => "Category",
            EntityKind::Task => "Task",
            EntityKind::Goal => "Goal",
            EntityKind::Milestone => "Milestone",
            EntityKind::Habit => "Habit",
            EntityKind::Event => "Event",
            EntityKind::Reward => "Reward",
            EntityKind::Backup => "Backup",
        };
        f.write_str(name)
    }
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Cannot prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// Invalid date range
    #[error("Invalid date range: from ({from}) is after to ({to})")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    /// Empty required text
    #[error("'{0}' must not be empty")]
    EmptyField(String),

    /// Score outside 1..=5
    #[error("'{field}' must be between 1 and 5, got {value}")]
    ScoreOutOfRange { field: String, value: u8 },

    /// Habit already checked in for the date
    #[error("Already checked in on {0}")]
    DuplicateCheckIn(chrono::NaiveDate),

    /// Not enough points to redeem a reward
    #[error("Not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u32, available: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referential_integrity_message_lists_counts() {
        let err = CoreError::ReferentialIntegrity {
            category_id: "c1".to_string(),
            tasks: 2,
            goals: 0,
            habits: 1,
            events: 0,
        };
        let message = err.to_string();
        assert!(message.contains("c1"));
        assert!(message.contains("2 task(s)"));
        assert!(message.contains("1 habit(s)"));
    }

    #[test]
    fn not_found_names_the_kind() {
        let err = CoreError::not_found(EntityKind::Goal, "g-9");
        assert_eq!(err.to_string(), "Goal not found: g-9");
    }

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::EmptyField("title".to_string()).into();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyField(_))));
    }
}
