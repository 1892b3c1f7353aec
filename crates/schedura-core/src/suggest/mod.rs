//! Heuristic suggestions used to prefill forms.
//!
//! Nothing in here fails: missing signal always resolves to a documented
//! default. Keyword tables come from [`SuggestionConfig`] so they can be
//! tuned in `config.toml`.
//!
//! [`SuggestionConfig`]: crate::storage::SuggestionConfig

pub mod classify;
pub mod keywords;
pub mod priority;
pub mod slot;

pub use classify::{suggest_category, suggest_importance_urgency, Suggestion};
pub use priority::{estimate_duration, next_tasks, priority_quadrant, priority_score, Quadrant};
pub use slot::{suggest_slot, SlotFinder, TimeRange};
