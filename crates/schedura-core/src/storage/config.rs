//! TOML-based application configuration.
//!
//! Stores:
//! - Location of the planner document
//! - Points awarded for completions and check-ins
//! - Keyword tables and scheduling knobs for the suggestion engine
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Document path; relative paths resolve against the data directory.
    #[serde(default)]
    pub data_file: Option<String>,
}

/// Points credited by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsConfig {
    #[serde(default = "default_task_points")]
    pub task: u32,
    #[serde(default = "default_goal_points")]
    pub goal: u32,
    #[serde(default = "default_check_in_points")]
    pub habit_check_in: u32,
}

/// Keywords that push a score up (`high`) or down (`low`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordLevels {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

/// Suggestion engine tables and knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_slot_step")]
    pub slot_step_minutes: u32,
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    /// Start hour used when the profile declares no productive peak.
    #[serde(default = "default_start_hour")]
    pub default_start_hour: u32,
    /// Domain tag (`work`, `personal`, ...) to keyword list.
    #[serde(default = "default_category_keywords")]
    pub category_keywords: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_importance_keywords")]
    pub importance: KeywordLevels,
    #[serde(default = "default_urgency_keywords")]
    pub urgency: KeywordLevels,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

// Default functions
fn default_task_points() -> u32 {
    10
}
fn default_goal_points() -> u32 {
    50
}
fn default_check_in_points() -> u32 {
    5
}
fn default_slot_step() -> u32 {
    30
}
fn default_lookahead_days() -> u32 {
    7
}
fn default_start_hour() -> u32 {
    9
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_category_keywords() -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    map.insert(
        "work".to_string(),
        words(&[
            "meeting", "project", "report", "presentation", "client", "boss", "deadline",
            "email", "call", "office",
        ]),
    );
    map.insert(
        "personal".to_string(),
        words(&[
            "home", "family", "friend", "shopping", "clean", "appointment", "personal",
            "party", "visit", "social",
        ]),
    );
    map.insert(
        "health".to_string(),
        words(&[
            "exercise", "workout", "gym", "run", "jog", "swim", "doctor", "dentist", "meal",
            "diet", "sleep", "rest", "meditate",
        ]),
    );
    map.insert(
        "learning".to_string(),
        words(&[
            "study", "learn", "read", "book", "course", "class", "lecture", "tutorial",
            "homework", "assignment",
        ]),
    );
    map
}

fn default_importance_keywords() -> KeywordLevels {
    KeywordLevels {
        high: words(&[
            "important", "critical", "crucial", "essential", "key", "major", "significant",
            "vital", "priority", "boss",
        ]),
        low: words(&[
            "optional", "minor", "trivial", "if time", "sometime", "eventually", "when possible",
        ]),
    }
}

fn default_urgency_keywords() -> KeywordLevels {
    KeywordLevels {
        high: words(&[
            "urgent", "asap", "immediately", "now", "today", "tonight", "deadline", "due",
            "overdue", "soon", "quickly", "fast",
        ]),
        low: words(&[
            "when convenient", "sometime", "later", "eventually", "no rush", "take time",
            "next month",
        ]),
    }
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            task: default_task_points(),
            goal: default_goal_points(),
            habit_check_in: default_check_in_points(),
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            slot_step_minutes: default_slot_step(),
            lookahead_days: default_lookahead_days(),
            default_start_hour: default_start_hour(),
            category_keywords: default_category_keywords(),
            importance: default_importance_keywords(),
            urgency: default_urgency_keywords(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location: `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::Null => Some(String::new()),
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Resolved document path.
    pub fn data_file(&self) -> Result<PathBuf> {
        self.data_file_in(&data_dir()?)
    }

    pub fn data_file_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = match self.storage.data_file.as_deref() {
            Some(file) if !file.trim().is_empty() => {
                let candidate = PathBuf::from(file);
                if candidate.is_absolute() {
                    candidate
                } else {
                    dir.join(candidate)
                }
            }
            _ => dir.join(super::store::DATA_FILE),
        };
        Ok(path)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("falling back to default config: {e}");
                Self::default()
            }
        }
    }
}
