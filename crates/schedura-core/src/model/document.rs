use serde::{Deserialize, Serialize};

use super::{Category, CategoryDomain, Event, Goal, Habit, Profile, Reward, Task, UnlockedReward};

/// Current on-disk layout version.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Root aggregate persisted as a single JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(rename = "user_profile", default)]
    pub profile: Profile,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(rename = "calendar_events", default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub unlocked_rewards: Vec<UnlockedReward>,
}

/// Counts of entities pointing at one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryUsage {
    pub tasks: usize,
    pub goals: usize,
    pub habits: usize,
    pub events: usize,
}

impl CategoryUsage {
    pub fn is_unused(&self) -> bool {
        self.tasks + self.goals + self.habits + self.events == 0
    }
}

impl Document {
    /// A fresh document: empty profile, default categories, no records.
    pub fn seeded() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            profile: Profile::default(),
            categories: Category::seeded(),
            tasks: Vec::new(),
            goals: Vec::new(),
            habits: Vec::new(),
            events: Vec::new(),
            points: 0,
            rewards: Vec::new(),
            unlocked_rewards: Vec::new(),
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Category new records fall back to: Personal if present, else the first.
    pub fn default_category_id(&self) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.effective_domain() == CategoryDomain::Personal)
            .or_else(|| self.categories.first())
            .map(|c| c.id.as_str())
    }

    pub fn category_usage(&self, category_id: &str) -> CategoryUsage {
        let refers = |id: &Option<String>| id.as_deref() == Some(category_id);
        CategoryUsage {
            tasks: self.tasks.iter().filter(|t| refers(&t.category_id)).count(),
            goals: self.goals.iter().filter(|g| refers(&g.category_id)).count(),
            habits: self.habits.iter().filter(|h| refers(&h.category_id)).count(),
            events: self.events.iter().filter(|e| refers(&e.category_id)).count(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::seeded()
    }
}
