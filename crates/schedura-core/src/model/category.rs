use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Domain tag used by the category classifier to pick a keyword table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDomain {
    Work,
    Personal,
    Health,
    Learning,
    #[default]
    Custom,
}

impl CategoryDomain {
    /// Key used for this domain in the keyword tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Learning => "learning",
            Self::Custom => "custom",
        }
    }

    /// Guess a domain from a category name (used for documents written
    /// before domain tags existed).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "work" => Self::Work,
            "personal" => Self::Personal,
            "health" => Self::Health,
            "learning" => Self::Learning,
            _ => Self::Custom,
        }
    }
}

impl std::str::FromStr for CategoryDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "health" => Ok(Self::Health),
            "learning" => Ok(Self::Learning),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown category domain: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub domain: CategoryDomain,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>, domain: CategoryDomain) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            color: color.into(),
            domain,
            created_at: Some(super::now()),
        }
    }

    /// Domain used for keyword matching. Untagged categories named after a
    /// built-in domain behave as that domain.
    pub fn effective_domain(&self) -> CategoryDomain {
        match self.domain {
            CategoryDomain::Custom => CategoryDomain::from_name(&self.name),
            domain => domain,
        }
    }

    /// The four categories every new document starts with.
    pub fn seeded() -> Vec<Category> {
        vec![
            Category::new("Work", "#FF5733", CategoryDomain::Work),
            Category::new("Personal", "#33FF57", CategoryDomain::Personal),
            Category::new("Health", "#3357FF", CategoryDomain::Health),
            Category::new("Learning", "#F033FF", CategoryDomain::Learning),
        ]
    }
}

/// Default color for categories created without one.
pub const DEFAULT_COLOR: &str = "#808080";
