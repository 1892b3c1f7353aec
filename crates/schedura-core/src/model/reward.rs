use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::EntityId;

fn default_reward_type() -> String {
    "template".to_string()
}

/// Something the user can buy with earned points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub point_cost: u32,
    #[serde(default = "default_reward_type")]
    pub reward_type: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Reward {
    pub fn new(title: impl Into<String>, point_cost: u32) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: String::new(),
            point_cost,
            reward_type: default_reward_type(),
            created_at: Some(super::now()),
        }
    }
}

/// A reward the balance has reached at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedReward {
    #[serde(flatten)]
    pub reward: Reward,
    pub unlocked_at: NaiveDateTime,
    #[serde(default)]
    pub redeemed_at: Option<NaiveDateTime>,
}
