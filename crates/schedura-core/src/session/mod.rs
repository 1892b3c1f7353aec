//! The live planner session.
//!
//! A [`Session`] owns the document and the store it came from. Every
//! mutating call validates its input, applies the change and writes the
//! whole document back before returning.

mod categories;
mod events;
mod goals;
mod habits;
mod tasks;

pub use categories::CategoryPatch;
pub use events::EventPatch;
pub use goals::GoalPatch;
pub use habits::HabitPatch;
pub use tasks::TaskPatch;

use chrono::NaiveDate;

use crate::analytics::Summary;
use crate::error::{CoreError, EntityKind, Result, ValidationError};
use crate::model::{self, Document, Profile, Reward, UnlockedReward};
use crate::range::DateBounds;
use crate::storage::{BackupInfo, Config, PointsConfig, Store, SuggestionConfig};
use crate::suggest::Suggestion;

pub struct Session {
    document: Document,
    store: Store,
    points: PointsConfig,
    suggestions: SuggestionConfig,
}

impl Session {
    /// Open the configured data file.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Store::open_default(config)?;
        Ok(Self::with_store(store, config))
    }

    /// Load the document behind `store`.
    pub fn with_store(store: Store, config: &Config) -> Self {
        let document = store.load();
        tracing::debug!(
            path = %store.path().display(),
            tasks = document.tasks.len(),
            events = document.events.len(),
            "session opened"
        );
        Self {
            document,
            store,
            points: config.points.clone(),
            suggestions: config.suggestions.clone(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn suggestion_config(&self) -> &SuggestionConfig {
        &self.suggestions
    }

    fn persist(&self, action: &str) -> Result<()> {
        self.store.save(&self.document)?;
        tracing::debug!(action, points = self.document.points, "document persisted");
        Ok(())
    }

    fn require_category(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) if self.document.category(id).is_none() => {
                Err(CoreError::not_found(EntityKind::Category, id))
            }
            _ => Ok(()),
        }
    }

    /// Credit `amount` points and unlock every reward now affordable.
    fn award(&mut self, amount: u32) {
        self.document.points = self.document.points.saturating_add(amount);
        self.unlock_rewards();
    }

    fn revoke(&mut self, amount: u32) {
        self.document.points = self.document.points.saturating_sub(amount);
    }

    fn unlock_rewards(&mut self) {
        let balance = self.document.points;
        let now = model::now();
        let newly: Vec<Reward> = self
            .document
            .rewards
            .iter()
            .filter(|r| r.point_cost <= balance)
            .filter(|r| {
                !self
                    .document
                    .unlocked_rewards
                    .iter()
                    .any(|u| u.reward.id == r.id)
            })
            .cloned()
            .collect();
        for reward in newly {
            tracing::info!(reward = %reward.title, cost = reward.point_cost, "reward unlocked");
            self.document.unlocked_rewards.push(UnlockedReward {
                reward,
                unlocked_at: now,
                redeemed_at: None,
            });
        }
    }

    // Profile

    /// Replace the profile. The first save stamps `onboarded_at`.
    pub fn update_profile(&mut self, mut profile: Profile) -> Result<Profile> {
        if profile.onboarded_at.is_none() {
            profile.onboarded_at = self
                .document
                .profile
                .onboarded_at
                .or_else(|| Some(model::now()));
        }
        self.document.profile = profile;
        self.persist("update_profile")?;
        Ok(self.document.profile.clone())
    }

    pub fn suggest(&self, title: &str, description: &str) -> Suggestion {
        Suggestion::for_text(title, description, &self.document.categories, &self.suggestions)
    }

    pub fn summary(&self, bounds: Option<DateBounds>, today: NaiveDate) -> Summary {
        Summary::compute(&self.document, bounds, today)
    }

    // Rewards

    pub fn add_reward(&mut self, reward: Reward) -> Result<Reward> {
        if reward.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()).into());
        }
        self.document.rewards.push(reward.clone());
        self.unlock_rewards();
        self.persist("add_reward")?;
        Ok(reward)
    }

    pub fn delete_reward(&mut self, id: &str) -> Result<Reward> {
        let index = self
            .document
            .rewards
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Reward, id))?;
        let reward = self.document.rewards.remove(index);
        self.document.unlocked_rewards.retain(|u| u.reward.id != id);
        self.persist("delete_reward")?;
        Ok(reward)
    }

    /// Spend the reward's cost and stamp the redemption.
    pub fn redeem_reward(&mut self, id: &str) -> Result<UnlockedReward> {
        let reward = self
            .document
            .rewards
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityKind::Reward, id))?;
        if reward.point_cost > self.document.points {
            return Err(ValidationError::InsufficientPoints {
                needed: reward.point_cost,
                available: self.document.points,
            }
            .into());
        }

        self.unlock_rewards();
        self.document.points -= reward.point_cost;
        let now = model::now();
        let unlocked = self
            .document
            .unlocked_rewards
            .iter_mut()
            .find(|u| u.reward.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Reward, id))?;
        unlocked.redeemed_at = Some(now);
        let redeemed = unlocked.clone();
        tracing::info!(reward = %reward.title, balance = self.document.points, "reward redeemed");
        self.persist("redeem_reward")?;
        Ok(redeemed)
    }

    // Whole-document operations

    pub fn export(&self) -> Result<String> {
        self.store.export(&self.document)
    }

    /// Replace the live document with an exported payload.
    ///
    /// The payload is fully parsed before anything changes; the current
    /// file is backed up first.
    pub fn import(&mut self, blob: &str) -> Result<()> {
        let document = self.store.import(blob)?;
        self.store.backup_current()?;
        self.document = document;
        tracing::info!(tasks = self.document.tasks.len(), "document imported");
        self.persist("import")
    }

    pub fn reset(&mut self) -> Result<()> {
        self.document = self.store.reset()?;
        Ok(())
    }

    pub fn backups(&self) -> Result<Vec<BackupInfo>> {
        self.store.list_backups()
    }

    pub fn restore_backup(&mut self, name: &str) -> Result<()> {
        self.document = self.store.restore_backup(name)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::session;
    use super::*;

    #[test]
    fn profile_update_stamps_onboarding_once() {
        let (_dir, mut session) = session();
        let mut profile = Profile {
            name: "Sam".to_string(),
            ..Profile::default()
        };
        let saved = session.update_profile(profile.clone()).unwrap();
        let first = saved.onboarded_at.unwrap();

        profile.name = "Samira".to_string();
        let saved = session.update_profile(profile).unwrap();
        assert_eq!(saved.onboarded_at, Some(first));
        assert_eq!(session.store().load().profile.name, "Samira");
    }

    #[test]
    fn rewards_unlock_when_affordable_and_redeem_deducts() {
        let (_dir, mut session) = session();
        let reward = session.add_reward(Reward::new("Movie night", 20)).unwrap();
        assert!(session.document().unlocked_rewards.is_empty());

        session.award(25);
        assert_eq!(session.document().unlocked_rewards.len(), 1);

        let redeemed = session.redeem_reward(&reward.id).unwrap();
        assert!(redeemed.redeemed_at.is_some());
        assert_eq!(session.document().points, 5);

        let err = session.redeem_reward(&reward.id).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InsufficientPoints { needed: 20, available: 5 })
        ));
    }

    #[test]
    fn unknown_reward_is_not_found() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.redeem_reward("missing"),
            Err(CoreError::NotFound { kind: EntityKind::Reward, .. })
        ));
    }

    #[test]
    fn import_replaces_document_and_keeps_backup() {
        let (_dir, mut session) = session();
        session.add_reward(Reward::new("Coffee", 5)).unwrap();
        let blob = session.export().unwrap();

        session.add_reward(Reward::new("Book", 50)).unwrap();
        session.import(&blob).unwrap();
        assert_eq!(session.document().rewards.len(), 1);
        assert_eq!(session.backups().unwrap().len(), 1);
        assert_eq!(session.store().load(), *session.document());
    }

    #[test]
    fn failed_import_leaves_document_alone() {
        let (_dir, mut session) = session();
        session.add_reward(Reward::new("Coffee", 5)).unwrap();
        assert!(matches!(session.import("{}"), Err(CoreError::Format(_))));
        assert_eq!(session.document().rewards.len(), 1);
    }

    #[test]
    fn reset_reseeds() {
        let (_dir, mut session) = session();
        session.add_reward(Reward::new("Coffee", 5)).unwrap();
        session.reset().unwrap();
        assert!(session.document().rewards.is_empty());
        assert_eq!(session.document().categories.len(), 4);
    }
}
