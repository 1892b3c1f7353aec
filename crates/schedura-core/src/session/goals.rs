use chrono::NaiveDate;

use super::Session;
use crate::error::{CoreError, EntityKind, Result, ValidationError};
use crate::model::{self, EntityId, Goal, Milestone};

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Option<EntityId>>,
    pub target_date: Option<Option<NaiveDate>>,
}

impl Session {
    fn goal_index(&self, id: &str) -> Result<usize> {
        self.document
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Goal, id))
    }

    /// Recompute progress and move the goal in or out of completion.
    fn settle_goal(&mut self, index: usize) {
        let points = self.points.goal;
        let goal = &mut self.document.goals[index];
        goal.progress = goal.compute_progress();

        if goal.all_milestones_done() && !goal.completed {
            goal.completed = true;
            goal.completed_at = Some(model::now());
            goal.points_awarded = points;
            tracing::info!(goal = %goal.title, "goal completed");
            self.award(points);
        } else if goal.completed && !goal.milestones.is_empty() && !goal.all_milestones_done() {
            let revoked = std::mem::take(&mut goal.points_awarded);
            goal.completed = false;
            goal.completed_at = None;
            self.revoke(revoked);
        }
    }

    pub fn add_goal(&mut self, mut goal: Goal) -> Result<Goal> {
        if goal.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".to_string()).into());
        }
        if goal.milestones.iter().any(|m| m.title.trim().is_empty()) {
            return Err(ValidationError::EmptyField("milestone title".to_string()).into());
        }
        self.require_category(goal.category_id.as_deref())?;
        goal.completed = false;
        goal.completed_at = None;
        goal.points_awarded = 0;
        self.document.goals.push(goal);
        let index = self.document.goals.len() - 1;
        self.settle_goal(index);
        self.persist("add_goal")?;
        Ok(self.document.goals[index].clone())
    }

    pub fn update_goal(&mut self, id: &str, patch: GoalPatch) -> Result<Goal> {
        let index = self.goal_index(id)?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyField("title".to_string()).into());
            }
        }
        if let Some(Some(category_id)) = &patch.category_id {
            self.require_category(Some(category_id))?;
        }

        let goal = &mut self.document.goals[index];
        if let Some(title) = patch.title {
            goal.title = title;
        }
        if let Some(description) = patch.description {
            goal.description = description;
        }
        if let Some(category_id) = patch.category_id {
            goal.category_id = category_id;
        }
        if let Some(target_date) = patch.target_date {
            goal.target_date = target_date;
        }
        self.persist("update_goal")?;
        Ok(self.document.goals[index].clone())
    }

    pub fn add_milestone(&mut self, goal_id: &str, milestone: Milestone) -> Result<Goal> {
        if milestone.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("milestone title".to_string()).into());
        }
        let index = self.goal_index(goal_id)?;
        self.document.goals[index].milestones.push(milestone);
        self.settle_goal(index);
        self.persist("add_milestone")?;
        Ok(self.document.goals[index].clone())
    }

    /// Flip milestone `position` (0-based) and settle the goal.
    pub fn toggle_milestone(&mut self, goal_id: &str, position: usize) -> Result<Goal> {
        let index = self.goal_index(goal_id)?;
        let milestone = self.document.goals[index]
            .milestones
            .get_mut(position)
            .ok_or_else(|| {
                CoreError::not_found(EntityKind::Milestone, format!("{goal_id}#{position}"))
            })?;
        milestone.completed = !milestone.completed;
        self.settle_goal(index);
        self.persist("toggle_milestone")?;
        Ok(self.document.goals[index].clone())
    }

    /// Complete a goal outright, ticking off any open milestones.
    pub fn complete_goal(&mut self, id: &str) -> Result<Goal> {
        let index = self.goal_index(id)?;
        if self.document.goals[index].completed {
            return Ok(self.document.goals[index].clone());
        }

        let points = self.points.goal;
        let goal = &mut self.document.goals[index];
        for milestone in &mut goal.milestones {
            milestone.completed = true;
        }
        goal.progress = if goal.milestones.is_empty() { 100 } else { goal.compute_progress() };
        goal.completed = true;
        goal.completed_at = Some(model::now());
        goal.points_awarded = points;
        self.award(points);
        self.persist("complete_goal")?;
        Ok(self.document.goals[index].clone())
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal> {
        let index = self.goal_index(id)?;
        let goal = self.document.goals.remove(index);
        self.persist("delete_goal")?;
        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::session;
    use super::*;

    fn goal(milestones: &[&str]) -> Goal {
        let mut goal = Goal::new("Learn Spanish");
        goal.milestones = milestones.iter().map(|m| Milestone::new(*m)).collect();
        goal
    }

    #[test]
    fn milestones_drive_progress_and_completion() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&["A1", "A2", "B1"])).unwrap();

        session.toggle_milestone(&g.id, 0).unwrap();
        let g2 = session.toggle_milestone(&g.id, 1).unwrap();
        assert_eq!(g2.progress, 66);
        assert!(!g2.completed);

        let done = session.toggle_milestone(&g.id, 2).unwrap();
        assert_eq!(done.progress, 100);
        assert!(done.completed);
        assert_eq!(session.document().points, 50);
    }

    #[test]
    fn undoing_a_milestone_reopens_and_revokes() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&["only"])).unwrap();
        session.toggle_milestone(&g.id, 0).unwrap();
        assert_eq!(session.document().points, 50);

        let reopened = session.toggle_milestone(&g.id, 0).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.progress, 0);
        assert_eq!(session.document().points, 0);
    }

    #[test]
    fn goal_without_milestones_completes_explicitly() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&[])).unwrap();
        assert_eq!(g.progress, 0);
        let done = session.complete_goal(&g.id).unwrap();
        assert!(done.completed);
        assert_eq!(done.progress, 100);

        session.complete_goal(&g.id).unwrap();
        assert_eq!(session.document().points, 50);
    }

    #[test]
    fn adding_open_milestone_reopens_completed_goal() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&["one"])).unwrap();
        session.toggle_milestone(&g.id, 0).unwrap();
        let g = session.add_milestone(&g.id, Milestone::new("two")).unwrap();
        assert!(!g.completed);
        assert_eq!(g.progress, 50);
    }

    #[test]
    fn bad_milestone_index_is_not_found() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&["one"])).unwrap();
        assert!(matches!(
            session.toggle_milestone(&g.id, 3),
            Err(CoreError::NotFound { kind: EntityKind::Milestone, .. })
        ));
    }

    #[test]
    fn update_checks_category() {
        let (_dir, mut session) = session();
        let g = session.add_goal(goal(&[])).unwrap();
        let patch = GoalPatch {
            category_id: Some(Some("missing".to_string())),
            ..GoalPatch::default()
        };
        assert!(session.update_goal(&g.id, patch).is_err());

        let patch = GoalPatch {
            title: Some("Learn Portuguese".to_string()),
            ..GoalPatch::default()
        };
        assert_eq!(session.update_goal(&g.id, patch).unwrap().title, "Learn Portuguese");
    }
}
