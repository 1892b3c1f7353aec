//! Goal and milestone commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use schedura_core::filter::goals_due_in;
use schedura_core::{DateRange, Goal, GoalPatch, Milestone};

use super::{category_id, open_session, parse_date, print_json, resolve_range, CommandResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        /// Goal title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Category name or id
        #[arg(long)]
        category: Option<String>,
        /// Target date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        target: Option<NaiveDate>,
        /// Milestone title (repeatable)
        #[arg(long = "milestone")]
        milestones: Vec<String>,
    },
    /// List goals
    List {
        /// Target-date range
        #[arg(long)]
        range: Option<DateRange>,
    },
    /// Get goal details
    Get {
        /// Goal ID
        id: String,
    },
    /// Update a goal
    Update {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New category name or id
        #[arg(long)]
        category: Option<String>,
        /// New target date
        #[arg(long, value_parser = parse_date)]
        target: Option<NaiveDate>,
    },
    /// Append a milestone
    Milestone {
        /// Goal ID
        id: String,
        /// Milestone title
        title: String,
    },
    /// Toggle a milestone by its number (starting at 1)
    Toggle {
        /// Goal ID
        id: String,
        /// Milestone number
        number: usize,
    },
    /// Mark the goal and all its milestones completed
    Complete {
        /// Goal ID
        id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        GoalAction::Add {
            title,
            description,
            category,
            target,
            milestones,
        } => {
            let mut goal = Goal::new(title);
            goal.description = description;
            goal.category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            goal.target_date = target;
            goal.milestones = milestones.into_iter().map(Milestone::new).collect();
            print_json(&session.add_goal(goal)?)?;
        }
        GoalAction::List { range } => {
            let bounds = resolve_range(range)?;
            print_json(&goals_due_in(&session.document().goals, bounds.as_ref()))?;
        }
        GoalAction::Get { id } => {
            let goal = session
                .document()
                .goal(&id)
                .ok_or_else(|| format!("goal not found: {id}"))?;
            print_json(goal)?;
        }
        GoalAction::Update {
            id,
            title,
            description,
            category,
            target,
        } => {
            let category_id = category
                .map(|key| category_id(session.document(), &key))
                .transpose()?;
            let patch = GoalPatch {
                title,
                description,
                category_id: category_id.map(Some),
                target_date: target.map(Some),
            };
            print_json(&session.update_goal(&id, patch)?)?;
        }
        GoalAction::Milestone { id, title } => {
            print_json(&session.add_milestone(&id, Milestone::new(title))?)?;
        }
        GoalAction::Toggle { id, number } => {
            let position = number
                .checked_sub(1)
                .ok_or("milestone numbers start at 1")?;
            print_json(&session.toggle_milestone(&id, position)?)?;
        }
        GoalAction::Complete { id } => print_json(&session.complete_goal(&id)?)?,
        GoalAction::Delete { id } => print_json(&session.delete_goal(&id)?)?,
    }
    Ok(())
}
