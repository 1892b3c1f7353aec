//! Points and reward commands for CLI.

use clap::Subcommand;
use schedura_core::Reward;

use super::{open_session, print_json, CommandResult};

#[derive(Subcommand)]
pub enum RewardAction {
    /// Define a reward
    Add {
        /// Reward title
        title: String,
        /// Point cost
        #[arg(long)]
        cost: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List rewards, unlocked rewards and the point balance
    List,
    /// Spend points on a reward
    Redeem {
        /// Reward ID
        id: String,
    },
    /// Delete a reward
    Delete {
        /// Reward ID
        id: String,
    },
}

pub fn run(action: RewardAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        RewardAction::Add {
            title,
            cost,
            description,
        } => {
            let mut reward = Reward::new(title, cost);
            reward.description = description;
            print_json(&session.add_reward(reward)?)?;
        }
        RewardAction::List => {
            let document = session.document();
            print_json(&serde_json::json!({
                "points": document.points,
                "rewards": document.rewards,
                "unlocked": document.unlocked_rewards,
            }))?;
        }
        RewardAction::Redeem { id } => print_json(&session.redeem_reward(&id)?)?,
        RewardAction::Delete { id } => print_json(&session.delete_reward(&id)?)?,
    }
    Ok(())
}
