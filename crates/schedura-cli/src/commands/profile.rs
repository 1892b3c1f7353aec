//! Profile commands for CLI.

use clap::Subcommand;
use schedura_core::ProductivityPeak;

use super::{open_session, parse_enum, print_json, CommandResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile
    Show,
    /// Change profile fields; unspecified fields keep their value
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated: morning, afternoon, evening, night
        #[arg(long, value_delimiter = ',')]
        peaks: Option<Vec<ProductivityPeak>>,
        /// strict, flexible or completely-flexible
        #[arg(long)]
        work_routine: Option<String>,
        /// frequent-short, few-longer or minimal
        #[arg(long)]
        break_frequency: Option<String>,
        /// daily, weekly, monthly or quarterly
        #[arg(long)]
        goal_timeframe: Option<String>,
        /// start-small, moderate or challenge
        #[arg(long)]
        habit_formation: Option<String>,
        /// Comma-separated health priorities
        #[arg(long, value_delimiter = ',')]
        health: Option<Vec<String>>,
        /// dark or light
        #[arg(long)]
        theme: Option<String>,
    },
}

pub fn run(action: ProfileAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        ProfileAction::Show => print_json(&session.document().profile)?,
        ProfileAction::Set {
            name,
            peaks,
            work_routine,
            break_frequency,
            goal_timeframe,
            habit_formation,
            health,
            theme,
        } => {
            let mut profile = session.document().profile.clone();
            if let Some(name) = name {
                profile.name = name;
            }
            if let Some(peaks) = peaks {
                profile.productivity_peaks = peaks;
            }
            if let Some(value) = work_routine {
                profile.work_routine = parse_enum("work routine", &value)?;
            }
            if let Some(value) = break_frequency {
                profile.break_frequency = parse_enum("break frequency", &value)?;
            }
            if let Some(value) = goal_timeframe {
                profile.goal_timeframe = parse_enum("goal timeframe", &value)?;
            }
            if let Some(value) = habit_formation {
                profile.habit_formation = parse_enum("habit formation", &value)?;
            }
            if let Some(health) = health {
                profile.health_priorities = health;
            }
            if let Some(value) = theme {
                profile.theme = parse_enum("theme", &value)?;
            }
            print_json(&session.update_profile(profile)?)?;
        }
    }
    Ok(())
}
