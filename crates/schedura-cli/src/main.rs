use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "schedura", version, about = "Schedura personal planner")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Goals and milestones
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Habits and check-ins
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Calendar events
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// User profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Heuristic suggestions
    Suggest {
        #[command(subcommand)]
        action: commands::suggest::SuggestAction,
    },
    /// ICS exchange and calendar sync
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Export, import, reset and backups
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Analytics summary
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Points and rewards
    Reward {
        #[command(subcommand)]
        action: commands::reward::RewardAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCHEDURA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Event { action } => commands::event::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Suggest { action } => commands::suggest::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Reward { action } => commands::reward::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
