//! Whole-document commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;

use super::{open_session, print_json, require_confirmation, CommandResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export the document as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the document with an exported file
    Import {
        /// Path to the exported JSON
        file: PathBuf,
        /// Confirm replacing the current data
        #[arg(long)]
        yes: bool,
    },
    /// Replace the document with a fresh one
    Reset {
        /// Confirm deleting the current data
        #[arg(long)]
        yes: bool,
    },
    /// List backups, oldest first
    Backups,
    /// Restore a backup by name
    Restore {
        /// Backup file name
        name: String,
        #[arg(long)]
        yes: bool,
    },
    /// Print the data file path
    Path,
}

pub fn run(action: DataAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        DataAction::Export { output } => {
            let blob = session.export()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, blob)?;
                    eprintln!("Data exported to {}", path.display());
                }
                None => println!("{blob}"),
            }
        }
        DataAction::Import { file, yes } => {
            require_confirmation(yes, "replace the current data")?;
            let blob = std::fs::read_to_string(&file)?;
            session.import(&blob)?;
            println!("data imported from {}", file.display());
        }
        DataAction::Reset { yes } => {
            require_confirmation(yes, "reset all data")?;
            session.reset()?;
            println!("data reset");
        }
        DataAction::Backups => print_json(&session.backups()?)?,
        DataAction::Restore { name, yes } => {
            require_confirmation(yes, "restore a backup over the current data")?;
            session.restore_backup(&name)?;
            println!("restored {name}");
        }
        DataAction::Path => println!("{}", session.store().path().display()),
    }
    Ok(())
}
