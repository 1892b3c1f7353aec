//! Category commands for CLI.

use clap::Subcommand;
use schedura_core::{Category, CategoryDomain, CategoryPatch};

use super::{category_id, open_session, print_json, CommandResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Color as #RRGGBB
        #[arg(long, default_value = "#6B7280")]
        color: String,
        /// work, personal, health, learning or custom
        #[arg(long, default_value = "custom")]
        domain: CategoryDomain,
    },
    /// List categories
    List,
    /// Update a category
    Update {
        /// Category name or id
        category: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        domain: Option<CategoryDomain>,
    },
    /// Delete an unused category
    Delete {
        /// Category name or id
        category: String,
    },
}

pub fn run(action: CategoryAction) -> CommandResult {
    let mut session = open_session()?;
    match action {
        CategoryAction::Add {
            name,
            color,
            domain,
        } => {
            print_json(&session.add_category(Category::new(name, color, domain))?)?;
        }
        CategoryAction::List => print_json(&session.document().categories)?,
        CategoryAction::Update {
            category,
            name,
            color,
            domain,
        } => {
            let id = category_id(session.document(), &category)?;
            let patch = CategoryPatch {
                name,
                color,
                domain,
            };
            print_json(&session.update_category(&id, patch)?)?;
        }
        CategoryAction::Delete { category } => {
            let id = category_id(session.document(), &category)?;
            print_json(&session.delete_category(&id)?)?;
        }
    }
    Ok(())
}
