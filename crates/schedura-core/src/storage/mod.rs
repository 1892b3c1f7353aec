mod config;
pub mod store;

pub use config::{Config, KeywordLevels, PointsConfig, StorageConfig, SuggestionConfig};
pub use store::{BackupInfo, Store};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `SCHEDURA_DATA_DIR` overrides everything. Otherwise the directory is
/// `~/.config/schedura[-dev]/`, with `SCHEDURA_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SCHEDURA_DATA_DIR").filter(|v| !v.is_empty()) {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SCHEDURA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("schedura-dev")
            } else {
                base_dir.join("schedura")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
