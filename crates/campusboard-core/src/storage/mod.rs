mod config;
pub mod event_store;

pub use config::{Config, RecommendConfig, StorageConfig, UpcomingConfig};
pub use event_store::{AddOutcome, EventRef, EventStore, LoadReport, LoadWarning};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `CAMPUSBOARD_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/campusboard[-dev]/`, with `CAMPUSBOARD_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CAMPUSBOARD_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CAMPUSBOARD_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("campusboard-dev")
            } else {
                base_dir.join("campusboard")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
