mod config;
pub mod database;
pub mod stores;

pub use config::{
    Config, NotificationsConfig, SpeechConfig, TimerConfig, BREAK_RANGE, FOCUS_RANGE,
};
pub use database::Database;
pub use stores::{MoodStore, Persisted, RoutineStore, SettingsStore, TaskStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/neurotrack[-dev]/` based on NEUROTRACK_ENV.
///
/// Set NEUROTRACK_ENV=dev to use the development data directory, or
/// NEUROTRACK_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NEUROTRACK_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("NEUROTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("neurotrack-dev")
            } else {
                base_dir.join("neurotrack")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
