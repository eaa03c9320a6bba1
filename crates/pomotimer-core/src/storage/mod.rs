mod config;

pub use config::{Config, NotificationsConfig, UiConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomotimer[-dev]/` based on POMOTIMER_ENV.
///
/// Set POMOTIMER_ENV=dev to use the development directory, or
/// POMOTIMER_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOTIMER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotimer-dev")
            } else {
                base_dir.join("pomotimer")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
