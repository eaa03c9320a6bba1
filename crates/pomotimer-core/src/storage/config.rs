//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Interval lengths and tick period
//! - Notification preferences (bell, desktop popup, sound file, popup lifetime)
//! - Accent colours for each interval kind
//!
//! Configuration is stored at `~/.config/pomotimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{Accent, SchedulerConfig};

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell when an interval ends.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Sound file played when an interval ends (optional).
    #[serde(default)]
    pub sound_file: Option<PathBuf>,
    /// Command used to play `sound_file`; the path is its only argument.
    #[serde(default = "default_player")]
    pub player: String,
    /// Show a desktop popup when an interval ends.
    #[serde(default = "default_true")]
    pub desktop: bool,
    /// Seconds the completion popup and banner stay up.
    #[serde(default = "default_popup_secs")]
    pub popup_secs: u64,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_alert_color")]
    pub alert_color: String,
    #[serde(default = "default_calm_color")]
    pub calm_color: String,
    #[serde(default = "default_done_color")]
    pub done_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotimer/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub schedule: SchedulerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_true() -> bool {
    true
}
fn default_player() -> String {
    "paplay".into()
}
fn default_popup_secs() -> u64 {
    4
}
fn default_alert_color() -> String {
    "red".into()
}
fn default_calm_color() -> String {
    "blue".into()
}
fn default_done_color() -> String {
    "green".into()
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
            sound_file: None,
            desktop: true,
            player: default_player(),
            popup_secs: default_popup_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_color: default_alert_color(),
            calm_color: default_calm_color(),
            done_color: default_done_color(),
        }
    }
}

impl UiConfig {
    pub fn color_for(&self, accent: Accent) -> &str {
        match accent {
            Accent::Alert => &self.alert_color,
            Accent::Calm => &self.calm_color,
            Accent::Done => &self.done_color,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Keys whose value is `Option<_>` and may be cleared.
    fn is_optional(key: &str) -> bool {
        matches!(key, "notifications.sound_file")
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot replace a whole section".into()));
                }
                // An empty value unsets an optional path.
                serde_json::Value::Null if value.trim().is_empty() => serde_json::Value::Null,
                serde_json::Value::String(_)
                    if value.trim().is_empty() && Self::is_optional(key) =>
                {
                    serde_json::Value::Null
                }
                // Strings and unset optional paths.
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if nothing exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed, or if the
    /// stored intervals fail validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(path)?;
            return Ok(cfg);
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.schedule.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the key's type, or the resulting schedule is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.schedule.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        self.schedule
    }
}
