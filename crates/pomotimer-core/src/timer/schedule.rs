use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Which interval is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }

    pub fn accent(self) -> Accent {
        match self {
            SessionKind::Work => Accent::Alert,
            SessionKind::ShortBreak => Accent::Calm,
            SessionKind::LongBreak => Accent::Done,
        }
    }
}

/// Colour tag handed to the front end. Actual colours are the front end's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Alert,
    Calm,
    Done,
}

/// Interval lengths in seconds. Immutable once the scheduler is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
}

impl Durations {
    pub fn duration(&self, kind: SessionKind) -> u64 {
        match kind {
            SessionKind::Work => self.work_secs,
            SessionKind::ShortBreak => self.short_break_secs,
            SessionKind::LongBreak => self.long_break_secs,
        }
    }
}

/// Construction parameters for a [`SessionScheduler`](super::SessionScheduler).
///
/// Durations are given in whole minutes; the tick period in milliseconds.
/// A shortened tick (e.g. 10 ms) runs the whole cycle at accelerated speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u64,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_work_minutes() -> u64 {
    25
}
fn default_short_break_minutes() -> u64 {
    5
}
fn default_long_break_minutes() -> u64 {
    15
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl SchedulerConfig {
    /// Reject zero durations or a zero tick period.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            ("tick_interval_ms", self.tick_interval_ms),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }
        Ok(())
    }

    /// Validated interval lengths in seconds.
    ///
    /// # Errors
    ///
    /// Same as [`SchedulerConfig::validate`].
    pub fn durations(&self) -> Result<Durations, ConfigError> {
        self.validate()?;
        Ok(Durations {
            work_secs: self.work_minutes.saturating_mul(60),
            short_break_secs: self.short_break_minutes.saturating_mul(60),
            long_break_secs: self.long_break_minutes.saturating_mul(60),
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
