//! Completion alerts: a desktop popup and sound playback, both handed off so
//! the tick loop never waits on them.

use std::path::Path;
use std::process::Stdio;

use notify_rust::{Notification, Timeout};
use pomotimer_core::storage::NotificationsConfig;
use pomotimer_core::Completion;
use tokio::process::Command;

const POPUP_SUMMARY: &str = "pomotimer";

/// Shows the popup and plays the configured sound.
#[derive(Debug, Clone)]
pub struct Notifier {
    settings: NotificationsConfig,
}

impl Notifier {
    pub fn new(settings: NotificationsConfig) -> Self {
        Self { settings }
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn bell(&self) -> bool {
        self.settings.enabled && self.settings.bell
    }

    pub fn popup_secs(&self) -> u64 {
        self.settings.popup_secs
    }

    /// The desktop popup for `completion`, if one should be shown.
    fn popup(&self, completion: &Completion) -> Option<Notification> {
        if !self.settings.enabled || !self.settings.desktop {
            return None;
        }
        let millis = u32::try_from(self.settings.popup_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        let mut popup = Notification::new();
        popup
            .summary(POPUP_SUMMARY)
            .body(completion.message())
            .timeout(Timeout::Milliseconds(millis));
        Some(popup)
    }

    /// Sound file to play, skipping an unset or empty path.
    fn sound_file(&self) -> Option<&Path> {
        if !self.settings.enabled {
            return None;
        }
        self.settings
            .sound_file
            .as_deref()
            .filter(|file| !file.as_os_str().is_empty())
    }

    /// Fire and forget. Must be called from inside the tokio runtime.
    pub fn play(&self, completion: &Completion) {
        if let Some(popup) = self.popup(completion) {
            tracing::debug!(finished = ?completion.finished, "showing popup");
            // The notification daemon round trip blocks.
            tokio::task::spawn_blocking(move || {
                if let Err(e) = popup.show() {
                    tracing::warn!("desktop notification failed: {}", e);
                }
            });
        }

        let Some(file) = self.sound_file().map(Path::to_path_buf) else {
            return;
        };
        let player = self.settings.player.clone();
        tracing::debug!(finished = ?completion.finished, player = %player, file = %file.display(), "playing alert");

        tokio::spawn(async move {
            let child = Command::new(&player)
                .arg(&file)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match child {
                Ok(mut child) => {
                    if let Err(e) = child.wait().await {
                        tracing::warn!("alert player '{}' failed: {}", player, e);
                    }
                }
                Err(e) => tracing::warn!("could not start alert player '{}': {}", player, e),
            }
        });
    }
}
