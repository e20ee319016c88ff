use notify_rust::{Notification, Timeout};
use std::io::Write;
use std::thread;

use crate::pomodoro::PhaseComplete;

const NOTIFICATION_SUMMARY: &str = "Pomodoro Timer";
const NOTIFICATION_TIMEOUT_MS: u32 = 10_000;
const COMPLETION_SOUND: &str = "complete"; // freedesktop sound theme name

/// Receives phase-complete events from the countdown owner.
///
/// Implementations must return quickly: they are called from the tick loop.
pub trait PhaseNotifier: Send + Sync {
    fn phase_complete(&self, event: &PhaseComplete);
}

/// Desktop notification plus optional sound, delivered off the tick loop.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sound: bool,
}

impl DesktopNotifier {
    pub fn new(sound: bool) -> Self {
        Self { sound }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PhaseNotifier for DesktopNotifier {
    fn phase_complete(&self, event: &PhaseComplete) {
        let body = format!("{} {}", event.mode.emoji(), event.message());
        let sound = self.sound;

        // Fire and forget: a failed or slow notification must not stall the timer.
        let spawned = thread::Builder::new()
            .name("phase-notification".to_string())
            .spawn(move || {
                if sound {
                    ring_terminal_bell();
                }
                if let Err(e) = send_notification(&body, sound) {
                    log::debug!("Failed to send notification: {}", e);
                }
            });

        if let Err(e) = spawned {
            log::debug!("Failed to spawn notification thread: {}", e);
        }
    }
}

fn send_notification(message: &str, sound: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut notification = Notification::new();
    notification
        .summary(NOTIFICATION_SUMMARY)
        .body(message)
        .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS));
    if sound {
        notification.sound_name(COMPLETION_SOUND);
    }
    notification.show()?;
    Ok(())
}

fn ring_terminal_bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

