use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fmt;

use crate::command::Command;
use crate::notification::PhaseNotifier;
use crate::pomodoro::{Countdown, PhaseComplete, PomodoroMode, TimerConfig};
use crate::session_log::SessionLog;

/// What one scheduler tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused; nothing changed.
    Idle,
    Advanced,
    PhaseComplete(PhaseComplete),
}

/// Owns the countdown for the lifetime of the process, plus the
/// bookkeeping around it (activity log, notifications, statistics).
pub struct Session {
    countdown: Countdown,
    log: SessionLog,
    notifier: Box<dyn PhaseNotifier>,
    session_start: DateTime<Local>,
    time_spent: HashMap<PomodoroMode, u64>, // mode -> seconds run
}

impl Session {
    pub fn new(config: TimerConfig, log: SessionLog, notifier: Box<dyn PhaseNotifier>) -> Self {
        let now = Local::now();
        log.log(&format!(
            "=== Session started at {} ===",
            now.format("%Y-%m-%d %H:%M:%S")
        ));
        Self {
            countdown: Countdown::new(config),
            log,
            notifier,
            session_start: now,
            time_spent: HashMap::new(),
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Called once per second by the scheduler.
    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.countdown.is_running() {
            return TickOutcome::Idle;
        }

        *self.time_spent.entry(self.countdown.mode()).or_insert(0) += 1;

        match self.countdown.tick() {
            Some(event) => {
                self.log
                    .log_event(&format!("🔔 {} ({} mode)", event.message(), event.mode.as_str()));
                log::info!(
                    "Phase complete: entering {} after {} work cycles",
                    event.mode,
                    event.completed_work_cycles
                );
                self.notifier.phase_complete(&event);
                TickOutcome::PhaseComplete(event)
            }
            None => TickOutcome::Advanced,
        }
    }

    /// Apply a user command and describe what happened.
    pub fn apply(&mut self, command: Command) -> String {
        let message = match command {
            Command::Toggle => {
                self.countdown.toggle_running();
                if self.countdown.is_running() {
                    "Timer started".to_string()
                } else {
                    "Timer paused".to_string()
                }
            }
            Command::Reset => {
                self.countdown.reset();
                format!("{} timer reset", self.countdown.mode())
            }
            Command::SwitchMode { mode } => {
                self.countdown.switch_mode(mode);
                format!("Switched to {} mode", mode.as_str())
            }
            Command::Status => return self.status_line(),
        };

        log::debug!("{:?} -> {}", command, message);
        self.log.log_event(&message);
        message
    }

    pub fn status_line(&self) -> String {
        let countdown = &self.countdown;
        format!(
            "{} {} {} ({}, {} cycles done)",
            countdown.mode().emoji(),
            countdown.mode().as_str(),
            countdown.format_display(),
            if countdown.is_running() { "running" } else { "paused" },
            countdown.completed_work_cycles()
        )
    }

    pub fn stats(&self) -> SessionStats {
        let session_seconds = (Local::now() - self.session_start).num_seconds().max(0) as u64;
        let time_spent = PomodoroMode::ALL
            .iter()
            .map(|mode| (*mode, self.time_spent.get(mode).copied().unwrap_or(0)))
            .collect();
        SessionStats {
            session_seconds,
            completed_work_cycles: self.countdown.completed_work_cycles(),
            time_spent,
        }
    }

    /// Write the closing summary to the session log and return it.
    pub fn finish(&self) -> SessionStats {
        let stats = self.stats();
        self.log.log(&stats.to_string());
        self.log.log(&format!(
            "=== Session ended at {} ===",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub session_seconds: u64,
    pub completed_work_cycles: u32,
    pub time_spent: Vec<(PomodoroMode, u64)>,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Session Statistics ---")?;
        writeln!(f, "Session duration: {} minutes", self.session_seconds / 60)?;
        writeln!(f, "Completed work cycles: {}", self.completed_work_cycles)?;
        writeln!(f, "Time spent per mode:")?;
        for (mode, seconds) in &self.time_spent {
            writeln!(f, "  {} {} - {}m {}s", mode.emoji(), mode, seconds / 60, seconds % 60)?;
        }
        write!(f, "--------------------------")
    }
}
