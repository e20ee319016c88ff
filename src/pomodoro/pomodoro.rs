use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::TimerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub const ALL: [PomodoroMode; 3] = [
        PomodoroMode::Work,
        PomodoroMode::ShortBreak,
        PomodoroMode::LongBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "WORK",
            PomodoroMode::ShortBreak => "SHORT BREAK",
            PomodoroMode::LongBreak => "LONG BREAK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "Work",
            PomodoroMode::ShortBreak => "Short break",
            PomodoroMode::LongBreak => "Long break",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "💼",
            PomodoroMode::ShortBreak => "☕",
            PomodoroMode::LongBreak => "🌴",
        }
    }

    /// Message shown when this mode has just been entered by a completed phase.
    pub fn completion_message(&self) -> &'static str {
        match self {
            PomodoroMode::Work => "Time to get to work!",
            PomodoroMode::ShortBreak => "Short and sweet break time~",
            PomodoroMode::LongBreak => "Great job! Take a good long rest!",
        }
    }
}

impl fmt::Display for PomodoroMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEmphasis {
    Active,
    Inactive,
}

/// Fired by [`Countdown::tick`] when a phase runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseComplete {
    /// The mode that was just entered.
    pub mode: PomodoroMode,
    pub completed_work_cycles: u32,
}

impl PhaseComplete {
    pub fn message(&self) -> &'static str {
        self.mode.completion_message()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: PomodoroMode,
    pub remaining_seconds: u64,
    pub display: String,
    pub is_running: bool,
    pub emphasis: DisplayEmphasis,
    pub completed_work_cycles: u32,
}

/// The work/break countdown.
///
/// Driven by one `tick()` per second from the owner's scheduler. Commands
/// (`toggle_running`, `switch_mode`, `reset`) are applied between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    config: TimerConfig,
    mode: PomodoroMode,
    remaining_seconds: u64,
    is_running: bool,
    completed_work_cycles: u32,
}

impl Countdown {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            mode: PomodoroMode::Work,
            remaining_seconds: config.duration_of(PomodoroMode::Work),
            is_running: false,
            completed_work_cycles: 0,
        }
    }

    /// Advance one second if running. Returns the completion event when the
    /// phase ran out and the next one was started.
    pub fn tick(&mut self) -> Option<PhaseComplete> {
        if !self.is_running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return Some(self.complete_phase());
        }
        None
    }

    pub fn toggle_running(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Jump to `target` with a full countdown. Running state and the cycle
    /// count are left alone; switching to the current mode restarts it.
    pub fn switch_mode(&mut self, target: PomodoroMode) {
        self.mode = target;
        self.remaining_seconds = self.config.duration_of(target);
    }

    pub fn reset(&mut self) {
        self.remaining_seconds = self.config.duration_of(self.mode);
        self.is_running = false;
    }

    fn complete_phase(&mut self) -> PhaseComplete {
        let next = match self.mode {
            PomodoroMode::Work => {
                self.completed_work_cycles += 1;
                if self.completed_work_cycles % self.config.cycles_per_long_break() == 0 {
                    PomodoroMode::LongBreak
                } else {
                    PomodoroMode::ShortBreak
                }
            }
            PomodoroMode::ShortBreak | PomodoroMode::LongBreak => PomodoroMode::Work,
        };

        self.switch_mode(next);
        // The next phase starts on its own.
        self.is_running = true;

        PhaseComplete {
            mode: next,
            completed_work_cycles: self.completed_work_cycles,
        }
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_work_cycles(&self) -> u32 {
        self.completed_work_cycles
    }

    pub fn display_emphasis(&self) -> DisplayEmphasis {
        if self.is_running {
            DisplayEmphasis::Active
        } else {
            DisplayEmphasis::Inactive
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn format_display(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            remaining_seconds: self.remaining_seconds,
            display: self.format_display(),
            is_running: self.is_running,
            emphasis: self.display_emphasis(),
            completed_work_cycles: self.completed_work_cycles,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
