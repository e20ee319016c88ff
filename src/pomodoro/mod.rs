pub mod config;
pub mod pomodoro;

pub use config::{ConfigError, TimerConfig};
pub use pomodoro::{Countdown, DisplayEmphasis, PhaseComplete, PomodoroMode, TimerSnapshot};
