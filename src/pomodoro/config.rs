use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::pomodoro::PomodoroMode;

pub const POMODORO_WORK_SECONDS: u64 = 25 * 60; // Default work phase
pub const POMODORO_SHORT_BREAK_SECONDS: u64 = 5 * 60; // Default short break
pub const POMODORO_LONG_BREAK_SECONDS: u64 = 15 * 60; // Default long break
pub const POMODORO_CYCLES: u32 = 4; // Work cycles before a long break

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("duration pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} duration must be greater than zero")]
    ZeroDuration(PomodoroMode),
    #[error("cycles before a long break must be greater than zero")]
    ZeroCycles,
    #[error("invalid duration '{0}' (expected e.g. 25m, 90s, 1h, 1m30s or plain minutes)")]
    InvalidDuration(String),
    #[error("invalid cycle count '{0}'")]
    InvalidCycles(String),
}

/// Durations and cycle rule for a countdown. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    work: u64,
    short_break: u64,
    long_break: u64,
    cycles_per_long_break: u32,
}

impl TimerConfig {
    /// Builds a config from durations in seconds.
    pub fn new(
        work: u64,
        short_break: u64,
        long_break: u64,
        cycles_per_long_break: u32,
    ) -> Result<Self, ConfigError> {
        for (mode, seconds) in [
            (PomodoroMode::Work, work),
            (PomodoroMode::ShortBreak, short_break),
            (PomodoroMode::LongBreak, long_break),
        ] {
            if seconds == 0 {
                return Err(ConfigError::ZeroDuration(mode));
            }
        }
        if cycles_per_long_break == 0 {
            return Err(ConfigError::ZeroCycles);
        }

        Ok(Self {
            work,
            short_break,
            long_break,
            cycles_per_long_break,
        })
    }

    pub fn duration_of(&self, mode: PomodoroMode) -> u64 {
        match mode {
            PomodoroMode::Work => self.work,
            PomodoroMode::ShortBreak => self.short_break,
            PomodoroMode::LongBreak => self.long_break,
        }
    }

    pub fn cycles_per_long_break(&self) -> u32 {
        self.cycles_per_long_break
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work: POMODORO_WORK_SECONDS,
            short_break: POMODORO_SHORT_BREAK_SECONDS,
            long_break: POMODORO_LONG_BREAK_SECONDS,
            cycles_per_long_break: POMODORO_CYCLES,
        }
    }
}

/// Parse a duration argument such as `25m`, `90s`, `1h`, `1m30s`.
/// A bare number is taken as minutes.
pub fn parse_duration(input: &str) -> Result<u64, ConfigError> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDuration(input.to_string()));
    }

    if let Ok(minutes) = trimmed.parse::<u64>() {
        return minutes
            .checked_mul(60)
            .ok_or_else(|| ConfigError::InvalidDuration(input.to_string()));
    }

    let captures = DURATION_RE
        .captures(&trimmed)
        .ok_or_else(|| ConfigError::InvalidDuration(input.to_string()))?;

    let mut total: u64 = 0;
    for (group, unit) in [(1, 3600u64), (2, 60), (3, 1)] {
        if let Some(part) = captures.get(group) {
            let value: u64 = part
                .as_str()
                .parse()
                .map_err(|_| ConfigError::InvalidDuration(input.to_string()))?;
            total = value
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| ConfigError::InvalidDuration(input.to_string()))?;
        }
    }

    Ok(total)
}

pub fn parse_cycles(input: &str) -> Result<u32, ConfigError> {
    input
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidCycles(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_durations() {
        let config = TimerConfig::default();
        assert_eq!(config.duration_of(PomodoroMode::Work), 1500);
        assert_eq!(config.duration_of(PomodoroMode::ShortBreak), 300);
        assert_eq!(config.duration_of(PomodoroMode::LongBreak), 900);
        assert_eq!(config.cycles_per_long_break(), 4);
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(
            TimerConfig::new(0, 1, 1, 4),
            Err(ConfigError::ZeroDuration(PomodoroMode::Work))
        );
        assert_eq!(
            TimerConfig::new(1, 1, 0, 4),
            Err(ConfigError::ZeroDuration(PomodoroMode::LongBreak))
        );
        assert_eq!(TimerConfig::new(1, 1, 1, 0), Err(ConfigError::ZeroCycles));
    }

    #[test_case("25m", 1500 ; "minutes")]
    #[test_case("90s", 90 ; "seconds")]
    #[test_case("1h", 3600 ; "hours")]
    #[test_case("1m30s", 90 ; "minutes and seconds")]
    #[test_case("1h5m", 3900 ; "hours and minutes")]
    #[test_case("5", 300 ; "bare number is minutes")]
    #[test_case(" 2M ", 120 ; "trimmed and case insensitive")]
    fn test_parse_duration(input: &str, expected: u64) {
        assert_eq!(parse_duration(input), Ok(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("abc" ; "garbage")]
    #[test_case("5x" ; "unknown unit")]
    #[test_case("30s5m" ; "wrong order")]
    #[test_case("-5" ; "negative")]
    fn test_parse_duration_rejects(input: &str) {
        assert_eq!(
            parse_duration(input),
            Err(ConfigError::InvalidDuration(input.to_string()))
        );
    }

    #[test]
    fn test_parse_cycles() {
        assert_eq!(parse_cycles("4"), Ok(4));
        assert!(matches!(parse_cycles("four"), Err(ConfigError::InvalidCycles(_))));
    }
}
