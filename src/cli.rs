use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::pomodoro::PomodoroMode;
use crate::pomodoro::config::{self, ConfigError, TimerConfig};
use crate::session_log::SessionLog;
use crate::ws::websocket_server::DEFAULT_ADDR;

pub const USAGE: &str = "\
Usage: pomodoro_timer [OPTIONS]

Options:
  --work <DURATION>         Work phase length (default 25m)
  --short-break <DURATION>  Short break length (default 5m)
  --long-break <DURATION>   Long break length (default 15m)
  --cycles <N>              Work cycles before a long break (default 4)
  --no-sound                Notify without sound
  --daemon                  Run the WebSocket control server instead of the terminal UI
  --addr <HOST:PORT>        Daemon listen address (default 127.0.0.1:8765)
  -l, --log <PATH>          Session log file
  -v, --verbose             Debug diagnostics
  -h, --help                Show this help

Durations: 25m, 90s, 1h, 1m30s, or a plain number of minutes.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error("invalid address '{0}'")]
    InvalidAddr(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub config: TimerConfig,
    pub sound: bool,
    pub daemon: bool,
    pub addr: SocketAddr,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

/// Parse the arguments after the program name.
pub fn parse_args<I>(args: I) -> Result<Options, CliError>
where
    I: IntoIterator<Item = String>,
{
    let defaults = TimerConfig::default();
    let mut work = defaults.duration_of(PomodoroMode::Work);
    let mut short_break = defaults.duration_of(PomodoroMode::ShortBreak);
    let mut long_break = defaults.duration_of(PomodoroMode::LongBreak);
    let mut cycles = defaults.cycles_per_long_break();

    let mut sound = true;
    let mut daemon = false;
    let mut addr = DEFAULT_ADDR.to_string();
    let mut log_file = Some(SessionLog::default_path());
    let mut verbose = false;
    let mut help = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| CliError::MissingValue(flag.to_string()))
        };
        match arg.as_str() {
            "--work" => work = config::parse_duration(&value(&arg)?)?,
            "--short-break" => short_break = config::parse_duration(&value(&arg)?)?,
            "--long-break" => long_break = config::parse_duration(&value(&arg)?)?,
            "--cycles" => cycles = config::parse_cycles(&value(&arg)?)?,
            "--no-sound" => sound = false,
            "--daemon" => daemon = true,
            "--addr" => addr = value(&arg)?,
            "--log" | "-l" => log_file = Some(PathBuf::from(value(&arg)?)),
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => help = true,
            _ => return Err(CliError::UnknownArgument(arg)),
        }
    }

    let addr = addr
        .parse()
        .map_err(|_| CliError::InvalidAddr(addr.clone()))?;

    Ok(Options {
        config: TimerConfig::new(work, short_break, long_break, cycles)?,
        sound,
        daemon,
        addr,
        log_file,
        verbose,
        help,
    })
}
