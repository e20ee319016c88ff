use serde::{Deserialize, Serialize};

use crate::pomodoro::PomodoroMode;

/// A user request against the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Toggle,
    Reset,
    Status,
    SwitchMode { mode: PomodoroMode },
}

/// One line typed into the interactive terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    Command(Command),
    Help,
    Quit,
}

pub const TERMINAL_HELP: &str = "Commands: [enter]/t start-pause  r reset  w work  s short break  l long break  ? help  q quit";

/// Map a terminal line to an input. `None` for unknown text.
pub fn parse_terminal_input(line: &str) -> Option<TerminalInput> {
    let input = match line.trim().to_lowercase().as_str() {
        "" | "t" | "toggle" | "p" | "pause" | "start" => TerminalInput::Command(Command::Toggle),
        "r" | "reset" => TerminalInput::Command(Command::Reset),
        "w" | "work" => TerminalInput::Command(Command::SwitchMode {
            mode: PomodoroMode::Work,
        }),
        "s" | "short" => TerminalInput::Command(Command::SwitchMode {
            mode: PomodoroMode::ShortBreak,
        }),
        "l" | "long" => TerminalInput::Command(Command::SwitchMode {
            mode: PomodoroMode::LongBreak,
        }),
        "i" | "status" => TerminalInput::Command(Command::Status),
        "?" | "h" | "help" => TerminalInput::Help,
        "q" | "quit" | "exit" => TerminalInput::Quit,
        _ => return None,
    };
    Some(input)
}
