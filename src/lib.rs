pub mod cli;
pub mod command;
pub mod daemon;
pub mod notification;
pub mod pomodoro;
pub mod session;
pub mod session_log;
pub mod terminal;
pub mod ws;
