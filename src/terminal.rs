use chrono::Local;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::command::{Command, TERMINAL_HELP, TerminalInput, parse_terminal_input};
use crate::pomodoro::{Countdown, DisplayEmphasis, PhaseComplete};
use crate::session::{Session, SessionStats, TickOutcome};

pub const TICK_INTERVAL_MS: u64 = 1000;

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

pub type LineReceiver = mpsc::UnboundedReceiver<io::Result<String>>;

/// Status line for the countdown. Paused timers are dimmed.
pub fn render_status(countdown: &Countdown) -> String {
    let mode = countdown.mode();
    let body = format!(
        "{} {:<11} {}  [cycles: {}]",
        mode.emoji(),
        mode.label(),
        countdown.format_display(),
        countdown.completed_work_cycles()
    );
    match countdown.display_emphasis() {
        DisplayEmphasis::Active => body,
        DisplayEmphasis::Inactive => format!("{}{} (paused){}", DIM, body, RESET),
    }
}

fn redraw(countdown: &Countdown) {
    print!("{}{}", CLEAR_LINE, render_status(countdown));
    let _ = io::stdout().flush();
}

fn announce(message: &str) {
    println!("{}[{}] {}", CLEAR_LINE, Local::now().format("%H:%M:%S"), message);
}

fn announce_phase(event: &PhaseComplete) {
    announce(&format!("🔔 {} {}", event.mode.emoji(), event.message()));
}

/// Read lines on a detached thread and hand them to the async side.
/// The thread must not belong to the runtime, or shutdown waits on the read.
pub fn spawn_line_reader<R>(reader: R) -> LineReceiver
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        log::warn!("Failed to spawn stdin reader: {}", e);
    }
    rx
}

/// Drive the countdown from a 1-second interval and stdin commands until
/// the user quits or presses Ctrl+C.
pub async fn run_interactive(session: Session) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", TERMINAL_HELP);
    let lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    let stats = run_terminal_loop(session, lines, tokio::signal::ctrl_c()).await;
    println!("\n\n{}\n", stats);
    Ok(())
}

/// The interactive loop proper. Ends on `q`, on a read error, or when
/// `shutdown` resolves; the session summary is always written.
pub async fn run_terminal_loop<F>(
    mut session: Session,
    mut lines: LineReceiver,
    shutdown: F,
) -> SessionStats
where
    F: Future<Output = io::Result<()>>,
{
    redraw(session.countdown());

    let mut ticker = interval(Duration::from_millis(TICK_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    tokio::pin!(shutdown);
    let mut stdin_open = true;
    let mut shutdown_armed = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.on_tick() {
                    TickOutcome::Idle => continue,
                    TickOutcome::Advanced => {}
                    TickOutcome::PhaseComplete(event) => announce_phase(&event),
                }
                redraw(session.countdown());
            }
            line = lines.recv(), if stdin_open => {
                match line {
                    Some(Ok(line)) => match parse_terminal_input(&line) {
                        Some(TerminalInput::Command(Command::Status)) => {
                            announce(&session.status_line());
                        }
                        Some(TerminalInput::Command(command)) => {
                            announce(&session.apply(command));
                        }
                        Some(TerminalInput::Help) => println!("{}{}", CLEAR_LINE, TERMINAL_HELP),
                        Some(TerminalInput::Quit) => break,
                        None => println!("{}Unknown command '{}'. Type ? for help.", CLEAR_LINE, line.trim()),
                    },
                    Some(Err(e)) => {
                        eprintln!("{}Failed to read input: {}", CLEAR_LINE, e);
                        break;
                    }
                    None => {
                        log::debug!("stdin closed; timer keeps running until Ctrl+C");
                        stdin_open = false;
                    }
                }
                redraw(session.countdown());
            }
            result = &mut shutdown, if shutdown_armed => {
                match result {
                    Ok(()) => break,
                    Err(e) => {
                        log::warn!("Ctrl+C handler unavailable: {}", e);
                        shutdown_armed = false;
                    }
                }
            }
        }
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::PhaseNotifier;
    use crate::pomodoro::{PomodoroMode, TimerConfig};
    use crate::session_log::SessionLog;

    struct Silent;

    impl PhaseNotifier for Silent {
        fn phase_complete(&self, _event: &PhaseComplete) {}
    }

    fn session(log: SessionLog) -> Session {
        Session::new(TimerConfig::default(), log, Box::new(Silent))
    }

    #[test]
    fn test_render_paused_is_dimmed() {
        let countdown = Countdown::new(TimerConfig::default());
        let status = render_status(&countdown);
        assert!(status.starts_with(DIM));
        assert!(status.contains("25:00"));
        assert!(status.contains("(paused)"));
    }

    #[test]
    fn test_render_running_is_plain() {
        let mut countdown = Countdown::new(TimerConfig::default());
        countdown.toggle_running();
        countdown.tick();
        let status = render_status(&countdown);
        assert!(!status.contains(DIM));
        assert!(status.contains("24:59"));
        assert!(status.contains("[cycles: 0]"));
    }

    #[tokio::test]
    async fn test_line_reader_forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(io::Cursor::new("t\nq\n"));
        assert_eq!(rx.recv().await.unwrap().unwrap(), "t");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "q");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_signal_ends_loop_with_stats() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Ok("t".to_string())).unwrap();
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            Ok(())
        };

        let stats = run_terminal_loop(session(SessionLog::disabled()), rx, shutdown).await;

        assert_eq!(stats.time_spent[0], (PomodoroMode::Work, 3));
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_command_ends_loop() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Ok("q".to_string())).unwrap();
        let stats = run_terminal_loop(
            session(SessionLog::disabled()),
            rx,
            std::future::pending::<io::Result<()>>(),
        )
        .await;
        assert_eq!(stats.completed_work_cycles, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_error_still_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Err(io::Error::other("broken pipe"))).unwrap();

        run_terminal_loop(
            session(SessionLog::new(Some(path.clone()))),
            rx,
            std::future::pending::<io::Result<()>>(),
        )
        .await;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("--- Session Statistics ---"));
        assert!(contents.contains("=== Session ended at"));
    }
}
