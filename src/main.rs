use pomodoro_timer::cli::{self, USAGE};
use pomodoro_timer::notification::DesktopNotifier;
use pomodoro_timer::pomodoro::PomodoroMode;
use pomodoro_timer::session::Session;
use pomodoro_timer::session_log::SessionLog;
use pomodoro_timer::{daemon, terminal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = match cli::parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let default_filter = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = options.config;
    println!("🍅 Pomodoro Timer");
    println!("======================================================");
    println!(
        "Pomodoro settings: {} work / {} short break / {} long break, long break every {} cycles",
        format_minutes(config.duration_of(PomodoroMode::Work)),
        format_minutes(config.duration_of(PomodoroMode::ShortBreak)),
        format_minutes(config.duration_of(PomodoroMode::LongBreak)),
        config.cycles_per_long_break()
    );
    if options.verbose {
        println!("Verbose mode: ON");
    }
    if let Some(ref path) = options.log_file {
        println!("Logging to: {}", path.display());
    }

    let session = Session::new(
        config,
        SessionLog::new(options.log_file),
        Box::new(DesktopNotifier::new(options.sound)),
    );

    if options.daemon {
        println!("Running WebSocket server on ws://{}", options.addr);
        println!("Press Ctrl+C to stop and see stats\n");
        return daemon::run_daemon_mode(session, options.addr).await;
    }

    println!("Press Ctrl+C or q to stop and see stats\n");
    terminal::run_interactive(session).await
}

fn format_minutes(seconds: u64) -> String {
    if seconds % 60 == 0 {
        format!("{}min", seconds / 60)
    } else {
        format!("{}s", seconds)
    }
}
