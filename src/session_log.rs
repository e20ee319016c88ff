use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only activity log. Write failures are never surfaced.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    path: Option<PathBuf>,
}

impl SessionLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        if let Some(ref path) = path {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::debug!("Could not create log directory {}: {}", parent.display(), e);
                }
            }
        }
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// `$HOME/.local/share/pomodoro_timer/session.log`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".local/share/pomodoro_timer/session.log")
    }

    fn log_to_file(path: &Path, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", message)?;
        Ok(())
    }

    pub fn log(&self, message: &str) {
        if let Some(ref path) = self.path {
            if let Err(e) = Self::log_to_file(path, message) {
                log::debug!("Could not write session log {}: {}", path.display(), e);
            }
        }
    }

    /// Log with a `[HH:MM:SS]` prefix.
    pub fn log_event(&self, message: &str) {
        self.log(&format!("[{}] {}", Local::now().format("%H:%M:%S"), message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.log");
        let log = SessionLog::new(Some(path.clone()));

        log.log("first");
        log.log_event("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "first");
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] second"));
    }

    #[test]
    fn test_disabled_log_is_silent() {
        let log = SessionLog::disabled();
        log.log("nothing happens");
    }

    #[test]
    fn test_unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = SessionLog::new(Some(dir.path().to_path_buf()));
        log.log("ignored");
    }
}
