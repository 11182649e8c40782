//! Non-blocking logging pipeline.
//!
//! ```text
//! log::info!() / warn!() ...
//!     |
//! [LogCollector] (formats, never blocks)
//!     | (crossbeam unbounded channel)
//!     v
//! [writer thread] --> stderr
//!                 \-> <log_dir>/octane_<ts>.log (when configured)
//! ```
//!
//! Worker threads of a benchmark log from inside timed loops, so the
//! `log::Log` implementation only formats and enqueues. `flush()` sends a
//! marker through the same queue and waits for the writer to reach it.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// A formatted log line
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: log::Level,
    /// `HH:MM:SS.mmm`, local time
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: log::Level, message: String) -> Self {
        LogLine {
            message,
            level,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// Logger backing the `log` facade
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    level: LevelFilter,
    session_path: Option<PathBuf>,
}

impl LogCollector {
    /// Spawn the writer thread. With a `log_dir`, a fresh session file is
    /// created there and every line is appended to it as well as stderr.
    pub fn new(level: LevelFilter, log_dir: Option<&Path>) -> Result<Self, String> {
        Self::build(level, log_dir, true)
    }

    /// Writer that only persists to the session file. Used by tests that
    /// would otherwise flood stderr.
    pub fn file_only(level: LevelFilter, log_dir: &Path) -> Result<Self, String> {
        Self::build(level, Some(log_dir), false)
    }

    fn build(level: LevelFilter, log_dir: Option<&Path>, to_stderr: bool) -> Result<Self, String> {
        let (session_path, mut file) = match log_dir {
            Some(dir) => {
                ensure_logs_dir_exists(dir)?;
                let (path, file) = create_session_log(dir)?;
                (Some(path), Some(file))
            }
            None => (None, None),
        };

        let (tx, rx) = unbounded::<LogMessage>();

        std::thread::Builder::new()
            .name("octane-log-writer".to_string())
            .spawn(move || {
                let stderr = std::io::stderr();
                while let Ok(msg) = rx.recv() {
                    match msg {
                        LogMessage::Line(line) => {
                            let rendered = line.render();
                            if to_stderr {
                                let _ = writeln!(stderr.lock(), "{}", rendered);
                            }
                            if let Some(f) = file.as_mut() {
                                let _ = writeln!(f, "{}", rendered);
                            }
                        }
                        LogMessage::Flush(done) => {
                            if let Some(f) = file.as_mut() {
                                let _ = f.flush();
                            }
                            let _ = stderr.lock().flush();
                            let _ = done.send(());
                        }
                    }
                }
            })
            .map_err(|e| format!("Failed to spawn log writer: {}", e))?;

        Ok(LogCollector {
            tx,
            level,
            session_path,
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Session log file, if file logging is enabled
    pub fn session_log_path(&self) -> Option<&Path> {
        self.session_path.as_deref()
    }

    /// Enqueue a line (non-blocking)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Block until every line enqueued before this call has been written.
    pub fn wait_for_empty(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        rx.recv().map_err(|e| format!("Flush signal interrupted: {}", e))
    }

    /// Register a clone as the global `log` backend.
    pub fn install(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.level);
        Ok(())
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}

fn create_session_log(log_dir: &Path) -> Result<(PathBuf, File), String> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = log_dir.join(format!("octane_{}.log", timestamp));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("Failed to create log file {}: {}", path.display(), e))?;
    Ok((path, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_session_file_created() {
        let temp_dir = TempDir::new().expect("tempdir");
        let logs = temp_dir.path().join("logs");
        let collector = LogCollector::file_only(LevelFilter::Info, &logs).expect("collector");

        let path = collector.session_log_path().expect("session path");
        assert!(path.exists());
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with("octane_") && n.ends_with(".log")));
    }

    #[test]
    fn test_flush_drains_queue() {
        let temp_dir = TempDir::new().expect("tempdir");
        let collector = LogCollector::file_only(LevelFilter::Debug, temp_dir.path()).expect("collector");

        for i in 0..500 {
            collector.log_line(LogLine::new(log::Level::Info, format!("line {}", i)));
        }
        collector.wait_for_empty().expect("flush");

        let path = collector.session_log_path().expect("session path");
        let content = fs::read_to_string(path).expect("read log");
        assert_eq!(content.lines().count(), 500);
        assert!(content.lines().last().map_or(false, |l| l.ends_with("[INFO] line 499")));
    }

    #[test]
    fn test_level_filter() {
        let temp_dir = TempDir::new().expect("tempdir");
        let collector = LogCollector::file_only(LevelFilter::Warn, temp_dir.path()).expect("collector");

        let warn = Metadata::builder().level(log::Level::Warn).build();
        let debug = Metadata::builder().level(log::Level::Debug).build();
        assert!(collector.enabled(&warn));
        assert!(!collector.enabled(&debug));

        collector.log(
            &Record::builder()
                .args(format_args!("hidden"))
                .level(log::Level::Debug)
                .build(),
        );
        collector.log(
            &Record::builder()
                .args(format_args!("shown"))
                .level(log::Level::Error)
                .build(),
        );
        Log::flush(&collector);

        let content = fs::read_to_string(collector.session_log_path().expect("path")).expect("read");
        assert!(!content.contains("hidden"));
        assert!(content.contains("[ERROR] shown"));
    }

    #[test]
    fn test_stderr_only_collector() {
        let collector = LogCollector::new(LevelFilter::Off, None).expect("collector");
        assert!(collector.session_log_path().is_none());
        collector.wait_for_empty().expect("flush without file");
    }
}
