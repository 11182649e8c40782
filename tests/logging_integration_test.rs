use octane::LogCollector;
use std::fs;
use std::time::Duration;

use log::LevelFilter;
use octane::performance::{CpuTestSuite, TestType, TickClock, WorkloadExecutor};

/// Integration test for the logging pipeline
///
/// Tests that:
/// 1. The collector installs as the global `log` backend
/// 2. Tagged lines from the suite and executor reach the session file
/// 3. Lines above the configured level are dropped
/// 4. `log::logger().flush()` drains the queue
///
/// Everything lives in one test: the global logger can be set once per process.
#[test]
fn test_logging_integration_full_cycle() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let log_dir = temp_dir.path().join("logs");

    let collector = LogCollector::file_only(LevelFilter::Info, &log_dir).expect("Failed to initialize LogCollector");
    collector.install().expect("Logger already installed");
    assert_eq!(log::max_level(), LevelFilter::Info);

    log::info!("[Test] Sending test logs to collector");
    log::debug!("[Test] This debug line is filtered");

    let executor = WorkloadExecutor::with_clock(TickClock::new(Duration::from_millis(1)));
    let mut suite = CpuTestSuite::with_executor(2, executor);
    let results = suite.run(Duration::from_millis(20), TestType::Compute).expect("run");
    assert!(!results.cancelled);

    log::logger().flush();

    let session = collector.session_log_path().expect("Session file should exist");
    assert!(session.starts_with(&log_dir));
    let content = fs::read_to_string(session).expect("Failed to read session log");

    assert!(content.contains("[INFO] [Test] Sending test logs to collector"));
    assert!(!content.contains("filtered"));
    assert!(content.contains("[Suite] Starting compute run"));
    assert!(content.contains("[Suite] single_core:"));
    // executor lines are debug level
    assert!(!content.contains("[Executor]"));

    for line in content.lines() {
        assert!(line.starts_with('['), "unexpected line format: {}", line);
    }

    let files: Vec<_> = fs::read_dir(&log_dir)
        .expect("Failed to read log dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "log"))
        .collect();
    assert_eq!(files.len(), 1, "One session file per collector");
}
