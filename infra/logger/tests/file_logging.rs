use rsvp_logger::{LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_writes_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let log_dir = tmp.path().join("logs");

    let logger = Logger::builder()
        .name("rsvp-file-logging")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&log_dir)
        .json()
        .init()?;
    assert!(logger.guard().is_some());

    tracing::info!(gift_id = "g1", "gift reserved");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("a log file should exist");

    let contents = fs::read_to_string(log_file)?;
    assert!(contents.contains("gift reserved"));
    assert!(contents.trim_start().starts_with('{'), "file output should be JSON lines");

    Ok(())
}
