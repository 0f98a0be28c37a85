//! The batch preset writes TX traces to a JSONL file

use csmarl_logging::{LogConfig, SubscriberBuilder};
use tracing::{info, warn};

#[test]
fn test_batch_run_writes_jsonl_trace() {
    let dir = tempfile::tempdir().unwrap();
    let guard = SubscriberBuilder::new()
        .with_config(LogConfig::batch(dir.path().to_path_buf()))
        .try_init()
        .unwrap()
        .expect("file output returns a guard");

    info!(bytes = 512u64, time = 1.5f64, "TraceDelay TX");
    warn!(bytes = 64u64, "Error while sending");
    // flushes the non-blocking writer
    drop(guard);

    let content = std::fs::read_to_string(dir.path().join("csmarl.log")).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .filter(|event: &serde_json::Value| event["level"] != "DEBUG")
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["message"], "TraceDelay TX");
    assert_eq!(lines[0]["bytes"], 512);
    assert_eq!(lines[0]["time"], 1.5);
    assert_eq!(lines[1]["level"], "WARN");
    assert_eq!(lines[1]["message"], "Error while sending");

    // a second global subscriber is refused
    assert!(SubscriberBuilder::new().try_init().is_err());
}
