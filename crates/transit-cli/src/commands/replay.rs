//! Replay command implementation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use transit::{Dispatcher, Message, ProjectionConfig};
use transit_consumer::{Consumer, ConsumerStats, MemorySource};

/// One line of a capture file
#[derive(Debug, Deserialize)]
struct CaptureRecord {
    topic: String,
    #[serde(default)]
    key: Option<String>,
    /// Embedded JSON payload; a string is taken as the raw message body
    value: serde_json::Value,
    #[serde(default)]
    partition: i32,
    #[serde(default)]
    offset: Option<i64>,
}

impl CaptureRecord {
    fn into_message(self, line_offset: i64) -> Message {
        let value = match self.value {
            serde_json::Value::String(raw) => raw,
            other => other.to_string(),
        };
        let mut message = Message::new(self.topic, value)
            .with_position(self.partition, self.offset.unwrap_or(line_offset));
        if let Some(key) = self.key {
            message = message.with_key(key);
        }
        message
    }
}

/// Parse a capture file, skipping blank lines
fn read_capture(path: &Path) -> Result<Vec<Message>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open capture {}", path.display()))?;

    let mut messages = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context("Failed to read capture")?;
        if line.trim().is_empty() {
            continue;
        }
        let record: CaptureRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid capture record on line {}", index + 1))?;
        messages.push(record.into_message(index as i64));
    }
    Ok(messages)
}

pub fn execute(config: &ProjectionConfig, capture: PathBuf, board: bool) -> Result<()> {
    let messages = read_capture(&capture)?;
    tracing::info!(
        "Replaying {} messages from {}",
        messages.len(),
        capture.display()
    );

    let dispatcher = Dispatcher::from_config(config).context("Invalid projection config")?;
    let source = Arc::new(MemorySource::new());
    source.extend(messages);

    let consumer = Consumer::new(source.clone(), dispatcher, config.consumer.clone());
    let mut total = ConsumerStats::default();
    while !source.is_empty() {
        let stats = consumer.run_once().context("Replay failed")?;
        total.messages += stats.messages;
        total.applied += stats.applied;
        total.ignored += stats.ignored;
        total.dropped += stats.dropped;
        total.duration += stats.duration;
        if stats.messages == 0 {
            break;
        }
    }

    let stats = consumer.dispatcher().stats();
    println!("\nReplay Summary");
    println!("{}", "=".repeat(60));
    println!(
        "✓ Handled {} messages in {:?}",
        total.messages, total.duration
    );
    println!("  Applied:         {}", stats.applied);
    println!("  Ignored:         {}", stats.ignored);
    println!("  Dropped:         {}", stats.dropped());
    println!("    malformed:       {}", stats.malformed);
    println!("    unknown station: {}", stats.unknown_station);
    println!("    unknown line:    {}", stats.unknown_line);
    println!("    unrecognized:    {}", stats.unrecognized);

    let dead_letters = consumer.dispatcher().dead_letters();
    if !dead_letters.is_empty() {
        println!("\n⚠️  {} message(s) in the dead letter log", dead_letters.len());
        for failed in dead_letters.entries().iter().take(10) {
            println!(
                "  {}[{}]@{}: {}",
                failed.topic, failed.partition, failed.offset, failed.error_message
            );
        }
    }

    for position in consumer.positions() {
        tracing::debug!(
            "Position {}[{}] = {}",
            position.topic,
            position.partition,
            position.offset
        );
    }

    if board {
        println!("\n{}", consumer.dispatcher().network().snapshot().board());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_read_capture_embeds_json_values() {
        let file = capture(&[
            r#"{"topic":"TURNSTILE_SUMMARY","key":"40010","value":{"STATION_ID":40010,"COUNT":3},"partition":2,"offset":17}"#,
            "",
            r#"{"topic":"org.chicago.cta.weather.v1","value":{"status":"rainy"}}"#,
        ]);

        let messages = read_capture(file.path()).unwrap();
        assert_eq!(messages.len(), 2);

        let first = &messages[0];
        assert_eq!(first.key.as_deref(), Some(&b"40010"[..]));
        assert_eq!((first.partition, first.offset), (2, 17));
        let value: serde_json::Value = serde_json::from_slice(&first.value).unwrap();
        assert_eq!(value["COUNT"], 3);

        // Missing position falls back to partition 0 and the line index
        assert_eq!((messages[1].partition, messages[1].offset), (0, 2));
    }

    #[test]
    fn test_read_capture_keeps_raw_strings() {
        let file = capture(&[r#"{"topic":"org.chicago.cta.station.arrivals.v1","value":"not json"}"#]);
        let messages = read_capture(file.path()).unwrap();
        assert_eq!(messages[0].value, b"not json".to_vec());
    }

    #[test]
    fn test_read_capture_rejects_bad_envelope() {
        let file = capture(&[r#"{"value":{}}"#]);
        let err = read_capture(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_execute_replays_capture() {
        let file = capture(&[
            r#"{"topic":"org.chicago.cta.stations.table.v1","value":{"station_id":1,"station_name":"Howard","order":1,"line":"red"}}"#,
            r#"{"topic":"org.chicago.cta.station.arrivals.v1","value":{"station_id":1,"direction":"a","train_id":"T1","line":"red"}}"#,
            r#"{"topic":"mystery","value":"{}"}"#,
        ]);
        execute(&ProjectionConfig::default(), file.path().to_path_buf(), true).unwrap();
    }

    #[test]
    fn test_execute_rejects_zero_drain_size() {
        let file = capture(&[r#"{"topic":"mystery","value":{}}"#]);
        let config = ProjectionConfig::default()
            .with_consumer(transit::ConsumerConfig::new().with_max_drain(0));
        let err = execute(&config, file.path().to_path_buf(), false).unwrap_err();
        assert!(err.to_string().contains("Invalid projection config"));
    }
}
