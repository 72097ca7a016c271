//! Recorded message logs
//!
//! A log is JSON lines: one `{type, payload}` envelope per line. Blank lines
//! and lines starting with `//` are skipped. Lines are kept as raw text so a
//! replay goes through the same decode path as a live connection.
//!
//! A line may carry the time it was received as a top-level `receivedAt`.
//! Without it, a `payload.serverNow` stands in.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayLog {
    messages: Vec<String>,
    stamps: Vec<Option<DateTime<Utc>>>,
}

impl ReplayLog {
    pub fn parse(text: &str) -> Self {
        let messages = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("//"))
            .map(str::to_string)
            .collect();
        Self::from_messages(messages)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay log: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        let stamps = messages.iter().map(|line| recorded_at(line)).collect();
        Self { messages, stamps }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// When message `index` was recorded, if the line says
    pub fn received_at(&self, index: usize) -> Option<DateTime<Utc>> {
        self.stamps.get(index).copied().flatten()
    }

    /// Earliest recorded time in the log
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.iter().flatten().min().copied()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn recorded_at(line: &str) -> Option<DateTime<Utc>> {
    let value: Value = serde_json::from_str(line).ok()?;
    let stamp = value
        .get("receivedAt")
        .or_else(|| value.get("payload")?.get("serverNow"))?;
    serde_json::from_value(stamp.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let log = ReplayLog::parse(
            "// recorded 2024-05-01\n{\"type\":\"match.update-logs\",\"payload\":[]}\n\n  \n{\"type\":\"match.update-pass\",\"payload\":{}}\n",
        );
        assert_eq!(log.len(), 2);
        assert!(log.messages()[1].contains("update-pass"));
    }

    #[test]
    fn test_load_missing() {
        assert!(ReplayLog::load(Path::new("/nonexistent/game.jsonl")).is_err());
    }

    #[test]
    fn test_received_at() {
        let log = ReplayLog::parse(
            r#"{"type":"match.update-logs","payload":[],"receivedAt":"2024-05-01T10:00:05Z"}
{"type":"match.update-round-player","payload":{"player":"ana","deadline":"2024-05-01T10:00:30Z","serverNow":"2024-05-01T10:00:00Z"}}
{"type":"match.update-pass","payload":{}}
not json"#,
        );
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(log.received_at(0), Some(t0 + chrono::Duration::seconds(5)));
        assert_eq!(log.received_at(1), Some(t0));
        assert_eq!(log.received_at(2), None);
        assert_eq!(log.received_at(3), None);
        assert_eq!(log.received_at(9), None);
        assert_eq!(log.started_at(), Some(t0));
    }
}
