//! Spool-file publisher writing one JSON line per event.

use super::{EventPublisher, PublishError, PublishResult};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

#[derive(Serialize)]
struct SpoolLine<'a> {
    topic: &'a str,
    message: serde_json::Value,
}

/// Appends events to a newline-delimited JSON file.
///
/// Each line is flushed before `publish` returns.
pub struct JsonLinesPublisher {
    file: Mutex<File>,
}

impl JsonLinesPublisher {
    /// Opens `path` for appending, creating it when missing.
    pub fn open(path: impl AsRef<Path>) -> PublishResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventPublisher for JsonLinesPublisher {
    fn publish(&self, topic: &str, message: &[u8]) -> PublishResult<()> {
        // Non-JSON payloads are kept as a string rather than rejected.
        let message = serde_json::from_slice(message).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(message).into_owned())
        });
        let mut line = serde_json::to_vec(&SpoolLine { topic, message })?;
        line.push(b'\n');

        let mut file = self.file.lock().map_err(|_| PublishError::Closed {
            topic: topic.to_string(),
        })?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
