//! Outbound event publishing after a successful save.
//!
//! # Responsibility
//! - Define the one-method publisher capability injected into services.
//! - Provide the event envelope written for created records.
//!
//! # Invariants
//! - Publishing is a single synchronous call; no retry, batching or
//!   acknowledgment tracking happens here.

mod channel;
mod jsonl;
mod log_sink;

pub use channel::{ChannelPublisher, PublishedEvent};
pub use jsonl::JsonLinesPublisher;
pub use log_sink::LogPublisher;

use crate::model::record::Record;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The event could not be serialized to JSON.
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    /// The destination no longer accepts messages.
    #[error("publisher for topic `{topic}` is closed")]
    Closed { topic: String },
    /// Writing to the destination failed.
    #[error("failed to write event: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability for handing one message to a topic/destination.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, topic: &str, message: &[u8]) -> PublishResult<()>;
}

/// Event envelope published for every created record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEvent<'a> {
    pub event: &'static str,
    pub table: &'a str,
    pub record: &'a Record,
}

impl<'a> RecordEvent<'a> {
    pub fn created(table: &'a str, record: &'a Record) -> Self {
        Self {
            event: "record_created",
            table,
            record,
        }
    }
}

/// A publisher bound to the configured topic.
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn EventPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Encodes `event` as JSON and publishes it to the configured topic.
    pub fn notify(&self, event: &RecordEvent<'_>) -> PublishResult<()> {
        let message = serde_json::to_vec(event)?;
        self.publisher.publish(&self.topic, &message)
    }
}

/// Builds the publisher for a service: a spool file when `sink` is set,
/// otherwise the application log.
pub fn build_publisher(sink: Option<&Path>) -> PublishResult<Arc<dyn EventPublisher>> {
    match sink {
        Some(path) => Ok(Arc::new(JsonLinesPublisher::open(path)?)),
        None => Ok(Arc::new(LogPublisher)),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelPublisher, Notifier, RecordEvent};
    use crate::model::record::{Record, RecordId, RecordInput};
    use std::sync::Arc;

    #[test]
    fn notifier_publishes_json_envelope_to_its_topic() {
        let (publisher, receiver) = ChannelPublisher::new();
        let notifier = Notifier::new(Arc::new(publisher), "data-pipe");
        let input = RecordInput::new("John", "Doe", "john@doe.com").with_feedback("great");
        let record = Record::from_input(RecordId::Serial(3), &input, "2024-01-01T00:00:00Z");

        notifier
            .notify(&RecordEvent::created("users", &record))
            .unwrap();

        let event = receiver.recv().unwrap();
        assert_eq!(event.topic, "data-pipe");
        let payload: serde_json::Value = serde_json::from_slice(&event.payload).unwrap();
        assert_eq!(payload["event"], "record_created");
        assert_eq!(payload["table"], "users");
        assert_eq!(payload["record"]["feedback"], "great");
        assert_eq!(payload["record"]["id"], 3);
    }
}
