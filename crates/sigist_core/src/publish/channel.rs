//! In-process publisher backed by a standard channel.

use super::{EventPublisher, PublishError, PublishResult};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// One message handed to a [`ChannelPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Forwards events to an in-process receiver.
///
/// Publishing fails with [`PublishError::Closed`] once the receiver is dropped.
pub struct ChannelPublisher {
    sender: Mutex<Sender<PublishedEvent>>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, Receiver<PublishedEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender: Mutex::new(sender),
            },
            receiver,
        )
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, topic: &str, message: &[u8]) -> PublishResult<()> {
        let closed = || PublishError::Closed {
            topic: topic.to_string(),
        };
        let sender = self.sender.lock().map_err(|_| closed())?;
        sender
            .send(PublishedEvent {
                topic: topic.to_string(),
                payload: message.to_vec(),
            })
            .map_err(|_| closed())
    }
}
