use super::{EventPublisher, PublishResult};
use log::info;

/// Writes each event to the application log.
///
/// Used when no external destination is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

impl EventPublisher for LogPublisher {
    fn publish(&self, topic: &str, message: &[u8]) -> PublishResult<()> {
        info!(
            "event=publish module=publish status=ok sink=log topic={} message={}",
            topic,
            String::from_utf8_lossy(message)
        );
        Ok(())
    }
}
