use anyhow::Context;

use crate::application::ports::event_publisher::EventPublisher;
use crate::application::ports::outbox_repository::OutboxRepository;

/// Drains pending outbox rows for one topic, oldest first.
///
/// A row is deleted only after the publisher accepted it. A payload that is not
/// valid JSON halts the batch and stays in place for inspection; a publish
/// failure halts the batch with the error so the row is retried on the next run.
pub struct RelayOutbox<'a, O, P>
where
    O: OutboxRepository + ?Sized,
    P: EventPublisher + ?Sized,
{
    pub outbox: &'a O,
    pub publisher: &'a P,
    pub batch_size: i64,
}

impl<'a, O, P> RelayOutbox<'a, O, P>
where
    O: OutboxRepository + ?Sized,
    P: EventPublisher + ?Sized,
{
    pub async fn execute(&self, topic: &str) -> anyhow::Result<usize> {
        let messages = self.outbox.list_by_topic(topic, self.batch_size).await?;
        let mut relayed = 0;
        for message in messages {
            let payload: serde_json::Value = match serde_json::from_str(&message.value) {
                Ok(v) => v,
                Err(err) => {
                    tracing::error!(outbox_id = message.id, topic, error = %err, "outbox_payload_decode_failed");
                    return Ok(relayed);
                }
            };
            self.publisher
                .publish(topic, message.key, &payload)
                .await
                .with_context(|| format!("outbox_publish_failed id={}", message.id))?;
            self.outbox.delete(message.id).await?;
            relayed += 1;
        }
        if relayed > 0 {
            tracing::debug!(topic, relayed, "outbox_relayed");
        }
        Ok(relayed)
    }
}
