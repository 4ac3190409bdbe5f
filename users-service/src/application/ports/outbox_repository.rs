use async_trait::async_trait;

use crate::domain::outbox::OutboxMessage;

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Pending messages for `topic` in insertion order.
    async fn list_by_topic(&self, topic: &str, limit: i64) -> anyhow::Result<Vec<OutboxMessage>>;
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}
