use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::event_publisher::EventPublisher;
use crate::infrastructure::db::PgPool;

/// Publishes outbox events on a Postgres NOTIFY channel derived from the topic.
#[derive(Clone)]
pub struct PgNotifyPublisher {
    pool: PgPool,
}

impl PgNotifyPublisher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `user.created` -> `user_created`.
pub fn channel_for(topic: &str) -> String {
    topic.replace('.', "_")
}

#[derive(Debug, Serialize)]
struct EventEnvelope<'a> {
    topic: &'a str,
    key: Option<i32>,
    payload: &'a Value,
}

#[async_trait]
impl EventPublisher for PgNotifyPublisher {
    async fn publish(&self, topic: &str, key: Option<i32>, payload: &Value) -> anyhow::Result<()> {
        let envelope = EventEnvelope {
            topic,
            key,
            payload,
        };
        let body = serde_json::to_string(&envelope).context("event_serialize")?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(channel_for(topic))
            .bind(body)
            .execute(&self.pool)
            .await
            .context("event_pg_notify")?;

        Ok(())
    }
}
