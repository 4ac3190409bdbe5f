use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::outbox_repository::OutboxRepository;
use crate::domain::outbox::OutboxMessage;
use crate::infrastructure::db::PgPool;

pub struct SqlxOutboxRepository {
    pub pool: PgPool,
}

impl SqlxOutboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxRepository for SqlxOutboxRepository {
    async fn list_by_topic(&self, topic: &str, limit: i64) -> anyhow::Result<Vec<OutboxMessage>> {
        let rows = sqlx::query(
            r#"SELECT id, topic, key, value FROM outbox
               WHERE topic = $1 ORDER BY id LIMIT $2"#,
        )
        .bind(topic)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| OutboxMessage {
                id: r.get("id"),
                topic: r.get("topic"),
                key: r.get("key"),
                value: r.get("value"),
            })
            .collect())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM outbox WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
