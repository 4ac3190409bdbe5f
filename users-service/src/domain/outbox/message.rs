#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub id: i32,
    pub topic: String,
    pub key: Option<i32>,
    /// Serialized JSON payload.
    pub value: String,
}
