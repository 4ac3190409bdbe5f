pub mod message;
pub mod user_created;

pub use message::OutboxMessage;
pub use user_created::{USER_CREATED_TOPIC, UserCreatedEvent};
