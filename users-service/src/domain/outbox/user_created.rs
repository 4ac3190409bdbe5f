use serde::{Deserialize, Serialize};

use crate::domain::users::{Role, User};

pub const USER_CREATED_TOPIC: &str = "user.created";

/// Payload written to the outbox when an account is registered.
/// The password hash is not part of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreatedEvent {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<&User> for UserCreatedEvent {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}
