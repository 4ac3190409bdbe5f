use async_trait::async_trait;

use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User>;
    /// Inserts the user, its role links and a `UserCreatedEvent` outbox row
    /// keyed by the new id in one transaction.
    async fn create_user_with_outbox(&self, user: &NewUser, topic: &str)
    -> anyhow::Result<User>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool>;
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;
    /// All users ordered by id.
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
    /// Persists scalar fields and replaces the role set.
    async fn update_user(&self, user: &User) -> anyhow::Result<User>;
    async fn delete_user(&self, id: i32) -> anyhow::Result<bool>;
}
