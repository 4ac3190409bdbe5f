//! In-memory port implementations shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::event_publisher::EventPublisher;
use crate::application::ports::outbox_repository::OutboxRepository;
use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::{JwtService, Passwords};
use crate::application::use_cases::seed::seed_defaults::SeedDefaults;
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::outbox::{OutboxMessage, UserCreatedEvent};
use crate::domain::users::{NewUser, Role, RoleName, User};

pub const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-sec";

#[derive(Default)]
struct State {
    users: Vec<User>,
    roles: Vec<Role>,
    outbox: Vec<OutboxMessage>,
    next_user_id: i32,
    next_outbox_id: i32,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn push_outbox(&self, topic: &str, key: Option<i32>, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_outbox_id += 1;
        let id = state.next_outbox_id;
        state.outbox.push(OutboxMessage {
            id,
            topic: topic.to_string(),
            key,
            value: value.to_string(),
        });
    }

    fn insert(state: &mut State, user: &NewUser) -> User {
        state.next_user_id += 1;
        let mut roles = user.roles.clone();
        roles.sort_by_key(|r| r.id);
        let created = User {
            id: state.next_user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            roles,
        };
        state.users.push(created.clone());
        created
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::insert(&mut state, user))
    }

    async fn create_user_with_outbox(
        &self,
        user: &NewUser,
        topic: &str,
    ) -> anyhow::Result<User> {
        let mut state = self.state.lock().unwrap();
        let created = Self::insert(&mut state, user);
        let value = serde_json::to_string(&UserCreatedEvent::from(&created))?;
        state.next_outbox_id += 1;
        let id = state.next_outbox_id;
        state.outbox.push(OutboxMessage {
            id,
            topic: topic.to_string(),
            key: Some(created.id),
            value,
        });
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let state = self.state.lock().unwrap();
        let mut users = state.users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<User> {
        let mut state = self.state.lock().unwrap();
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| anyhow::anyhow!("user {} vanished", user.id))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i32) -> anyhow::Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        Ok(state.users.len() != before)
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_name(&self, name: RoleName) -> anyhow::Result<Option<Role>> {
        let state = self.state.lock().unwrap();
        Ok(state.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn exists_by_name(&self, name: RoleName) -> anyhow::Result<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn create_role(&self, name: RoleName) -> anyhow::Result<Role> {
        let mut state = self.state.lock().unwrap();
        let role = Role {
            id: state.roles.len() as i32 + 1,
            name,
        };
        state.roles.push(role.clone());
        Ok(role)
    }
}

#[async_trait]
impl OutboxRepository for InMemoryStore {
    async fn list_by_topic(&self, topic: &str, limit: i64) -> anyhow::Result<Vec<OutboxMessage>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .outbox
            .iter()
            .filter(|m| m.topic == topic)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.outbox.len();
        state.outbox.retain(|m| m.id != id);
        Ok(state.outbox.len() != before)
    }
}

/// Records publishes; optionally fails for one key.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(String, Option<i32>, Value)>>,
    fail_on_key: Option<i32>,
}

impl RecordingPublisher {
    pub fn failing_on(key: i32) -> Self {
        Self {
            published: Mutex::default(),
            fail_on_key: Some(key),
        }
    }

    pub fn published(&self) -> Vec<(String, Option<i32>, Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, key: Option<i32>, payload: &Value) -> anyhow::Result<()> {
        if key.is_some() && key == self.fail_on_key {
            anyhow::bail!("broker unavailable");
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), key, payload.clone()));
        Ok(())
    }
}

/// Store with the three roles and the default accounts (admin=1, moderator=2, maxsmg=3).
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    SeedDefaults {
        users: store.as_ref(),
        roles: store.as_ref(),
        passwords: &Passwords::fast(),
    }
    .execute()
    .await
    .unwrap();
    store
}

pub async fn test_context() -> (AppContext, Arc<InMemoryStore>) {
    let store = seeded_store().await;
    let cfg = Config::from_vars(|_| None).unwrap();
    let services = AppServices::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(RecordingPublisher::default()),
        Passwords::fast(),
        JwtService::new(TEST_SECRET, 60_000).unwrap(),
    );
    (AppContext::new(cfg, services), store)
}
