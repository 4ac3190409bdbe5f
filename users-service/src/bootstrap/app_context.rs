use std::sync::Arc;

use crate::application::ports::event_publisher::EventPublisher;
use crate::application::ports::outbox_repository::OutboxRepository;
use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::{JwtService, Passwords};
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    outbox_repo: Arc<dyn OutboxRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    passwords: Passwords,
    jwt: JwtService,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        role_repo: Arc<dyn RoleRepository>,
        outbox_repo: Arc<dyn OutboxRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        passwords: Passwords,
        jwt: JwtService,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            outbox_repo,
            event_publisher,
            passwords,
            jwt,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn role_repo(&self) -> Arc<dyn RoleRepository> {
        self.services.role_repo.clone()
    }

    pub fn outbox_repo(&self) -> Arc<dyn OutboxRepository> {
        self.services.outbox_repo.clone()
    }

    pub fn event_publisher(&self) -> Arc<dyn EventPublisher> {
        self.services.event_publisher.clone()
    }

    pub fn passwords(&self) -> &Passwords {
        &self.services.passwords
    }

    pub fn jwt(&self) -> &JwtService {
        &self.services.jwt
    }
}
