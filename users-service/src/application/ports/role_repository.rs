use async_trait::async_trait;

use crate::domain::users::{Role, RoleName};

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: RoleName) -> anyhow::Result<Option<Role>>;
    async fn exists_by_name(&self, name: RoleName) -> anyhow::Result<bool>;
    async fn create_role(&self, name: RoleName) -> anyhow::Result<Role>;
}
