use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::role_repository::RoleRepository;
use crate::domain::users::{Role, RoleName};
use crate::infrastructure::db::PgPool;

pub struct SqlxRoleRepository {
    pub pool: PgPool,
}

impl SqlxRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn role_from_row(row: &PgRow) -> anyhow::Result<Role> {
    let name: String = row.get("name");
    Ok(Role {
        id: row.get("id"),
        name: name.parse()?,
    })
}

#[async_trait]
impl RoleRepository for SqlxRoleRepository {
    async fn find_by_name(&self, name: RoleName) -> anyhow::Result<Option<Role>> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(role_from_row).transpose()
    }

    async fn exists_by_name(&self, name: RoleName) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_role(&self, name: RoleName) -> anyhow::Result<Role> {
        let row = sqlx::query(
            r#"INSERT INTO roles (name) VALUES ($1)
               ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
               RETURNING id, name"#,
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await?;
        role_from_row(&row)
    }
}
