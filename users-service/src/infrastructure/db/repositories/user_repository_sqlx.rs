use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::application::errors::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::outbox::UserCreatedEvent;
use crate::domain::users::{NewUser, Role, User};
use crate::infrastructure::db::PgPool;

use super::role_repository_sqlx::role_from_row;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_ids: Vec<i32>) -> anyhow::Result<HashMap<i32, Vec<Role>>> {
        let mut by_user: HashMap<i32, Vec<Role>> = HashMap::new();
        if user_ids.is_empty() {
            return Ok(by_user);
        }
        let rows = sqlx::query(
            r#"SELECT ur.user_id, r.id, r.name
               FROM user_roles ur JOIN roles r ON r.id = ur.role_id
               WHERE ur.user_id = ANY($1)
               ORDER BY ur.user_id, r.id"#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let user_id: i32 = row.get("user_id");
            by_user.entry(user_id).or_default().push(role_from_row(&row)?);
        }
        Ok(by_user)
    }

    async fn hydrate(&self, rows: Vec<PgRow>) -> anyhow::Result<Vec<User>> {
        let ids = rows.iter().map(|r| r.get::<i32, _>("id")).collect();
        let mut roles = self.load_roles(ids).await?;
        Ok(rows
            .iter()
            .map(|r| {
                let id: i32 = r.get("id");
                User {
                    id,
                    username: r.get("username"),
                    email: r.get("email"),
                    password_hash: r.get("password"),
                    roles: roles.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn hydrate_one(&self, row: Option<PgRow>) -> anyhow::Result<Option<User>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Maps a lost race on the `users` unique constraints to the taken errors.
fn unique_violation(err: sqlx::Error) -> anyhow::Error {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db.constraint() {
                Some(USERNAME_CONSTRAINT) => return AppError::UsernameTaken.into(),
                Some(EMAIL_CONSTRAINT) => return AppError::EmailTaken.into(),
                _ => {}
            }
        }
    }
    err.into()
}

fn sorted_roles(roles: &[Role]) -> Vec<Role> {
    let mut roles = roles.to_vec();
    roles.sort_by_key(|r| r.id);
    roles.dedup_by_key(|r| r.id);
    roles
}

async fn link_roles(conn: &mut PgConnection, user_id: i32, roles: &[Role]) -> anyhow::Result<()> {
    for role in roles {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role.id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_user(conn: &mut PgConnection, user: &NewUser) -> anyhow::Result<User> {
    let row = sqlx::query(
        r#"INSERT INTO users (username, email, password) VALUES ($1, $2, $3)
           RETURNING id"#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(&mut *conn)
    .await
    .map_err(unique_violation)?;
    let id: i32 = row.get("id");
    let roles = sorted_roles(&user.roles);
    link_roles(conn, id, &roles).await?;
    Ok(User {
        id,
        username: user.username.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        roles,
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut tx = self.pool.begin().await?;
        let created = insert_user(&mut tx, user).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn create_user_with_outbox(
        &self,
        user: &NewUser,
        topic: &str,
    ) -> anyhow::Result<User> {
        let mut tx = self.pool.begin().await?;
        let created = insert_user(&mut tx, user).await?;
        let value = serde_json::to_string(&UserCreatedEvent::from(&created))?;
        sqlx::query("INSERT INTO outbox (topic, key, value) VALUES ($1, $2, $3)")
            .bind(topic)
            .bind(created.id)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, email, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.hydrate_one(row).await
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, username, email, password FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        self.hydrate_one(row).await
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        self.hydrate_one(row).await
    }

    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query("SELECT id, username, email, password FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<User> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query(
            r#"UPDATE users SET username = $2, email = $3, password = $4 WHERE id = $1"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(unique_violation)?;
        anyhow::ensure!(res.rows_affected() == 1, "user {} not found", user.id);

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        let roles = sorted_roles(&user.roles);
        link_roles(&mut tx, user.id, &roles).await?;
        tx.commit().await?;

        Ok(User {
            roles,
            ..user.clone()
        })
    }

    async fn delete_user(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
