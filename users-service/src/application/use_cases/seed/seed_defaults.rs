use anyhow::Context;

use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::Passwords;
use crate::domain::users::{NewUser, RoleName};

/// Accounts created on an empty database: (username, password, email, role).
pub const DEFAULT_ACCOUNTS: [(&str, &str, &str, RoleName); 3] = [
    ("admin", "adminPassword", "admin@myblog.org", RoleName::Admin),
    (
        "moderator",
        "moderatorPassword",
        "moderator@myblog.org",
        RoleName::Moderator,
    ),
    ("maxsmg", "qweqwe", "maxsmg@myblog.org", RoleName::User),
];

pub struct SeedDefaults<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub users: &'a U,
    pub roles: &'a R,
    pub passwords: &'a Passwords,
}

impl<'a, U, R> SeedDefaults<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    /// Roles first so the accounts below can reference them. Idempotent.
    pub async fn execute(&self) -> anyhow::Result<()> {
        if !self.roles.exists_by_name(RoleName::User).await? {
            for name in RoleName::ALL {
                self.roles.create_role(name).await?;
            }
            tracing::info!("seeded_roles");
        }

        if self.users.exists_by_username("admin").await? {
            return Ok(());
        }
        for (username, password, email, role_name) in DEFAULT_ACCOUNTS {
            let role = self
                .roles
                .find_by_name(role_name)
                .await?
                .with_context(|| format!("role {} missing after seeding", role_name))?;
            let user = NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: self.passwords.hash(password)?,
                roles: vec![role],
            };
            self.users.create_user(&user).await?;
        }
        tracing::info!(count = DEFAULT_ACCOUNTS.len(), "seeded_default_accounts");
        Ok(())
    }
}
