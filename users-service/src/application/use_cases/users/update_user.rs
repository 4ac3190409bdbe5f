use std::collections::BTreeMap;

use crate::application::errors::AppError;
use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::Passwords;
use crate::domain::users::{RoleName, User};

use super::get_user::USER_NOT_FOUND;

pub struct UpdateUser<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub users: &'a U,
    pub roles: &'a R,
    pub passwords: &'a Passwords,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Replaces the role set when present and non-empty.
    pub roles: Option<Vec<String>>,
}

impl<'a, U, R> UpdateUser<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub async fn execute(&self, id: i32, changes: &UserChanges) -> Result<User, AppError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::bad_request(USER_NOT_FOUND))?;

        if let Some(username) = &changes.username {
            if *username != user.username {
                if let Some(other) = self.users.find_by_username(username).await? {
                    if other.id != user.id {
                        return Err(AppError::UsernameTaken);
                    }
                }
            }
            user.username = username.clone();
        }

        if let Some(password) = &changes.password {
            user.password_hash = self.passwords.hash(password)?;
        }

        if let Some(email) = &changes.email {
            if *email != user.email {
                if let Some(other) = self.users.find_by_email(email).await? {
                    if other.id != user.id {
                        return Err(AppError::EmailTaken);
                    }
                }
            }
            user.email = email.clone();
        }

        if let Some(names) = changes.roles.as_ref().filter(|r| !r.is_empty()) {
            let mut resolved = BTreeMap::new();
            for raw in names {
                let name: RoleName = raw
                    .parse()
                    .map_err(|_| AppError::bad_request("Role was not found"))?;
                let role = self
                    .roles
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| AppError::bad_request("Role was not found"))?;
                resolved.insert(role.id, role);
            }
            user.roles = resolved.into_values().collect();
        }

        let saved = self.users.update_user(&user).await?;
        tracing::info!(user_id = saved.id, "user_updated");
        Ok(saved)
    }
}
