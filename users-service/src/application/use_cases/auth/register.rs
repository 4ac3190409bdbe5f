use crate::application::errors::AppError;
use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::Passwords;
use crate::domain::outbox::USER_CREATED_TOPIC;
use crate::domain::users::{NewUser, RoleName, User};

pub struct Register<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub users: &'a U,
    pub roles: &'a R,
    pub passwords: &'a Passwords,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl<'a, U, R> Register<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AppError> {
        if self.users.exists_by_username(&req.username).await? {
            return Err(AppError::UsernameTaken);
        }
        if self.users.exists_by_email(&req.email).await? {
            return Err(AppError::EmailTaken);
        }

        let password_hash = self.passwords.hash(&req.password)?;
        let role = self
            .roles
            .find_by_name(RoleName::User)
            .await?
            .ok_or_else(|| AppError::bad_request("Role is not found."))?;

        let new_user = NewUser {
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
            roles: vec![role],
        };
        let user = self
            .users
            .create_user_with_outbox(&new_user, USER_CREATED_TOPIC)
            .await?;
        tracing::info!(user_id = user.id, username = %user.username, "user_registered");
        Ok(user)
    }
}
