use crate::application::errors::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::security::{JwtService, Passwords};
use crate::domain::users::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub passwords: &'a Passwords,
    pub jwt: &'a JwtService,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<AuthenticatedUser, AppError> {
        let Some(user) = self.repo.find_by_username(&req.username).await? else {
            return Err(AppError::BadCredentials);
        };
        if !self.passwords.verify(&req.password, &user.password_hash) {
            return Err(AppError::BadCredentials);
        }
        let token = self.jwt.generate(&user)?;
        tracing::debug!(user_id = user.id, "login_succeeded");
        Ok(AuthenticatedUser { token, user })
    }
}
