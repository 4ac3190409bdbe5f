use crate::application::errors::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::User;

pub const USER_NOT_FOUND: &str = "User was not found";

pub struct GetUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetUser<'a, R> {
    pub async fn execute(&self, id: i32) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::bad_request(USER_NOT_FOUND))
    }
}
