use crate::application::errors::AppError;
use crate::application::ports::user_repository::UserRepository;

use super::get_user::USER_NOT_FOUND;

pub struct DeleteUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteUser<'a, R> {
    pub async fn execute(&self, id: i32) -> Result<(), AppError> {
        let deleted = self.repo.delete_user(id).await?;
        if !deleted {
            return Err(AppError::bad_request(USER_NOT_FOUND));
        }
        tracing::info!(user_id = id, "user_deleted");
        Ok(())
    }
}
