pub mod outbox_repository_sqlx;
pub mod role_repository_sqlx;
pub mod user_repository_sqlx;
