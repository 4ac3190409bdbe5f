pub mod event_publisher;
pub mod outbox_repository;
pub mod role_repository;
pub mod user_repository;
