pub mod auth;
pub mod outbox;
pub mod seed;
pub mod users;
