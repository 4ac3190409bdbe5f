pub mod access;
pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod response;
pub mod users;
