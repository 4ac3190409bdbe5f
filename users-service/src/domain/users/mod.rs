pub mod role;
pub mod user;

pub use role::{Role, RoleName, UnknownRole};
pub use user::{NewUser, User};
