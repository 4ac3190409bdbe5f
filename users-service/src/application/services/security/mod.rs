pub mod jwt;
pub mod passwords;

pub use jwt::{JwtService, TokenInfo};
pub use passwords::Passwords;
