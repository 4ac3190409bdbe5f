use crate::application::errors::AppError;
use crate::application::services::security::{JwtService, TokenInfo};

pub struct DecodeToken<'a> {
    pub jwt: &'a JwtService,
}

impl<'a> DecodeToken<'a> {
    pub fn execute(&self, token: &str) -> Result<TokenInfo, AppError> {
        self.jwt.decode(token.trim())
    }
}
