use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::errors::AppError;
use crate::domain::users::User;

/// HS256 keys need at least 256 bits.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    /// JSON-encoded `UserClaim`, kept as a string for consumers that expect it.
    user: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserClaim {
    id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: i32,
    pub expiration: DateTime<Utc>,
}

#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_ms: i64,
}

impl JwtService {
    pub fn new(secret: &[u8], expiration_ms: i64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            secret.len() >= MIN_SECRET_BYTES,
            "JWT secret must be at least {} bytes",
            MIN_SECRET_BYTES
        );
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expiration_ms,
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is enforced to the second; no clock skew allowance.
        validation.leeway = 0;
        validation
    }

    pub fn generate(&self, user: &User) -> anyhow::Result<String> {
        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: user.username.clone(),
            user: serde_json::to_string(&UserClaim { id: user.id })?,
            iat: now / 1000,
            exp: (now + self.expiration_ms) / 1000,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    fn claims(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Self::validation())
            .map(|data| data.claims)
    }

    pub fn username_from(&self, token: &str) -> Result<String, AppError> {
        self.claims(token)
            .map(|c| c.sub)
            .map_err(|e| decode_error(&e))
    }

    pub fn decode(&self, token: &str) -> Result<TokenInfo, AppError> {
        let claims = self.claims(token).map_err(|e| decode_error(&e))?;
        let user: UserClaim = serde_json::from_str(&claims.user)
            .map_err(|_| AppError::bad_request("Invalid JWT token"))?;
        let expiration = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AppError::bad_request("Invalid JWT token"))?;
        Ok(TokenInfo {
            user_id: user.id,
            expiration,
        })
    }

    pub fn validate(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            tracing::warn!("JWT claims string is empty");
            return false;
        }
        match self.claims(token) {
            Ok(_) => true,
            Err(err) => {
                match err.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::warn!(error = %err, "JWT token is expired")
                    }
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        tracing::warn!(error = %err, "JWT token is unsupported")
                    }
                    _ => tracing::warn!(error = %err, "Invalid JWT token"),
                }
                false
            }
        }
    }
}

fn decode_error(err: &jsonwebtoken::errors::Error) -> AppError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AppError::bad_request("JWT token is expired"),
        _ => AppError::bad_request("Invalid JWT token"),
    }
}
