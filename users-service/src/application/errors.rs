use std::collections::{BTreeMap, BTreeSet};

pub const GENERAL_FIELD: &str = "general";

/// Field name to sorted, de-duplicated messages.
pub type FieldErrors = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("{message}")]
    BadRequest { field: String, message: String },
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already in use")]
    EmailTaken,
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Full authentication is required to access this resource")]
    Unauthorized,
    #[error("Access Denied")]
    AccessDenied,
    #[error(transparent)]
    Internal(anyhow::Error),
}

/// Adapters may surface an `AppError` through `anyhow`; anything else is internal.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app) => app,
            Err(err) => AppError::Internal(err),
        }
    }
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::field(GENERAL_FIELD, message)
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field the message is reported under in the response envelope.
    pub fn field_name(&self) -> &str {
        match self {
            AppError::BadRequest { field, .. } => field,
            _ => GENERAL_FIELD,
        }
    }
}
