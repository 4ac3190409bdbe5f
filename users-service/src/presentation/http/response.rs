use serde::Serialize;
use utoipa::ToSchema;

use crate::application::errors::{FieldErrors, GENERAL_FIELD};
use crate::presentation::http::auth::{JwtInfo, JwtResponse, UserResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Envelope wrapped around every JSON response of the users API.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    JwtEnvelope = AppResponse<JwtResponse>,
    UserEnvelope = AppResponse<UserResponse>,
    UserListEnvelope = AppResponse<Vec<UserResponse>>,
    JwtInfoEnvelope = AppResponse<JwtInfo>,
    MessageEnvelope = AppResponse<String>
)]
pub struct AppResponse<T> {
    pub status: ResponseStatus,
    pub data: Option<T>,
    /// Field name to sorted messages.
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}

impl<T> AppResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            data: Some(data),
            errors: None,
        }
    }

    pub fn with_errors(errors: FieldErrors) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            errors: Some(errors),
        }
    }

    /// Adds `message` under `field` (or `general`) and flips the status to ERROR.
    pub fn error_fluent(mut self, field: Option<&str>, message: impl Into<String>) -> Self {
        self.status = ResponseStatus::Error;
        self.errors
            .get_or_insert_with(FieldErrors::new)
            .entry(field.unwrap_or(GENERAL_FIELD).to_string())
            .or_default()
            .insert(message.into());
        self
    }
}

impl AppResponse<()> {
    pub fn error(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            errors: None,
        }
        .error_fluent(field, message)
    }
}
