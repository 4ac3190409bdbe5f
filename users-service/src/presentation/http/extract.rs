use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::application::errors::{AppError, FieldErrors};

pub const NOT_BLANK: &str = "must not be blank";
pub const MALFORMED_EMAIL: &str = "must be a well-formed email address";

/// JSON body that must pass its `validator` rules before reaching the handler.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rej: JsonRejection| AppError::bad_request(rej.body_text()))?;
        value
            .validate()
            .map_err(|errs| AppError::Validation(field_errors(&errs)))?;
        Ok(Self(value))
    }
}

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = out.entry(field.to_string()).or_default();
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            messages.insert(message);
        }
    }
    out
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message(NOT_BLANK.into()));
    }
    Ok(())
}

/// Required email: a blank value reports only `must not be blank`.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(MALFORMED_EMAIL.into()))
}
