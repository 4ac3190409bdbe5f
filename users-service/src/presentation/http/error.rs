use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::errors::AppError;
use crate::presentation::http::response::AppResponse;

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(errors) => {
                tracing::warn!(?errors, "request_validation_failed");
                AppResponse::<()>::with_errors(errors)
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                AppResponse::error(None, INTERNAL_MESSAGE)
            }
            other => {
                tracing::warn!(error = %other, field = other.field_name(), "request_rejected");
                AppResponse::error(Some(other.field_name()), other.to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_is_401_envelope() {
        let (status, body) = render(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "status": "ERROR",
                "data": null,
                "errors": {"general": ["Full authentication is required to access this resource"]}
            })
        );
    }

    #[tokio::test]
    async fn access_denied_is_bad_request() {
        let (status, body) = render(AppError::AccessDenied).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["general"], json!(["Access Denied"]));
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let (status, body) = render(anyhow::anyhow!("connection refused").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"]["general"], json!(["Internal server error"]));
    }

    #[tokio::test]
    async fn field_errors_keep_their_field() {
        let (_, body) = render(AppError::field("token", "must not be blank")).await;
        assert_eq!(body["errors"], json!({"token": ["must not be blank"]}));
    }
}
