use axum::{Router, routing::get};

use crate::application::errors::AppError;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::RoleName;
use crate::presentation::http::auth::CurrentUser;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/all", get(all_access))
        .route("/user", get(user_access))
        .route("/mod", get(moderator_access))
        .route("/admin", get(admin_access))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/test/all", tag = "Access", security(()), responses((status = 200, body = String)))]
pub async fn all_access() -> &'static str {
    "Public Content."
}

#[utoipa::path(get, path = "/test/user", tag = "Access", responses((status = 200, body = String)))]
pub async fn user_access(current: CurrentUser) -> Result<&'static str, AppError> {
    current.require_any(&RoleName::ALL)?;
    Ok("User Content.")
}

#[utoipa::path(get, path = "/test/mod", tag = "Access", responses((status = 200, body = String)))]
pub async fn moderator_access(current: CurrentUser) -> Result<&'static str, AppError> {
    current.require_any(&[RoleName::Moderator])?;
    Ok("Moderator Content.")
}

#[utoipa::path(get, path = "/test/admin", tag = "Access", responses((status = 200, body = String)))]
pub async fn admin_access(current: CurrentUser) -> Result<&'static str, AppError> {
    current.require_any(&[RoleName::Admin])?;
    Ok("Admin Content.")
}
