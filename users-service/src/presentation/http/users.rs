use std::collections::BTreeSet;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::errors::AppError;
use crate::application::use_cases::users::delete_user::DeleteUser;
use crate::application::use_cases::users::get_user::GetUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::update_user::{UpdateUser, UserChanges};
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::RoleName;
use crate::presentation::http::auth::{CurrentUser, UserResponse};
use crate::presentation::http::extract::ValidJson;
use crate::presentation::http::response::{
    AppResponse, MessageEnvelope, UserEnvelope, UserListEnvelope,
};

const ADMIN_ONLY: &[RoleName] = &[RoleName::Admin];

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserPutRequest {
    #[validate(length(min = 3, max = 20, message = "size must be between 3 and 20"))]
    pub username: Option<String>,
    #[validate(
        length(min = 3, max = 50, message = "size must be between 3 and 50"),
        email(message = "must be a well-formed email address")
    )]
    pub email: Option<String>,
    #[validate(length(max = 120, message = "size must be between 0 and 120"))]
    pub password: Option<String>,
    pub roles: Option<BTreeSet<String>>,
}

impl From<UserPutRequest> for UserChanges {
    fn from(req: UserPutRequest) -> Self {
        UserChanges {
            username: req.username,
            email: req.email,
            password: req.password,
            roles: req.roles.map(|r| r.into_iter().collect()),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/user", get(list_users))
        .route(
            "/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(ctx)
}

fn user_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rej| AppError::field("id", rej.body_text()))
}

#[utoipa::path(get, path = "/users/user", tag = "Users", responses(
    (status = 200, body = UserListEnvelope),
    (status = 401, description = "Missing or invalid token")
))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    current: CurrentUser,
) -> Result<Json<AppResponse<Vec<UserResponse>>>, AppError> {
    current.require_any(ADMIN_ONLY)?;
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let users = uc.execute().await?;
    Ok(Json(AppResponse::ok(
        users.iter().map(UserResponse::from).collect(),
    )))
}

#[utoipa::path(get, path = "/users/user/{id}", tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = UserEnvelope))
)]
pub async fn get_user(
    State(ctx): State<AppContext>,
    current: CurrentUser,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<AppResponse<UserResponse>>, AppError> {
    current.require_any(ADMIN_ONLY)?;
    let id = user_id(path)?;
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    let user = uc.execute(id).await?;
    Ok(Json(AppResponse::ok(UserResponse::from(&user))))
}

#[utoipa::path(put, path = "/users/user/{id}", tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserPutRequest,
    responses((status = 200, body = UserEnvelope))
)]
pub async fn update_user(
    State(ctx): State<AppContext>,
    current: CurrentUser,
    path: Result<Path<i32>, PathRejection>,
    ValidJson(req): ValidJson<UserPutRequest>,
) -> Result<Json<AppResponse<UserResponse>>, AppError> {
    current.require_any(ADMIN_ONLY)?;
    let id = user_id(path)?;
    let users = ctx.user_repo();
    let roles = ctx.role_repo();
    let uc = UpdateUser {
        users: users.as_ref(),
        roles: roles.as_ref(),
        passwords: ctx.passwords(),
    };
    let user = uc.execute(id, &UserChanges::from(req)).await?;
    Ok(Json(AppResponse::ok(UserResponse::from(&user))))
}

#[utoipa::path(delete, path = "/users/user/{id}", tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = MessageEnvelope))
)]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    current: CurrentUser,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<AppResponse<String>>, AppError> {
    current.require_any(ADMIN_ONLY)?;
    let id = user_id(path)?;
    let repo = ctx.user_repo();
    let uc = DeleteUser {
        repo: repo.as_ref(),
    };
    uc.execute(id).await?;
    Ok(Json(AppResponse::ok("Deleted".to_string())))
}
