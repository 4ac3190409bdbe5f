use crate::application::errors::AppError;
use crate::application::use_cases::auth::decode_token::DecodeToken;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::{Role, RoleName, User};
use crate::presentation::http::extract::{ValidJson, email_address, not_blank};
use crate::presentation::http::response::{AppResponse, JwtEnvelope, JwtInfoEnvelope, UserEnvelope};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Missing fields deserialize as empty so they report under their own name.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 20, message = "size must be between 3 and 20")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(
        custom(function = "email_address"),
        length(max = 50, message = "size must be between 0 and 50")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, max = 40, message = "size must be between 6 and 40")
    )]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<RoleResponse>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.iter().map(RoleResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JwtInfo {
    pub user_info: UserInfo,
    /// Epoch milliseconds.
    pub expiration: i64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DecodeTokenQuery {
    pub token: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/token/decode", get(decode_token))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/users/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = JwtEnvelope),
    (status = 400, description = "Bad credentials or invalid body")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AppResponse<JwtResponse>>, AppError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
        passwords: ctx.passwords(),
        jwt: ctx.jwt(),
    };
    let dto = LoginDto {
        username: req.username,
        password: req.password,
    };
    let auth = uc.execute(&dto).await?;
    let roles = auth.user.role_names();
    Ok(Json(AppResponse::ok(JwtResponse {
        token: auth.token,
        token_type: "Bearer",
        id: auth.user.id,
        username: auth.user.username,
        email: auth.user.email,
        roles,
    })))
}

#[utoipa::path(post, path = "/users/auth/register", tag = "Auth", request_body = SignupRequest, security(()), responses(
    (status = 200, body = UserEnvelope),
    (status = 400, description = "Username or email taken, or invalid body")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    ValidJson(req): ValidJson<SignupRequest>,
) -> Result<Json<AppResponse<UserResponse>>, AppError> {
    let users = ctx.user_repo();
    let roles = ctx.role_repo();
    let uc = RegisterUc {
        users: users.as_ref(),
        roles: roles.as_ref(),
        passwords: ctx.passwords(),
    };
    let dto = RegisterDto {
        username: req.username,
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await?;
    Ok(Json(AppResponse::ok(UserResponse::from(&user))))
}

#[utoipa::path(get, path = "/users/token/decode", tag = "Auth", params(DecodeTokenQuery), security(()), responses(
    (status = 200, body = JwtInfoEnvelope),
    (status = 400, description = "Invalid or expired token")
))]
pub async fn decode_token(
    State(ctx): State<AppContext>,
    Query(q): Query<DecodeTokenQuery>,
) -> Result<Json<AppResponse<JwtInfo>>, AppError> {
    let token = q
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::field("token", "must not be blank"))?;
    let uc = DecodeToken { jwt: ctx.jwt() };
    let info = uc.execute(&token)?;
    Ok(Json(AppResponse::ok(JwtInfo {
        user_info: UserInfo { id: info.user_id },
        expiration: info.expiration.timestamp_millis(),
    })))
}

// --- Bearer & CurrentUser extractors ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Bearer(t.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

/// Authenticated caller, loaded with its roles.
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn require_any(&self, roles: &[RoleName]) -> Result<(), AppError> {
        if self.0.has_any_role(roles) {
            return Ok(());
        }
        tracing::warn!(user_id = self.0.id, required = ?roles, "access_denied");
        Err(AppError::AccessDenied)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Bearer(token) = Bearer::from_request_parts(parts, ctx).await?;
        if !ctx.jwt().validate(&token) {
            return Err(AppError::Unauthorized);
        }
        let username = ctx
            .jwt()
            .username_from(&token)
            .map_err(|_| AppError::Unauthorized)?;
        let user = ctx
            .user_repo()
            .find_by_username(&username)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::test_context;
    use axum::http::Request;
    use axum::http::header::AUTHORIZATION;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/users/user");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn token_for(ctx: &AppContext, username: &str) -> String {
        let user = ctx
            .user_repo()
            .find_by_username(username)
            .await
            .unwrap()
            .unwrap();
        ctx.jwt().generate(&user).unwrap()
    }

    #[tokio::test]
    async fn login_returns_bearer_token_and_role_names() {
        let (ctx, _) = test_context().await;
        let Json(resp) = login(
            State(ctx.clone()),
            ValidJson(LoginRequest {
                username: "admin".into(),
                password: "adminPassword".into(),
            }),
        )
        .await
        .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.token_type, "Bearer");
        assert_eq!(data.id, 1);
        assert_eq!(data.roles, vec!["ROLE_ADMIN".to_string()]);
        assert_eq!(ctx.jwt().username_from(&data.token).unwrap(), "admin");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_bad_credentials() {
        let (ctx, _) = test_context().await;
        let err = login(
            State(ctx),
            ValidJson(LoginRequest {
                username: "admin".into(),
                password: "nope".into(),
            }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AppError::BadCredentials));
    }

    #[test]
    fn empty_login_reports_both_fields() {
        let errs = LoginRequest {
            username: String::new(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        let fields = crate::presentation::http::extract::field_errors(&errs);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["password", "username"]);
        assert!(fields["username"].contains("must not be blank"));
    }

    #[test]
    fn signup_rejects_short_username_and_bad_email() {
        let errs = SignupRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "secret1".into(),
        }
        .validate()
        .unwrap_err();
        let fields = crate::presentation::http::extract::field_errors(&errs);
        assert!(fields["username"].contains("size must be between 3 and 20"));
        assert!(fields["email"].contains("must be a well-formed email address"));
        assert!(!fields.contains_key("password"));
    }

    #[tokio::test]
    async fn missing_login_field_reports_under_its_name() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::header::CONTENT_TYPE;

        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"admin"}"#))
            .unwrap();
        let err = ValidJson::<LoginRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["password"]);
        assert!(fields["password"].contains("must not be blank"));
    }

    #[test]
    fn blank_signup_email_is_only_reported_as_blank() {
        let errs = SignupRequest {
            username: "newbie".into(),
            email: String::new(),
            password: "secret1".into(),
        }
        .validate()
        .unwrap_err();
        let fields = crate::presentation::http::extract::field_errors(&errs);
        assert_eq!(
            fields["email"].iter().collect::<Vec<_>>(),
            vec!["must not be blank"]
        );
    }

    #[tokio::test]
    async fn register_creates_user_with_user_role() {
        let (ctx, store) = test_context().await;
        let Json(resp) = register(
            State(ctx),
            ValidJson(SignupRequest {
                username: "newbie".into(),
                email: "newbie@myblog.org".into(),
                password: "secret1".into(),
            }),
        )
        .await
        .unwrap();
        let user = resp.data.unwrap();
        assert_eq!(user.id, 4);
        assert_eq!(user.roles[0].name, "ROLE_USER");
        assert_eq!(store.user_count(), 4);
    }

    #[tokio::test]
    async fn decode_token_reports_user_id_and_expiration() {
        let (ctx, _) = test_context().await;
        let token = token_for(&ctx, "maxsmg").await;
        let Json(resp) = decode_token(
            State(ctx),
            Query(DecodeTokenQuery { token: Some(token) }),
        )
        .await
        .unwrap();
        let info = resp.data.unwrap();
        assert_eq!(info.user_info.id, 3);
        assert!(info.expiration > chrono::Utc::now().timestamp_millis());
    }

    #[tokio::test]
    async fn decode_token_requires_token() {
        let (ctx, _) = test_context().await;
        let err = decode_token(State(ctx), Query(DecodeTokenQuery { token: None }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.field_name(), "token");
    }

    #[tokio::test]
    async fn current_user_requires_bearer() {
        let (ctx, _) = test_context().await;
        let mut p = parts(None);
        let err = CurrentUser::from_request_parts(&mut p, &ctx)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthorized));

        let mut p = parts(Some("Bearer garbage"));
        let err = CurrentUser::from_request_parts(&mut p, &ctx)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn current_user_loads_roles_and_checks_access() {
        let (ctx, _) = test_context().await;
        let token = token_for(&ctx, "moderator").await;
        let mut p = parts(Some(&format!("Bearer {token}")));
        let user = CurrentUser::from_request_parts(&mut p, &ctx).await.unwrap();

        assert_eq!(user.0.username, "moderator");
        assert!(user.require_any(&[RoleName::Moderator]).is_ok());
        assert!(matches!(
            user.require_any(&[RoleName::Admin]),
            Err(AppError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn deleted_user_token_is_unauthorized() {
        let (ctx, _) = test_context().await;
        let token = token_for(&ctx, "maxsmg").await;
        ctx.user_repo().delete_user(3).await.unwrap();
        let mut p = parts(Some(&format!("Bearer {token}")));
        let err = CurrentUser::from_request_parts(&mut p, &ctx)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
