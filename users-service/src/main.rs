use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use users_service::application::services::security::{JwtService, Passwords};
use users_service::application::use_cases::outbox::relay::RelayOutbox;
use users_service::application::use_cases::seed::seed_defaults::SeedDefaults;
use users_service::bootstrap::app_context::{AppContext, AppServices};
use users_service::bootstrap::config::Config;
use users_service::domain::outbox::USER_CREATED_TOPIC;
use users_service::infrastructure::db::repositories::outbox_repository_sqlx::SqlxOutboxRepository;
use users_service::infrastructure::db::repositories::role_repository_sqlx::SqlxRoleRepository;
use users_service::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use users_service::infrastructure::events::pg_notify_publisher::PgNotifyPublisher;

#[derive(OpenApi)]
#[openapi(
        paths(
            users_service::presentation::http::auth::login,
            users_service::presentation::http::auth::register,
            users_service::presentation::http::auth::decode_token,
            users_service::presentation::http::users::list_users,
            users_service::presentation::http::users::get_user,
            users_service::presentation::http::users::update_user,
            users_service::presentation::http::users::delete_user,
            users_service::presentation::http::access::all_access,
            users_service::presentation::http::access::user_access,
            users_service::presentation::http::access::moderator_access,
            users_service::presentation::http::access::admin_access,
            users_service::presentation::http::health::health,
        ),
        components(schemas(
            users_service::presentation::http::response::ResponseStatus,
            users_service::presentation::http::response::JwtEnvelope,
            users_service::presentation::http::response::UserEnvelope,
            users_service::presentation::http::response::UserListEnvelope,
            users_service::presentation::http::response::JwtInfoEnvelope,
            users_service::presentation::http::response::MessageEnvelope,
            users_service::presentation::http::auth::LoginRequest,
            users_service::presentation::http::auth::SignupRequest,
            users_service::presentation::http::auth::JwtResponse,
            users_service::presentation::http::auth::JwtInfo,
            users_service::presentation::http::auth::UserInfo,
            users_service::presentation::http::auth::UserResponse,
            users_service::presentation::http::auth::RoleResponse,
            users_service::presentation::http::users::UserPutRequest,
            users_service::presentation::http::health::HealthResp,
        )),
        modifiers(&SecurityAddon),
        security(("bearerAuth" = [])),
        tags(
            (name = "Auth", description = "Sign in, sign up and token inspection"),
            (name = "Users", description = "User administration"),
            (name = "Access", description = "Role-based access probes"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "cors_origin_ignored");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "users_service=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting users service");

    // Database
    let pool = users_service::infrastructure::db::connect_pool(
        &cfg.database_url,
        cfg.database_max_connections,
    )
    .await?;
    users_service::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let role_repo = Arc::new(SqlxRoleRepository::new(pool.clone()));
    let outbox_repo = Arc::new(SqlxOutboxRepository::new(pool.clone()));
    let event_publisher = Arc::new(PgNotifyPublisher::new(pool.clone()));
    let passwords = Passwords::default();
    let jwt = JwtService::new(&cfg.jwt_secret, cfg.jwt_expiration_ms)?;

    if cfg.seed_data {
        SeedDefaults {
            users: user_repo.as_ref(),
            roles: role_repo.as_ref(),
            passwords: &passwords,
        }
        .execute()
        .await?;
    }

    let services = AppServices::new(
        user_repo,
        role_repo,
        outbox_repo,
        event_publisher,
        passwords,
        jwt,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let users_router = users_service::presentation::http::auth::routes(ctx.clone())
        .merge(users_service::presentation::http::users::routes(ctx.clone()));

    let app = Router::new()
        .nest("/users", users_router)
        .nest(
            "/test",
            users_service::presentation::http::access::routes(ctx.clone()),
        )
        .merge(users_service::presentation::http::health::routes(pool.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    });

    // Outbox relay
    let relay_ctx = ctx.clone();
    let relay_handle: JoinHandle<()> = tokio::spawn(async move {
        let interval = Duration::from_millis(relay_ctx.cfg.outbox_poll_interval_ms);
        loop {
            let outbox = relay_ctx.outbox_repo();
            let publisher = relay_ctx.event_publisher();
            let uc = RelayOutbox {
                outbox: outbox.as_ref(),
                publisher: publisher.as_ref(),
                batch_size: relay_ctx.cfg.outbox_batch_size,
            };
            if let Err(e) = uc.execute(USER_CREATED_TOPIC).await {
                error!(error = ?e, "outbox_relay_failed");
            }
            sleep(interval).await;
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    relay_handle.abort();
    if let Err(e) = relay_handle.await {
        if e.is_panic() {
            error!(?e, "Outbox relay task panicked");
        }
    }
    Ok(())
}
