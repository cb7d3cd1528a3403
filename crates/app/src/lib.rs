//! Teamdesk application composition root
//!
//! Wires configuration, the team store, session resolution and the audit
//! sink into a single router.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use sqlx::PgPool;
use teamdesk_audit::{AuditConfig, AuditDispatcher, AuditServiceFactory};
use teamdesk_auth::{AuthConfig, SessionResolver};
use teamdesk_common::config::Config;
use teamdesk_teams::{InMemoryTeamStore, TeamStore, TeamsRepositories, TeamsState};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{info, warn};

/// Largest request body accepted by the API
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes
pub async fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    let store = create_store(&config).await?;

    let audit_config = AuditConfig::from_env()?;
    let audit_service = AuditServiceFactory::create(audit_config)?;

    let teams_state = TeamsState {
        store,
        sessions: SessionResolver::new(AuthConfig::from(&config)),
        audit: AuditDispatcher::new(Arc::from(audit_service)),
    };

    Ok(build_router(teams_state))
}

/// Compose domain routers with the shared infrastructure routes
pub fn build_router(teams_state: TeamsState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Teamdesk API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(teamdesk_teams::routes().with_state(teams_state))
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-memory store
async fn create_store(config: &Config) -> Result<Arc<dyn TeamStore>, anyhow::Error> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory team store");
        return Ok(Arc::new(InMemoryTeamStore::new()));
    };

    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    info!("Database connection established");

    let repos = TeamsRepositories::new(pool);

    if config.run_migrations {
        repos.migrate().await?;
        info!("Database migrations applied");
    }

    Ok(Arc::new(repos))
}

/// CORS layer from a comma-separated origin list; permissive when unset
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(
            teamdesk_teams::api::handlers::teams::ALLOWED_METHODS.to_vec(),
        )
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

/// Reject request bodies above `MAX_BODY_BYTES`
pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
