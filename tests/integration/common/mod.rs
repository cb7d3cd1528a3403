//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - Session token minting
//! - User and team fixtures over the in-memory store
//! - A request helper returning status, headers and parsed JSON

use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use teamdesk_audit::{AuditDispatcher, AuditEvent, MockAuditService};
use teamdesk_auth::{AuthConfig, SessionClaims, SessionResolver};
use teamdesk_teams::{InMemoryTeamStore, Team, TeamRole, TeamStore, TeamsState};
use tower::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Test environment configuration
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub database_url: Option<String>,
    pub jwt_secret: String,
}

impl TestConfig {
    pub fn from_env() -> Self {
        INIT.call_once(|| {
            dotenvy::from_filename(".env.test").ok();
        });

        Self {
            database_url: env::var("TEST_DATABASE_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            jwt_secret: env::var("TEST_JWT_SECRET")
                .unwrap_or_else(|_| "test_secret_key_for_testing_only".to_string()),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            issuer: None,
            audience: None,
        }
    }
}

/// A user identity the tests can mint tokens for
#[derive(Debug, Clone)]
pub struct UserFixture {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl UserFixture {
    pub fn new(label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: format!("{}@teamdesk.test", label),
            name: Some(format!("User {}", label)),
        }
    }
}

/// Router over an in-memory store with a recording audit sink
pub struct TestApp {
    pub config: TestConfig,
    pub store: InMemoryTeamStore,
    pub audit: MockAuditService,
    pub router: Router,
}

/// Decoded HTTP response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_audit(MockAuditService::new())
    }

    pub fn with_audit(audit: MockAuditService) -> Self {
        let config = TestConfig::from_env();
        let store = InMemoryTeamStore::new();

        let state = TeamsState {
            store: Arc::new(store.clone()),
            sessions: SessionResolver::new(config.auth_config()),
            audit: AuditDispatcher::new(Arc::new(audit.clone())),
        };

        Self {
            config,
            store,
            audit,
            router: teamdesk_app::build_router(state),
        }
    }

    /// Sign a session token for `user`
    pub fn token_for(&self, user: &UserFixture) -> String {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            name: user.name.clone(),
            iat: now,
            exp: now + 3600,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .expect("token encoding")
    }

    /// Create a team with `owner` as its owner
    pub async fn create_team(&self, name: &str, slug: &str, owner: &UserFixture) -> Result<Team> {
        let team = self
            .store
            .insert_team(Team::new(name.to_string(), slug.to_string())?)
            .await?;
        self.store
            .add_member(team.id, owner.id, TeamRole::Owner)
            .await?;
        Ok(team)
    }

    pub async fn add_member(&self, team: &Team, user: &UserFixture, role: TeamRole) -> Result<()> {
        self.store.add_member(team.id, user.id, role).await?;
        Ok(())
    }

    /// Current stored state of a team, if it exists
    pub async fn find_team(&self, slug: &str) -> Option<Team> {
        self.store.get_by_slug(slug).await.expect("store read")
    }

    /// Current stored state of a team that must exist
    pub async fn store_team(&self, slug: &str) -> Team {
        self.find_team(slug)
            .await
            .unwrap_or_else(|| panic!("team '{}' should exist", slug))
    }

    /// Send a request; `user` adds a bearer token, `body` is sent verbatim
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&UserFixture>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", self.token_for(user)));
        }
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }

        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_default())
            .expect("request build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Audit events after delivery settles: waits for `count`, then briefly for
    /// a stray extra so callers can assert an exact total
    pub async fn settled_audit_events(&self, count: usize) -> Vec<AuditEvent> {
        self.audit_events(count).await;
        self.audit
            .wait_for_events(count + 1, Duration::from_millis(100))
            .await
    }

    /// Audit events delivered so far, waiting up to one second for `count`
    pub async fn audit_events(&self, count: usize) -> Vec<AuditEvent> {
        self.audit
            .wait_for_events(count, Duration::from_secs(1))
            .await
    }
}

pub mod assertions {
    use super::*;

    /// `{data: null, error: {message}}` with the given message
    pub fn assert_error_envelope(response: &TestResponse, message: &str) {
        let obj = response.body.as_object().expect("object body");
        assert!(obj.contains_key("data"), "envelope must carry a data key");
        assert!(response.body["data"].is_null());
        assert_eq!(response.body["error"]["message"], message);
    }

    /// `{data: <object>, error: null}`
    pub fn assert_data_envelope(response: &TestResponse) -> &Value {
        assert!(response.body["error"].is_null(), "unexpected error: {}", response.body);
        assert!(response.body["data"].is_object());
        &response.body["data"]
    }
}
