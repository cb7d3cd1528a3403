//! Session resolution from request headers
//!
//! Turns an `Authorization: Bearer <jwt>` header into a [`Session`].
//! Resolution is total: anything short of a valid token yields `None`.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, validate_jwt_token};
use crate::session::{Session, SessionUser};

/// Resolves sessions for incoming requests.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for SessionResolver {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.sessions.clone()
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SessionResolver {
    config: AuthConfig,
}

impl SessionResolver {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a raw token and build the session it describes
    pub fn authenticate(&self, token: &str) -> Result<Session, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        Ok(Session::new(SessionUser {
            id: user_id,
            email: claims.email,
            name: claims.name,
        }))
    }

    /// Resolve the session for a request, or `None` when unauthenticated
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let header = headers.get(AUTHORIZATION)?;

        match extract_bearer_token(header).and_then(|token| self.authenticate(&token)) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "Request carries no valid session");
                None
            }
        }
    }
}
