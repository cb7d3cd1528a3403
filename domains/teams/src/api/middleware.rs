//! Teams domain state and session resolver integration

use crate::repository::TeamStore;
use axum::extract::FromRef;
use std::sync::Arc;
use teamdesk_audit::AuditDispatcher;
use teamdesk_auth::SessionResolver;

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub store: Arc<dyn TeamStore>,
    pub sessions: SessionResolver,
    pub audit: AuditDispatcher,
}

impl FromRef<TeamsState> for SessionResolver {
    fn from_ref(state: &TeamsState) -> Self {
        state.sessions.clone()
    }
}
