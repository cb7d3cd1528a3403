//! Per-request session model

use serde::Serialize;
use uuid::Uuid;

/// Profile of the user behind a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Authenticated session, created per request and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: SessionUser,
}

impl Session {
    pub fn new(user: SessionUser) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}
