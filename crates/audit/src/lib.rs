//! Teamdesk audit log
//!
//! Records mutating actions for compliance review:
//! - Retraced publisher API integration for production
//! - Tracing-only sink for local development
//! - Mock sink for test assertions
//! - Fire-and-forget dispatch so delivery never blocks a response

pub mod dispatcher;
pub mod log;
pub mod mock;
pub mod retraced;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use dispatcher::AuditDispatcher;
pub use log::LogAuditService;
pub use mock::MockAuditService;
pub use retraced::RetracedClient;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit configuration error: {0}")]
    Configuration(String),

    #[error("Audit request error: {0}")]
    Request(String),

    #[error("Audit response error: {0}")]
    Response(String),
}

/// CRUD classification of an audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crud {
    #[serde(rename = "c")]
    Create,
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "u")]
    Update,
    #[serde(rename = "d")]
    Delete,
}

impl Crud {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crud::Create => "c",
            Crud::Read => "r",
            Crud::Update => "u",
            Crud::Delete => "d",
        }
    }
}

impl std::fmt::Display for Crud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User who performed the action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditActor {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Team the action was performed on, as it was before the action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTeam {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: String,
    pub crud: Crud,
    pub user: AuditActor,
    pub team: AuditTeam,
    pub created: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, crud: Crud, user: AuditActor, team: AuditTeam) -> Self {
        Self {
            action: action.into(),
            crud,
            user,
            team,
            created: Utc::now(),
        }
    }
}

/// Audit sink configuration.
#[derive(Clone)]
pub struct AuditConfig {
    /// Audit provider (retraced, log, mock)
    pub provider: String,
    /// Base URL of the Retraced deployment
    pub retraced_url: Option<String>,
    /// Publisher API token
    pub retraced_api_key: Option<String>,
    /// Retraced project receiving the events
    pub retraced_project_id: Option<String>,
}

impl std::fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditConfig")
            .field("provider", &self.provider)
            .field("retraced_url", &self.retraced_url)
            .field(
                "retraced_api_key",
                &self.retraced_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("retraced_project_id", &self.retraced_project_id)
            .finish()
    }
}

impl AuditConfig {
    /// Create audit config from environment variables.
    pub fn from_env() -> Result<Self, AuditError> {
        let provider = std::env::var("AUDIT_PROVIDER").unwrap_or_else(|_| "log".to_string());

        let config = Self {
            provider,
            retraced_url: std::env::var("RETRACED_URL").ok(),
            retraced_api_key: std::env::var("RETRACED_API_KEY").ok(),
            retraced_project_id: std::env::var("RETRACED_PROJECT_ID").ok(),
        };

        if config.provider == "retraced" {
            config.require_retraced()?;
        }

        Ok(config)
    }

    /// Return (url, api key, project id), failing if any is missing
    fn require_retraced(&self) -> Result<(&str, &str, &str), AuditError> {
        let missing = |name: &str| {
            AuditError::Configuration(format!("{} is required for Retraced provider", name))
        };

        let url = non_empty(&self.retraced_url).ok_or_else(|| missing("RETRACED_URL"))?;
        let api_key = non_empty(&self.retraced_api_key).ok_or_else(|| missing("RETRACED_API_KEY"))?;
        let project_id =
            non_empty(&self.retraced_project_id).ok_or_else(|| missing("RETRACED_PROJECT_ID"))?;

        Ok((url, api_key, project_id))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Audit sink trait for different implementations.
#[async_trait::async_trait]
pub trait AuditService: Send + Sync {
    /// Deliver a single event to the sink.
    async fn send_event(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// Factory for creating AuditService implementations.
pub struct AuditServiceFactory;

impl AuditServiceFactory {
    /// Create an AuditService based on configuration.
    pub fn create(config: AuditConfig) -> Result<Box<dyn AuditService>, AuditError> {
        match config.provider.as_str() {
            "retraced" => {
                tracing::info!("Creating Retraced audit service");
                let (url, api_key, project_id) = config.require_retraced()?;
                Ok(Box::new(retraced::RetracedClient::new(
                    url, api_key, project_id,
                )))
            }
            "log" => {
                tracing::info!("Creating log audit service");
                Ok(Box::new(log::LogAuditService))
            }
            "mock" => {
                tracing::info!("Creating mock audit service");
                Ok(Box::new(mock::MockAuditService::new()))
            }
            provider => Err(AuditError::Configuration(format!(
                "Unknown audit provider: {}. Supported providers: retraced, log, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_event(action: &str, crud: Crud) -> AuditEvent {
    AuditEvent::new(
        action,
        crud,
        AuditActor {
            id: Uuid::new_v4(),
            name: Some("Owner".to_string()),
            email: Some("owner@acme.test".to_string()),
        },
        AuditTeam {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
        },
    )
}
