//! Retraced publisher client
//!
//! POSTs events to `{base_url}/publisher/v1/project/{project_id}/event`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AuditError, AuditEvent, AuditService};

/// Wire format expected by the Retraced publisher API
#[derive(Debug, Serialize)]
struct RetracedEvent<'a> {
    action: &'a str,
    crud: &'a str,
    group: RetracedGroup<'a>,
    actor: RetracedActor<'a>,
    created: DateTime<Utc>,
    description: String,
}

#[derive(Debug, Serialize)]
struct RetracedGroup<'a> {
    id: String,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct RetracedActor<'a> {
    id: String,
    name: &'a str,
}

impl<'a> From<&'a AuditEvent> for RetracedEvent<'a> {
    fn from(event: &'a AuditEvent) -> Self {
        let actor_name = event
            .user
            .name
            .as_deref()
            .or(event.user.email.as_deref())
            .unwrap_or("unknown");

        Self {
            action: &event.action,
            crud: event.crud.as_str(),
            group: RetracedGroup {
                id: event.team.id.to_string(),
                name: &event.team.name,
            },
            actor: RetracedActor {
                id: event.user.id.to_string(),
                name: actor_name,
            },
            created: event.created,
            description: format!("{} on team {}", event.action, event.team.slug),
        }
    }
}

/// HTTP client for a Retraced deployment.
pub struct RetracedClient {
    http: reqwest::Client,
    event_url: String,
    auth_header: String,
}

impl RetracedClient {
    pub fn new(base_url: &str, api_key: &str, project_id: &str) -> Self {
        let event_url = format!(
            "{}/publisher/v1/project/{}/event",
            base_url.trim_end_matches('/'),
            project_id
        );
        Self {
            http: reqwest::Client::new(),
            event_url,
            auth_header: format!("Token token={}", api_key),
        }
    }
}

#[async_trait::async_trait]
impl AuditService for RetracedClient {
    async fn send_event(&self, event: AuditEvent) -> Result<(), AuditError> {
        let response = self
            .http
            .post(&self.event_url)
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&RetracedEvent::from(&event))
            .send()
            .await
            .map_err(|e| AuditError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(AuditError::Response(format!(
                "Retraced API returned {}: {}",
                status, body
            )));
        }

        tracing::debug!(action = %event.action, "Audit event published to Retraced");
        Ok(())
    }
}
