//! Fire-and-forget audit delivery
//!
//! `submit` hands the event to a spawned task and returns immediately.
//! Delivery is best-effort: failures are logged and there is no guarantee
//! the event is delivered before the HTTP response is sent.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{AuditEvent, AuditService};

/// Submits audit events to a sink without blocking the caller.
#[derive(Clone)]
pub struct AuditDispatcher {
    service: Arc<dyn AuditService>,
}

impl AuditDispatcher {
    pub fn new(service: Arc<dyn AuditService>) -> Self {
        Self { service }
    }

    /// Spawn delivery of `event`.
    ///
    /// The returned handle may be dropped; it exists so callers that need to
    /// observe completion (tests, shutdown hooks) can await it.
    pub fn submit(&self, event: AuditEvent) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);

        tokio::spawn(async move {
            let action = event.action.clone();
            let team_id = event.team.id;

            if let Err(e) = service.send_event(event).await {
                tracing::warn!(
                    error = %e,
                    action = %action,
                    team_id = %team_id,
                    "Failed to deliver audit event"
                );
            }
        })
    }
}
