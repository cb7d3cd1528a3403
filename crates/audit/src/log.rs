//! Tracing-only audit sink for local development

use crate::{AuditError, AuditEvent, AuditService};

/// Writes audit events to the application log instead of an external sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuditService;

#[async_trait::async_trait]
impl AuditService for LogAuditService {
    async fn send_event(&self, event: AuditEvent) -> Result<(), AuditError> {
        tracing::info!(
            action = %event.action,
            crud = %event.crud,
            user_id = %event.user.id,
            team_id = %event.team.id,
            team_slug = %event.team.slug,
            "Audit event"
        );
        Ok(())
    }
}
