//! Mock Audit Service Implementation
//!
//! Stores events in memory for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{AuditError, AuditEvent, AuditService};

/// Mock audit service that records events for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockAuditService {
    events: Arc<Mutex<Vec<AuditEvent>>>,
    fail: bool,
}

impl MockAuditService {
    /// Create a new mock audit service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose deliveries always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Return all recorded events.
    pub fn recorded_events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Wait until at least `count` events are recorded, up to `timeout`.
    ///
    /// Deliveries run on spawned tasks, so tests poll rather than read immediately.
    pub async fn wait_for_events(&self, count: usize, timeout: Duration) -> Vec<AuditEvent> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let events = self.recorded_events();
            if events.len() >= count || tokio::time::Instant::now() >= deadline {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Clear all recorded events.
    pub fn reset(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait::async_trait]
impl AuditService for MockAuditService {
    async fn send_event(&self, event: AuditEvent) -> Result<(), AuditError> {
        if self.fail {
            return Err(AuditError::Request("mock audit sink unavailable".to_string()));
        }

        tracing::debug!(action = %event.action, "Mock audit: recording event");
        self.events
            .lock()
            .map_err(|e| AuditError::Request(format!("events lock poisoned: {e}")))?
            .push(event);
        Ok(())
    }
}
