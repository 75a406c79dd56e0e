//! Security audit events for authentication decisions
//!
//! The engine records exactly one event per authentication attempt that
//! reaches the validator: SUCCESS with the resolved principal, or FAILURE
//! with the validation failure kind. Sinks are fire-and-forget; they must
//! never propagate errors back into the decision path.

use crate::error::ValidationFailure;
use crate::models::{AuthenticatedIdentity, SamlMessageContext};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Type of audited protocol exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Processing of an inbound authentication response
    AuthnResponse,
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEventType::AuthnResponse => write!(f, "authn_response"),
        }
    }
}

/// Outcome of the audited exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub event_type: AuditEventType,
    pub outcome: AuditOutcome,
    /// Peer entity the message claimed to come from, when transport knew it
    pub peer_entity_id: Option<String>,
    /// Resolved principal; present on success only
    pub principal: Option<String>,
    /// Failure kind tag; present on failure only
    pub failure: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Successful authentication of `identity`.
    #[must_use]
    pub fn success(message: &SamlMessageContext, identity: &AuthenticatedIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: AuditEventType::AuthnResponse,
            outcome: AuditOutcome::Success,
            peer_entity_id: message.peer_entity_id.clone(),
            principal: Some(identity.principal().to_string()),
            failure: None,
            timestamp: Utc::now(),
        }
    }

    /// Rejected authentication attempt.
    #[must_use]
    pub fn failure(message: &SamlMessageContext, cause: &ValidationFailure) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: AuditEventType::AuthnResponse,
            outcome: AuditOutcome::Failure,
            peer_entity_id: message.peer_entity_id.clone(),
            principal: None,
            failure: Some(cause.kind().to_string()),
            timestamp: Utc::now(),
        }
    }
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event. Infallible from the caller's perspective; sinks
    /// swallow and log their own delivery problems.
    async fn record(&self, event: AuditEvent);
}

/// Default sink: emits audit events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) {
        match event.outcome {
            AuditOutcome::Success => tracing::info!(
                event_id = %event.id,
                event_type = %event.event_type,
                outcome = %event.outcome,
                peer = event.peer_entity_id.as_deref().unwrap_or("-"),
                principal = event.principal.as_deref().unwrap_or("-"),
                "authentication succeeded"
            ),
            AuditOutcome::Failure => tracing::warn!(
                event_id = %event.id,
                event_type = %event.event_type,
                outcome = %event.outcome,
                peer = event.peer_entity_id.as_deref().unwrap_or("-"),
                failure = event.failure.as_deref().unwrap_or("-"),
                "authentication failed"
            ),
        }
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct InMemoryAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, in recording order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, event: AuditEvent) {
        self.events.write().await.push(event);
    }
}
