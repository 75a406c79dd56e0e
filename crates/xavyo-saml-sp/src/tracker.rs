//! Outstanding-request tracking for replay protection
//!
//! Each outbound `AuthnRequest` is tracked until the matching response comes
//! back. A tracked request is consumed at most once; a response correlating to
//! an already-consumed or expired request must be rejected by the validator.
//! The decision engine never touches the tracker directly — it hands the
//! tracked record to the `ResponseValidator`, which owns the consume step.

use crate::error::ValidationFailure;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default TTL for tracked requests (5 minutes)
pub const DEFAULT_REQUEST_TTL_SECONDS: i64 = 300;

/// Grace period for clock skew (30 seconds)
pub const CLOCK_SKEW_GRACE_SECONDS: i64 = 30;

/// A tracked outbound `AuthnRequest` awaiting its response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedRequest {
    /// Unique identifier for this tracking record
    pub id: Uuid,
    /// The `AuthnRequest` ID this SP sent to the IdP
    pub request_id: String,
    /// Entity ID of the IdP the request was addressed to
    pub idp_entity_id: String,
    /// When this request was issued
    pub created_at: DateTime<Utc>,
    /// When this request expires (created_at + TTL)
    pub expires_at: DateTime<Utc>,
    /// When this request was consumed by a response (None = outstanding)
    pub consumed_at: Option<DateTime<Utc>>,
    /// RelayState to restore after the SSO round trip
    pub relay_state: Option<String>,
}

impl TrackedRequest {
    /// Track a request with the default TTL.
    #[must_use]
    pub fn new(request_id: String, idp_entity_id: String, relay_state: Option<String>) -> Self {
        Self::with_ttl(
            request_id,
            idp_entity_id,
            relay_state,
            DEFAULT_REQUEST_TTL_SECONDS,
        )
    }

    /// Track a request with a custom TTL.
    #[must_use]
    pub fn with_ttl(
        request_id: String,
        idp_entity_id: String,
        relay_state: Option<String>,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request_id,
            idp_entity_id,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            consumed_at: None,
            relay_state,
        }
    }

    /// Whether the request is past its TTL, allowing for clock skew.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at + Duration::seconds(CLOCK_SKEW_GRACE_SECONDS)
    }

    /// Whether a response already consumed this request.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Mark this request as consumed.
    pub fn consume(&mut self) {
        self.consumed_at = Some(Utc::now());
    }

    /// Check that this request may still be consumed.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.is_expired() {
            return Err(TrackerError::Expired {
                request_id: self.request_id.clone(),
                expired_at: self.expires_at,
            });
        }
        if let Some(consumed_at) = self.consumed_at {
            return Err(TrackerError::AlreadyConsumed {
                request_id: self.request_id.clone(),
                consumed_at,
            });
        }
        Ok(())
    }
}

/// Request-tracking errors
#[derive(Debug, Error, Clone)]
pub enum TrackerError {
    /// Request ID not found in the tracker
    #[error("AuthnRequest not found: {0}")]
    NotFound(String),

    /// Request has expired (past TTL + grace period)
    #[error("AuthnRequest expired: {request_id} (expired at {expired_at})")]
    Expired {
        request_id: String,
        expired_at: DateTime<Utc>,
    },

    /// Request was already consumed (replay attack detected)
    #[error("Replay detected: AuthnRequest {request_id} was already consumed at {consumed_at}")]
    AlreadyConsumed {
        request_id: String,
        consumed_at: DateTime<Utc>,
    },

    /// Request ID already tracked
    #[error("Duplicate AuthnRequest ID: {0}")]
    DuplicateRequestId(String),

    /// Storage error
    #[error("Request tracker storage error: {0}")]
    Storage(String),
}

impl From<TrackerError> for ValidationFailure {
    /// Tracker failures classify as protocol failures: the response does not
    /// correlate to exactly one outstanding request.
    fn from(err: TrackerError) -> Self {
        ValidationFailure::Protocol(err.to_string())
    }
}

/// Storage of outstanding requests.
///
/// A given request ID must not be successfully consumed by two concurrent
/// callers; implementations provide that guarantee.
#[async_trait]
pub trait RequestTracker: Send + Sync {
    /// Track a new outbound request.
    async fn store(&self, request: TrackedRequest) -> Result<(), TrackerError>;

    /// Look up an outstanding request by its `AuthnRequest` ID.
    async fn get(&self, request_id: &str) -> Result<Option<TrackedRequest>, TrackerError>;

    /// Validate and consume a request atomically.
    ///
    /// Returns the consumed record on success. At most one caller ever
    /// succeeds per request ID.
    async fn consume(&self, request_id: &str) -> Result<TrackedRequest, TrackerError>;
}

/// In-memory request tracker for tests and single-process deployments.
pub struct InMemoryRequestTracker {
    requests: RwLock<HashMap<String, TrackedRequest>>,
}

impl InMemoryRequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestTracker for InMemoryRequestTracker {
    async fn store(&self, request: TrackedRequest) -> Result<(), TrackerError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.request_id) {
            return Err(TrackerError::DuplicateRequestId(request.request_id));
        }
        requests.insert(request.request_id.clone(), request);
        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<TrackedRequest>, TrackerError> {
        let requests = self.requests.read().await;
        Ok(requests.get(request_id).cloned())
    }

    async fn consume(&self, request_id: &str) -> Result<TrackedRequest, TrackerError> {
        // Single write lock covers validate + consume, so concurrent callers
        // serialize and only the first one wins.
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(request_id)
            .ok_or_else(|| TrackerError::NotFound(request_id.to_string()))?;
        request.validate()?;
        request.consume();
        Ok(request.clone())
    }
}
