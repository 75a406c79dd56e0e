//! Authentication decision engine
//!
//! Drives a previously tracked authentication response through validation and
//! turns it into an [`AuthenticatedIdentity`], or a typed failure. Every
//! attempt that reaches the validator produces exactly one audit event; there
//! is no fallback path and no partial acceptance.

use crate::audit::{AuditEvent, AuditSink};
use crate::error::{AuthResult, AuthenticationError};
use crate::models::{AuthenticatedIdentity, AuthenticationRequest};
use crate::services::policy::{
    DirectoryEntitlements, EarliestSessionExpiry, EntitlementPolicy, ExpirationPolicy,
    NameIdPrincipal, PrincipalPolicy,
};
use crate::services::{DirectoryRecord, ResponseValidator, UserDirectory};
use std::sync::Arc;
use tracing::instrument;

/// SP-side authentication decision engine.
///
/// Holds no mutable state; one instance serves concurrent authentication
/// attempts without coordination. Collaborators are injected at construction
/// so the dependency graph stays static and testable with fakes.
pub struct SamlAuthenticator {
    validator: Arc<dyn ResponseValidator>,
    audit: Arc<dyn AuditSink>,
    directory: Option<Arc<dyn UserDirectory>>,
    principal_policy: Arc<dyn PrincipalPolicy>,
    entitlement_policy: Arc<dyn EntitlementPolicy>,
    expiration_policy: Arc<dyn ExpirationPolicy>,
}

impl SamlAuthenticator {
    /// Build an engine with default resolution policies and no user directory.
    #[must_use]
    pub fn new(validator: Arc<dyn ResponseValidator>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            validator,
            audit,
            directory: None,
            principal_policy: Arc::new(NameIdPrincipal),
            entitlement_policy: Arc::new(DirectoryEntitlements),
            expiration_policy: Arc::new(EarliestSessionExpiry),
        }
    }

    /// Wire a user directory for identity enrichment.
    #[must_use]
    pub fn with_user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Replace the principal resolution policy.
    #[must_use]
    pub fn with_principal_policy(mut self, policy: Arc<dyn PrincipalPolicy>) -> Self {
        self.principal_policy = policy;
        self
    }

    /// Replace the entitlement resolution policy.
    #[must_use]
    pub fn with_entitlement_policy(mut self, policy: Arc<dyn EntitlementPolicy>) -> Self {
        self.entitlement_policy = policy;
        self
    }

    /// Replace the expiration resolution policy.
    #[must_use]
    pub fn with_expiration_policy(mut self, policy: Arc<dyn ExpirationPolicy>) -> Self {
        self.expiration_policy = policy;
        self
    }

    /// Authenticate one inbound request.
    ///
    /// Accepts only [`AuthenticationRequest::WebSsoResponse`]; any other
    /// variant fails with [`AuthenticationError::UnsupportedRequestType`]
    /// before any collaborator is invoked. On validation failure, one FAILURE
    /// audit event is recorded and the original cause is returned wrapped in
    /// [`AuthenticationError::Service`]. On success, the identity is fully
    /// assembled before the single SUCCESS audit event is recorded.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> AuthResult<AuthenticatedIdentity> {
        let attempted = request.kind();
        let AuthenticationRequest::WebSsoResponse {
            message,
            tracked_request,
        } = request
        else {
            return Err(AuthenticationError::UnsupportedRequestType { attempted });
        };

        let credential = match self.validator.validate(&message, &tracked_request).await {
            Ok(credential) => credential,
            Err(failure) => {
                tracing::debug!(
                    error = %failure,
                    kind = failure.kind(),
                    request_id = %tracked_request.request_id,
                    "authentication response rejected"
                );
                self.audit
                    .record(AuditEvent::failure(&message, &failure))
                    .await;
                return Err(AuthenticationError::Service(failure));
            }
        };

        let record = match &self.directory {
            Some(directory) => directory.lookup(&credential).await,
            None => DirectoryRecord::NoRecord,
        };

        let principal = self.principal_policy.principal(&credential);
        let entitlements = self.entitlement_policy.entitlements(&credential, &record);
        let expires_at = self.expiration_policy.expiration(&credential);
        let details = record.into_details();

        let identity =
            AuthenticatedIdentity::new(principal, credential, entitlements, expires_at, details);

        self.audit
            .record(AuditEvent::success(&message, &identity))
            .await;

        Ok(identity)
    }
}
