//! Authenticated identity produced by the decision engine

use crate::models::SamlCredential;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The successful output of an authentication decision.
///
/// Assembled only after validation completes; there is no partially populated
/// state. Owned by the caller once returned and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    principal: String,
    credential: SamlCredential,
    entitlements: HashSet<String>,
    expires_at: Option<DateTime<Utc>>,
    details: Option<serde_json::Value>,
}

impl AuthenticatedIdentity {
    pub(crate) fn new(
        principal: String,
        credential: SamlCredential,
        entitlements: HashSet<String>,
        expires_at: Option<DateTime<Utc>>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            principal,
            credential,
            entitlements,
            expires_at,
            details,
        }
    }

    /// Canonical identity string of the authenticated subject.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// The validated credential this identity was derived from, retained as
    /// the proof artifact for downstream authorization and audit.
    #[must_use]
    pub fn credential(&self) -> &SamlCredential {
        &self.credential
    }

    /// Authority tokens granted to the principal.
    #[must_use]
    pub fn entitlements(&self) -> &HashSet<String> {
        &self.entitlements
    }

    /// Absolute session expiry. `None` means no expiry is enforced by the
    /// assertion; the session layer applies its own default lifetime.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Opaque user record returned by the directory, if one was wired and
    /// produced anything.
    #[must_use]
    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// Whether this identity is expired at the given instant. Identities
    /// without an enforced expiry never report expired here.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}
