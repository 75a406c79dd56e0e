//! Resolution policies for principal, entitlements, and session expiration
//!
//! Each policy ships a default implementation matching standard Web SSO
//! behavior; deployments swap in their own via the authenticator builder.

use crate::models::SamlCredential;
use crate::services::DirectoryRecord;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Derives the canonical identity string from a credential.
pub trait PrincipalPolicy: Send + Sync {
    fn principal(&self, credential: &SamlCredential) -> String;
}

/// Default principal policy: the asserted `NameID` value, verbatim.
///
/// No case or whitespace normalization is applied here; deployments that need
/// it supply their own policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameIdPrincipal;

impl PrincipalPolicy for NameIdPrincipal {
    fn principal(&self, credential: &SamlCredential) -> String {
        credential.name_id().to_string()
    }
}

/// Derives the authority set granted to the authenticated principal.
///
/// Entitlements are additive privilege, not identity proof, so policies never
/// fail: an unusable directory record degrades to an empty set.
pub trait EntitlementPolicy: Send + Sync {
    fn entitlements(&self, credential: &SamlCredential, record: &DirectoryRecord)
        -> HashSet<String>;
}

/// Default entitlement policy: the directory record's authority set when it
/// exposes one, otherwise empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryEntitlements;

impl EntitlementPolicy for DirectoryEntitlements {
    fn entitlements(
        &self,
        _credential: &SamlCredential,
        record: &DirectoryRecord,
    ) -> HashSet<String> {
        match record {
            DirectoryRecord::Enriched { authorities, .. } => authorities.clone(),
            DirectoryRecord::NoRecord | DirectoryRecord::Opaque(_) => HashSet::new(),
        }
    }
}

/// Computes the enforced session expiry from a credential.
pub trait ExpirationPolicy: Send + Sync {
    fn expiration(&self, credential: &SamlCredential) -> Option<DateTime<Utc>>;
}

/// Default expiration policy: the earliest `SessionNotOnOrAfter` across all
/// authentication statements.
///
/// The minimum wins so a single short-lived statement cannot be overridden by
/// a longer-lived one. Statements without an expiry contribute nothing; if no
/// statement carries one, there is no enforced expiry and the session layer
/// applies its own default lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestSessionExpiry;

impl ExpirationPolicy for EarliestSessionExpiry {
    fn expiration(&self, credential: &SamlCredential) -> Option<DateTime<Utc>> {
        credential
            .authentication_assertion()
            .authn_statements
            .iter()
            .filter_map(|statement| statement.session_not_on_or_after)
            .min()
    }
}
