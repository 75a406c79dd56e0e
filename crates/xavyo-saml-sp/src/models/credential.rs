//! Validated SAML credential model
//!
//! A [`SamlCredential`] is the internal representation of a successfully
//! validated assertion. It exists only downstream of a `ResponseValidator`:
//! signature, decryption, and protocol checks have already passed by the time
//! one is constructed. Nothing in this crate builds a credential from an
//! unvalidated message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single `AuthnStatement` within the validated assertion.
///
/// One assertion may carry several statements, e.g. when the identity
/// provider references multiple authenticating sessions or devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// Instant on or after which the IdP session backing this statement is no
    /// longer valid. Absent means the statement imposes no expiry.
    pub session_not_on_or_after: Option<DateTime<Utc>>,
    /// IdP session index, used to correlate Single Logout
    pub session_index: Option<String>,
}

impl AuthnStatement {
    /// Statement with an expiry and no session index.
    #[must_use]
    pub fn expiring_at(instant: DateTime<Utc>) -> Self {
        Self {
            session_not_on_or_after: Some(instant),
            session_index: None,
        }
    }

    /// Statement that imposes no expiry.
    #[must_use]
    pub fn without_expiry() -> Self {
        Self {
            session_not_on_or_after: None,
            session_index: None,
        }
    }
}

/// The validated authentication assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Authentication statements, in document order. May be empty.
    pub authn_statements: Vec<AuthnStatement>,
}

impl Assertion {
    #[must_use]
    pub fn new(authn_statements: Vec<AuthnStatement>) -> Self {
        Self { authn_statements }
    }
}

/// Credential produced by a successful response validation.
///
/// Immutable after construction. Only `ResponseValidator` implementations
/// should construct values of this type; everything else in the crate treats
/// the credential as proof that validation already happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlCredential {
    name_id: String,
    authentication_assertion: Assertion,
}

impl SamlCredential {
    /// Build a credential from validated response parts.
    #[must_use]
    pub fn new(name_id: impl Into<String>, authentication_assertion: Assertion) -> Self {
        Self {
            name_id: name_id.into(),
            authentication_assertion,
        }
    }

    /// Identity asserted by the issuer, exactly as received.
    #[must_use]
    pub fn name_id(&self) -> &str {
        &self.name_id
    }

    /// The assertion this credential was built from.
    #[must_use]
    pub fn authentication_assertion(&self) -> &Assertion {
        &self.authentication_assertion
    }
}
