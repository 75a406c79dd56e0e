//! SP-side SAML authentication error types

use crate::models::RequestKind;
use thiserror::Error;

/// Result type for authentication decisions
pub type AuthResult<T> = Result<T, AuthenticationError>;

/// Failure reported by the `ResponseValidator` collaborator.
///
/// Every variant is terminal for the authentication attempt: the engine never
/// downgrades a validation failure into a partial or default identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Response is structurally or semantically invalid (includes replay
    /// and duplicate-detection failures surfaced by the request tracker)
    #[error("Invalid SAML response: {0}")]
    Protocol(String),

    /// Signature absent, untrusted, or not verifiable
    #[error("Signature validation failed: {0}")]
    Signature(String),

    /// Encrypted assertion could not be opened
    #[error("Assertion decryption failed: {0}")]
    Decryption(String),
}

impl ValidationFailure {
    /// Short tag used in audit records and log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationFailure::Protocol(_) => "protocol",
            ValidationFailure::Signature(_) => "signature",
            ValidationFailure::Decryption(_) => "decryption",
        }
    }
}

/// Error returned by [`SamlAuthenticator::authenticate`].
///
/// [`SamlAuthenticator::authenticate`]: crate::services::SamlAuthenticator::authenticate
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The request variant is not handled by this engine. This is a wiring or
    /// programming error, not a protocol failure, and is raised before any
    /// collaborator is invoked.
    #[error("Unsupported authentication request: {attempted}, only web-sso-response is supported")]
    UnsupportedRequestType {
        /// Kind of the rejected request
        attempted: RequestKind,
    },

    /// The response validator rejected the inbound message.
    #[error("Error validating SAML message")]
    Service(#[source] ValidationFailure),
}

impl AuthenticationError {
    /// The underlying validation failure, if this error wraps one.
    #[must_use]
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            AuthenticationError::Service(failure) => Some(failure),
            AuthenticationError::UnsupportedRequestType { .. } => None,
        }
    }
}
