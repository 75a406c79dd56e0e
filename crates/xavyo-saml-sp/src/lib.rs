//! SP-side SAML 2.0 authentication decision core
//!
//! This crate turns a validated Web SSO authentication response into an
//! internal, time-bounded authenticated identity:
//! - `SamlAuthenticator` drives validation, enrichment, and audit emission
//! - `SamlCredential` is the immutable proof of a validated assertion
//! - Resolution policies (principal, entitlements, expiration) ship with
//!   defaults and are replaceable per deployment
//! - Replay protection via `AuthnRequest` tracking
//!
//! Protocol parsing, signature cryptography, and decryption live behind the
//! `ResponseValidator` collaborator; transport and session establishment are
//! the caller's concern.

pub mod audit;
pub mod error;
pub mod models;
pub mod services;
pub mod tracker;

pub use audit::{AuditEvent, AuditEventType, AuditOutcome, AuditSink, InMemoryAuditSink,
    TracingAuditSink};
pub use error::{AuthResult, AuthenticationError, ValidationFailure};
pub use models::{
    Assertion, AuthenticatedIdentity, AuthenticationRequest, AuthnStatement, RequestKind,
    SamlCredential, SamlMessageContext,
};
pub use services::{
    DirectoryEntitlements, DirectoryRecord, EarliestSessionExpiry, EntitlementPolicy,
    ExpirationPolicy, NameIdPrincipal, PrincipalPolicy, ResponseValidator, SamlAuthenticator,
    UserDirectory,
};
pub use tracker::{InMemoryRequestTracker, RequestTracker, TrackedRequest, TrackerError};
