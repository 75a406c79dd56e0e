//! Data model for the SAML authentication decision core

pub mod credential;
pub mod identity;
pub mod request;

pub use credential::{Assertion, AuthnStatement, SamlCredential};
pub use identity::AuthenticatedIdentity;
pub use request::{AuthenticationRequest, RequestKind, SamlMessageContext};
