//! Inbound authentication request model

use crate::tracker::TrackedRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a not-yet-validated SAML message plus its transport
/// metadata. The decision engine never inspects the payload; only the
/// `ResponseValidator` does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamlMessageContext {
    /// Raw message payload as delivered by the binding (e.g. the decoded
    /// `SAMLResponse` form parameter)
    pub payload: String,
    /// Entity ID of the peer that sent the message, when known from transport
    pub peer_entity_id: Option<String>,
    /// RelayState echoed by the IdP, if any
    pub relay_state: Option<String>,
}

impl SamlMessageContext {
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            peer_entity_id: None,
            relay_state: None,
        }
    }

    #[must_use]
    pub fn with_peer_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.peer_entity_id = Some(entity_id.into());
        self
    }
}

/// Kind tag for [`AuthenticationRequest`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    WebSsoResponse,
    SingleLogout,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::WebSsoResponse => write!(f, "web-sso-response"),
            RequestKind::SingleLogout => write!(f, "single-logout"),
        }
    }
}

/// One inbound unit of authentication work.
///
/// Created per inbound message by the transport layer, consumed exactly once
/// by the decision engine, and discarded after the decision is emitted.
#[derive(Debug, Clone)]
pub enum AuthenticationRequest {
    /// Response to a previously issued `AuthnRequest` (Web SSO profile).
    /// The only variant the authentication engine accepts.
    WebSsoResponse {
        message: SamlMessageContext,
        tracked_request: TrackedRequest,
    },
    /// Inbound `LogoutRequest`/`LogoutResponse`; handled by the SLO layer,
    /// never by the authentication engine.
    SingleLogout { message: SamlMessageContext },
}

impl AuthenticationRequest {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            AuthenticationRequest::WebSsoResponse { .. } => RequestKind::WebSsoResponse,
            AuthenticationRequest::SingleLogout { .. } => RequestKind::SingleLogout,
        }
    }

    /// The message context, regardless of variant.
    #[must_use]
    pub fn message(&self) -> &SamlMessageContext {
        match self {
            AuthenticationRequest::WebSsoResponse { message, .. }
            | AuthenticationRequest::SingleLogout { message } => message,
        }
    }
}
