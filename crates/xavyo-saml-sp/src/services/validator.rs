//! Response validation collaborator contract
//!
//! Implementations own everything the decision engine deliberately does not:
//! XML parsing and canonicalization, signature verification against the
//! configured trust anchors, assertion decryption, condition checks, and
//! consuming the tracked request for replay protection. The engine only ever
//! sees the outcome: a [`SamlCredential`] or a [`ValidationFailure`].

use crate::error::ValidationFailure;
use crate::models::{SamlCredential, SamlMessageContext};
use crate::tracker::TrackedRequest;
use async_trait::async_trait;

/// Validates an inbound authentication response against its tracked request.
#[async_trait]
pub trait ResponseValidator: Send + Sync {
    /// Validate the message and produce a credential.
    ///
    /// Must consume `tracked_request` through the replay-protection store it
    /// was issued from; a response correlating to a consumed or expired
    /// request fails with [`ValidationFailure::Protocol`].
    async fn validate(
        &self,
        message: &SamlMessageContext,
        tracked_request: &TrackedRequest,
    ) -> Result<SamlCredential, ValidationFailure>;
}
