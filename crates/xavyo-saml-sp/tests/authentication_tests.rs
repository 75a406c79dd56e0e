//! End-to-end authentication decision tests
//!
//! Exercises the engine against fake collaborators: fixed-outcome validators,
//! an in-memory audit sink, and a tracker-backed validator for replay cases.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use xavyo_saml_sp::{
    Assertion, AuditOutcome, AuthenticatedIdentity, AuthenticationError, AuthenticationRequest,
    AuthnStatement, DirectoryRecord, InMemoryAuditSink, InMemoryRequestTracker, PrincipalPolicy,
    RequestTracker, ResponseValidator, SamlAuthenticator, SamlCredential, SamlMessageContext,
    TrackedRequest, UserDirectory, ValidationFailure,
};

/// Validator returning a fixed outcome, ignoring the message.
struct FixedValidator(Result<SamlCredential, ValidationFailure>);

#[async_trait]
impl ResponseValidator for FixedValidator {
    async fn validate(
        &self,
        _message: &SamlMessageContext,
        _tracked_request: &TrackedRequest,
    ) -> Result<SamlCredential, ValidationFailure> {
        self.0.clone()
    }
}

/// Validator that consumes the tracked request before accepting, the way a
/// real profile consumer enforces replay protection.
struct TrackerBackedValidator {
    tracker: Arc<InMemoryRequestTracker>,
    credential: SamlCredential,
}

#[async_trait]
impl ResponseValidator for TrackerBackedValidator {
    async fn validate(
        &self,
        _message: &SamlMessageContext,
        tracked_request: &TrackedRequest,
    ) -> Result<SamlCredential, ValidationFailure> {
        self.tracker
            .consume(&tracked_request.request_id)
            .await
            .map_err(ValidationFailure::from)?;
        Ok(self.credential.clone())
    }
}

/// Directory returning a fixed record.
struct FixedDirectory(DirectoryRecord);

#[async_trait]
impl UserDirectory for FixedDirectory {
    async fn lookup(&self, _credential: &SamlCredential) -> DirectoryRecord {
        self.0.clone()
    }
}

fn june_1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn bob_credential() -> SamlCredential {
    SamlCredential::new(
        "bob",
        Assertion::new(vec![AuthnStatement::expiring_at(june_1())]),
    )
}

fn web_sso_request(request_id: &str) -> AuthenticationRequest {
    AuthenticationRequest::WebSsoResponse {
        message: SamlMessageContext::new("<samlp:Response/>")
            .with_peer_entity_id("https://idp.example.com"),
        tracked_request: TrackedRequest::new(
            request_id.to_string(),
            "https://idp.example.com".to_string(),
            None,
        ),
    }
}

#[tokio::test]
async fn successful_authentication_assembles_full_identity() {
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(bob_credential()))),
        audit.clone(),
    )
    .with_user_directory(Arc::new(FixedDirectory(DirectoryRecord::Enriched {
        authorities: HashSet::from(["ROLE_USER".to_string()]),
        details: json!({"user_id": 42}),
    })));

    let identity = engine.authenticate(web_sso_request("req-1")).await.unwrap();

    assert_eq!(identity.principal(), "bob");
    assert_eq!(
        identity.entitlements(),
        &HashSet::from(["ROLE_USER".to_string()])
    );
    assert_eq!(identity.expires_at(), Some(june_1()));
    assert_eq!(identity.details(), Some(&json!({"user_id": 42})));
    assert_eq!(identity.credential().name_id(), "bob");

    let events = audit.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, AuditOutcome::Success);
    assert_eq!(events[0].principal.as_deref(), Some("bob"));
    assert_eq!(
        events[0].peer_entity_id.as_deref(),
        Some("https://idp.example.com")
    );
}

#[tokio::test]
async fn principal_is_name_id_verbatim() {
    let credential = SamlCredential::new("alice@example.com", Assertion::new(vec![]));
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(credential))),
        Arc::new(InMemoryAuditSink::new()),
    );

    let identity = engine.authenticate(web_sso_request("req-1")).await.unwrap();
    assert_eq!(identity.principal(), "alice@example.com");
}

#[tokio::test]
async fn missing_directory_means_no_details_and_no_entitlements() {
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(bob_credential()))),
        Arc::new(InMemoryAuditSink::new()),
    );

    let identity = engine.authenticate(web_sso_request("req-1")).await.unwrap();
    assert!(identity.details().is_none());
    assert!(identity.entitlements().is_empty());
}

#[tokio::test]
async fn opaque_directory_record_degrades_to_empty_entitlements() {
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(bob_credential()))),
        Arc::new(InMemoryAuditSink::new()),
    )
    .with_user_directory(Arc::new(FixedDirectory(DirectoryRecord::Opaque(json!({
        "dn": "cn=bob,ou=people"
    })))));

    let identity = engine.authenticate(web_sso_request("req-1")).await.unwrap();
    // Authentication still succeeds; the record rides along as details only
    assert!(identity.entitlements().is_empty());
    assert_eq!(identity.details(), Some(&json!({"dn": "cn=bob,ou=people"})));
}

#[tokio::test]
async fn each_failure_kind_is_audited_and_wrapped() {
    let failures = [
        ValidationFailure::Protocol("status was not success".into()),
        ValidationFailure::Signature("untrusted signing key".into()),
        ValidationFailure::Decryption("no matching decryption key".into()),
    ];

    for failure in failures {
        let audit = Arc::new(InMemoryAuditSink::new());
        let engine = SamlAuthenticator::new(
            Arc::new(FixedValidator(Err(failure.clone()))),
            audit.clone(),
        );

        let err = engine
            .authenticate(web_sso_request("req-1"))
            .await
            .unwrap_err();

        assert_eq!(err.validation_failure(), Some(&failure));

        let events = audit.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, AuditOutcome::Failure);
        assert_eq!(events[0].failure.as_deref(), Some(failure.kind()));
        assert!(events[0].principal.is_none());
    }
}

#[tokio::test]
async fn signature_failure_never_yields_an_identity() {
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Err(ValidationFailure::Signature(
            "digest mismatch".into(),
        )))),
        Arc::new(InMemoryAuditSink::new()),
    );

    let result = engine.authenticate(web_sso_request("req-1")).await;
    match result {
        Err(AuthenticationError::Service(ValidationFailure::Signature(_))) => {}
        other => panic!("expected wrapped signature failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_request_fails_without_collaborators() {
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(bob_credential()))),
        audit.clone(),
    );

    let err = engine
        .authenticate(AuthenticationRequest::SingleLogout {
            message: SamlMessageContext::new("<samlp:LogoutRequest/>"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthenticationError::UnsupportedRequestType { .. }
    ));
    assert!(audit.events().await.is_empty());
}

#[tokio::test]
async fn replayed_response_is_rejected_as_protocol_failure() {
    let tracker = Arc::new(InMemoryRequestTracker::new());
    tracker
        .store(TrackedRequest::new(
            "req-replay".to_string(),
            "https://idp.example.com".to_string(),
            None,
        ))
        .await
        .unwrap();

    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = Arc::new(
        SamlAuthenticator::new(
            Arc::new(TrackerBackedValidator {
                tracker: tracker.clone(),
                credential: bob_credential(),
            }),
            audit.clone(),
        ),
    );

    // First delivery consumes the tracked request
    let first = engine.authenticate(web_sso_request("req-replay")).await;
    assert!(first.is_ok());

    // Replay of the same correlation id must be rejected
    let second = engine
        .authenticate(web_sso_request("req-replay"))
        .await
        .unwrap_err();
    assert!(matches!(
        second.validation_failure(),
        Some(ValidationFailure::Protocol(_))
    ));

    // One audit event per attempt: success then failure
    let events = audit.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].outcome, AuditOutcome::Success);
    assert_eq!(events[1].outcome, AuditOutcome::Failure);
}

#[tokio::test]
async fn concurrent_independent_requests_yield_independent_identities() {
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = Arc::new(SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(bob_credential()))),
        audit.clone(),
    ));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.authenticate(web_sso_request(&format!("req-{i}"))).await })
        })
        .collect();

    let mut identities: Vec<AuthenticatedIdentity> = Vec::new();
    for task in tasks {
        identities.push(task.await.unwrap().unwrap());
    }

    assert_eq!(identities.len(), 8);
    for identity in &identities {
        assert_eq!(identity.principal(), "bob");
        assert_eq!(identity.expires_at(), Some(june_1()));
    }
    assert_eq!(audit.events().await.len(), 8);
}

#[tokio::test]
async fn custom_principal_policy_replaces_default() {
    struct LowercasePrincipal;

    impl PrincipalPolicy for LowercasePrincipal {
        fn principal(&self, credential: &SamlCredential) -> String {
            credential.name_id().to_lowercase()
        }
    }

    let credential = SamlCredential::new("Bob@Example.COM", Assertion::new(vec![]));
    let engine = SamlAuthenticator::new(
        Arc::new(FixedValidator(Ok(credential))),
        Arc::new(InMemoryAuditSink::new()),
    )
    .with_principal_policy(Arc::new(LowercasePrincipal));

    let identity = engine.authenticate(web_sso_request("req-1")).await.unwrap();
    assert_eq!(identity.principal(), "bob@example.com");
}
