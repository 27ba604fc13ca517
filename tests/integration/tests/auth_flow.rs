//! Integration test: credential → identity → session token.
//!
//! Runs govgate-credentials, govgate-dataverse and govgate-auth together
//! against an in-memory dataverse.

use std::sync::Arc;

use chrono::{Duration, Utc};
use govgate_auth::{AuthError, AuthProxy, ResourceGuard, SessionTokenIssuer};
use govgate_core::TokenConfig;
use govgate_credentials::{
    sign_credential, AuthClaimParser, AuthCredentialBuilder, AuthCredentialConfig,
    CredentialError, ProofOptions,
};
use govgate_crypto::{KeyAlgorithm, KeyPair};
use govgate_integration_tests::{auth_credential, auth_credential_with, Dataverse};

const SERVICE_GOV: &str = "axone1servicegov";
const DATASET: &str = "did:key:z6MkDataset";
const DATASET_GOV: &str = "axone1datasetgov";

struct Setup {
    service: String,
    user: KeyPair,
    dataverse: Dataverse,
}

fn setup(user_algorithm: KeyAlgorithm, actions: &[&str]) -> Setup {
    let service = KeyPair::generate(KeyAlgorithm::Ed25519).did();
    let user = KeyPair::generate(user_algorithm);
    let dataverse = Dataverse::new();
    dataverse
        .govern(&service, SERVICE_GOV)
        .grant(SERVICE_GOV, &user.did(), actions)
        .govern(DATASET, DATASET_GOV)
        .grant(DATASET_GOV, &user.did(), &["read"]);
    Setup {
        service,
        user,
        dataverse,
    }
}

async fn proxy(setup: &Setup) -> AuthProxy {
    AuthProxy::new(
        setup.service.clone(),
        Arc::new(AuthClaimParser::default()),
        setup.dataverse.governance(),
    )
    .await
    .expect("service governance resolves")
}

fn tokens() -> SessionTokenIssuer {
    SessionTokenIssuer::new(&TokenConfig {
        secret: Some("integration-secret".into()),
        ttl_secs: 300,
        ..Default::default()
    })
    .unwrap()
}

// =========================================================================
// Successful flows
// =========================================================================

#[tokio::test]
async fn test_full_flow_secp256k1() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read", "store"]);
    let proxy = proxy(&s).await;
    assert_eq!(proxy.governance_address(), SERVICE_GOV);

    let identity = proxy
        .authenticate(&auth_credential(&s.user, &s.service))
        .await
        .expect("authentication should succeed");
    assert_eq!(identity.subject(), s.user.did());
    assert!(identity.can("read"));
    assert!(identity.can("store"));

    // Token carries the identity across requests
    let tokens = tokens();
    let token = tokens.issue(&identity).unwrap();
    let header = format!("Bearer {}", token);
    let restored = tokens.verify_header(Some(&header)).unwrap();
    assert_eq!(restored, identity);

    // The restored identity is authorized on a governed resource
    let guard = ResourceGuard::new(s.dataverse.governance());
    guard.authorize(&restored, DATASET, "read").await.unwrap();
}

#[tokio::test]
async fn test_full_flow_ed25519() {
    let s = setup(KeyAlgorithm::Ed25519, &["read"]);
    let identity = proxy(&s)
        .await
        .authenticate(&auth_credential(&s.user, &s.service))
        .await
        .unwrap();
    assert_eq!(
        identity.authorized_actions().iter().collect::<Vec<_>>(),
        vec!["read"]
    );
}

#[tokio::test]
async fn test_unknown_user_gets_no_actions() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let stranger = KeyPair::generate(KeyAlgorithm::Secp256k1);
    let identity = proxy(&s)
        .await
        .authenticate(&auth_credential(&stranger, &s.service))
        .await
        .unwrap();
    assert_eq!(identity.subject(), stranger.did());
    assert!(identity.authorized_actions().is_empty());

    let guard = ResourceGuard::new(s.dataverse.governance());
    assert!(matches!(
        guard.authorize(&identity, DATASET, "read").await,
        Err(AuthError::Unauthorized { .. })
    ));
}

// =========================================================================
// Rejections
// =========================================================================

#[tokio::test]
async fn test_credential_for_other_service() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let other = KeyPair::generate(KeyAlgorithm::Ed25519).did();
    let err = proxy(&s)
        .await
        .authenticate(&auth_credential(&s.user, &other))
        .await
        .unwrap_err();
    match err {
        AuthError::ServiceMismatch { service, target } => {
            assert_eq!(service, s.service);
            assert_eq!(target, other);
        }
        other => panic!("expected ServiceMismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_credential_about_someone_else() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let victim = KeyPair::generate(KeyAlgorithm::Secp256k1);

    let mut doc = AuthCredentialBuilder::new(AuthCredentialConfig {
        to_service: s.service.clone(),
        ..Default::default()
    })
    .document(&s.user.did(), s.user.algorithm())
    .unwrap();
    doc["credentialSubject"]["id"] = serde_json::json!(victim.did());
    let signed = sign_credential(doc, &ProofOptions::authentication(&s.user), &s.user).unwrap();

    let err = proxy(&s)
        .await
        .authenticate(&serde_json::to_vec(&signed).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Credential(CredentialError::SubjectMismatch { .. })
    ));
}

#[tokio::test]
async fn test_tampered_credential() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let mut doc: serde_json::Value =
        serde_json::from_slice(&auth_credential(&s.user, &s.service)).unwrap();
    doc["credentialSubject"]["toService"] = serde_json::json!("did:key:z6MkElsewhere");

    let err = proxy(&s)
        .await
        .authenticate(&serde_json::to_vec(&doc).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Credential(CredentialError::InvalidProof(_))
    ));
}

#[tokio::test]
async fn test_wrong_proof_purpose() {
    let s = setup(KeyAlgorithm::Ed25519, &["read"]);
    let doc = AuthCredentialBuilder::new(AuthCredentialConfig {
        to_service: s.service.clone(),
        ..Default::default()
    })
    .document(&s.user.did(), s.user.algorithm())
    .unwrap();
    let options = ProofOptions {
        purpose: "assertionMethod".into(),
        ..ProofOptions::authentication(&s.user)
    };
    let signed = sign_credential(doc, &options, &s.user).unwrap();

    let err = proxy(&s)
        .await
        .authenticate(&serde_json::to_vec(&signed).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Credential(CredentialError::WrongProofPurpose(_))
    ));
}

#[tokio::test]
async fn test_expired_and_future_credentials() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let proxy = proxy(&s).await;
    let now = Utc::now();

    let expired = auth_credential_with(
        &s.user,
        AuthCredentialConfig {
            to_service: s.service.clone(),
            issuance_date: Some(now - Duration::hours(2)),
            expiration_date: Some(now - Duration::hours(1)),
            ..Default::default()
        },
    );
    assert!(matches!(
        proxy.authenticate(&expired).await,
        Err(AuthError::Credential(CredentialError::Expired(_)))
    ));

    let future = auth_credential_with(
        &s.user,
        AuthCredentialConfig {
            to_service: s.service.clone(),
            issuance_date: Some(now + Duration::hours(1)),
            ..Default::default()
        },
    );
    assert!(matches!(
        proxy.authenticate(&future).await,
        Err(AuthError::Credential(CredentialError::IssuedInFuture(_)))
    ));
}

#[tokio::test]
async fn test_service_without_governance_cannot_start() {
    let dataverse = Dataverse::new();
    let result = AuthProxy::new(
        KeyPair::generate(KeyAlgorithm::Ed25519).did(),
        Arc::new(AuthClaimParser::default()),
        dataverse.governance(),
    )
    .await;
    assert!(matches!(result, Err(AuthError::Governance(_))));
}

// =========================================================================
// Session tokens
// =========================================================================

#[tokio::test]
async fn test_token_expiry_and_tamper() {
    let s = setup(KeyAlgorithm::Secp256k1, &["read"]);
    let identity = proxy(&s)
        .await
        .authenticate(&auth_credential(&s.user, &s.service))
        .await
        .unwrap();
    let tokens = tokens();

    let stale = tokens
        .issue_at(&identity, Utc::now() - Duration::hours(1))
        .unwrap();
    assert!(matches!(tokens.verify(&stale), Err(AuthError::TokenExpired)));

    let token = tokens.issue(&identity).unwrap();
    let mut forged = token.clone();
    forged.push('x');
    assert!(matches!(tokens.verify(&forged), Err(AuthError::InvalidToken(_))));

    assert!(matches!(
        tokens.verify_header(None),
        Err(AuthError::MissingBearerToken)
    ));
}
