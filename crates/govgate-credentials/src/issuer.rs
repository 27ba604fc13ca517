use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use govgate_core::PROOF_PURPOSE_AUTHENTICATION;
use govgate_crypto::{KeyAlgorithm, KeyPair};

use crate::auth::CLAIM_TO_SERVICE;
use crate::document::{VC_CONTEXT_V1, VC_TYPE};
use crate::error::CredentialError;
use crate::suite::{LinkedDataSuite, ProofSuite};

/// Credential type of authentication credentials.
pub const AUTH_CREDENTIAL_TYPE: &str = "AuthenticationCredential";

const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";
const SECP256K1_2019_CONTEXT: &str = "https://w3id.org/security/suites/secp256k1-2019/v1";

/// Parameters of an embedded proof.
#[derive(Debug, Clone)]
pub struct ProofOptions {
    pub purpose: String,
    pub verification_method: String,
    pub created: DateTime<Utc>,
}

impl ProofOptions {
    /// Authentication proof by the key pair's own verification method,
    /// created now.
    pub fn authentication(keypair: &KeyPair) -> Self {
        Self {
            purpose: PROOF_PURPOSE_AUTHENTICATION.to_string(),
            verification_method: keypair.verification_method(),
            created: Utc::now(),
        }
    }
}

/// Attach a proof signed by `keypair` to `document`.
///
/// The suite is chosen from the key algorithm: `Ed25519Signature2020` or
/// `EcdsaSecp256k1Signature2019`. Any existing proof is replaced.
pub fn sign_credential(
    document: Value,
    options: &ProofOptions,
    keypair: &KeyPair,
) -> Result<Value, CredentialError> {
    let Value::Object(mut doc) = document else {
        return Err(CredentialError::Signing(
            "credential must be a JSON object".into(),
        ));
    };
    doc.remove("proof");

    let suite = LinkedDataSuite::for_algorithm(keypair.algorithm());
    let mut proof = Map::new();
    proof.insert("type".into(), json!(suite.proof_type()));
    proof.insert(
        "created".into(),
        json!(options.created.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    proof.insert("verificationMethod".into(), json!(options.verification_method));
    proof.insert("proofPurpose".into(), json!(options.purpose));

    let proof_value = suite.sign(&Value::Object(doc.clone()), &proof, keypair)?;
    proof.insert("proofValue".into(), json!(proof_value));

    doc.insert("proof".into(), Value::Object(proof));
    Ok(Value::Object(doc))
}

/// Settings of a self-issued authentication credential.
#[derive(Debug, Clone, Default)]
pub struct AuthCredentialConfig {
    /// Service DID the credential is meant for (`toService` claim).
    pub to_service: String,
    /// Credential id; `urn:uuid:<v4>` when `None`.
    pub id: Option<String>,
    /// Issuance date; the signing time when `None`.
    pub issuance_date: Option<DateTime<Utc>>,
    /// Optional expiration date.
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Builds and signs the authentication credential a client presents to a
/// service. Issuer and subject are both the signer's DID.
#[derive(Debug, Clone)]
pub struct AuthCredentialBuilder {
    config: AuthCredentialConfig,
}

impl AuthCredentialBuilder {
    pub fn new(config: AuthCredentialConfig) -> Self {
        Self { config }
    }

    /// The unsigned credential for `did`.
    pub fn document(&self, did: &str, algorithm: KeyAlgorithm) -> Result<Value, CredentialError> {
        if self.config.to_service.is_empty() {
            return Err(CredentialError::Signing("target service is required".into()));
        }

        let suite_context = match algorithm {
            KeyAlgorithm::Ed25519 => ED25519_2020_CONTEXT,
            KeyAlgorithm::Secp256k1 => SECP256K1_2019_CONTEXT,
        };
        let id = self
            .config
            .id
            .clone()
            .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));
        let issued = self.config.issuance_date.unwrap_or_else(Utc::now);

        let mut doc = json!({
            "@context": [VC_CONTEXT_V1, suite_context],
            "id": id,
            "type": [VC_TYPE, AUTH_CREDENTIAL_TYPE],
            "issuer": did,
            "issuanceDate": issued.to_rfc3339_opts(SecondsFormat::Secs, true),
            "credentialSubject": {
                "id": did,
                CLAIM_TO_SERVICE: self.config.to_service,
            },
        });
        if let Some(expiration) = self.config.expiration_date {
            doc["expirationDate"] = json!(expiration.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        Ok(doc)
    }

    /// Build and sign the credential with `keypair`.
    pub fn sign(&self, keypair: &KeyPair) -> Result<Value, CredentialError> {
        let doc = self.document(&keypair.did(), keypair.algorithm())?;
        sign_credential(doc, &ProofOptions::authentication(keypair), keypair)
    }

    /// Build and sign, serialized to bytes ready for submission.
    pub fn sign_to_vec(&self, keypair: &KeyPair) -> Result<Vec<u8>, CredentialError> {
        let doc = self.sign(keypair)?;
        serde_json::to_vec(&doc).map_err(|e| CredentialError::Signing(e.to_string()))
    }
}
