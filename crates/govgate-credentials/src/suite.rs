//! Linked-data proof suites.
//!
//! Signing input for every suite is
//! `SHA-256(canonical(proof options)) || SHA-256(canonical(document))`,
//! where the proof options are the proof object without `proofValue` and
//! the document is the credential without `proof`.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use govgate_crypto::{KeyAlgorithm, KeyPair, PublicKey};

use crate::error::CredentialError;

pub const ED25519_SIGNATURE_2018: &str = "Ed25519Signature2018";
pub const ED25519_SIGNATURE_2020: &str = "Ed25519Signature2020";
pub const ECDSA_SECP256K1_SIGNATURE_2019: &str = "EcdsaSecp256k1Signature2019";

/// A signature suite able to sign and verify embedded proofs.
pub trait ProofSuite: Send + Sync {
    /// Value of the proof's `type` member.
    fn proof_type(&self) -> &'static str;

    /// Verify `proof` over `document` with `key`.
    fn verify(
        &self,
        document: &Value,
        proof: &Map<String, Value>,
        key: &PublicKey,
    ) -> Result<(), CredentialError>;

    /// Produce the `proofValue` for `proof_options` over `document`.
    fn sign(
        &self,
        document: &Value,
        proof_options: &Map<String, Value>,
        keypair: &KeyPair,
    ) -> Result<String, CredentialError>;
}

/// Suite backed by one key algorithm and the canonical JSON signing input.
#[derive(Debug, Clone, Copy)]
pub struct LinkedDataSuite {
    proof_type: &'static str,
    algorithm: KeyAlgorithm,
}

impl LinkedDataSuite {
    pub fn ed25519_signature_2018() -> Self {
        Self {
            proof_type: ED25519_SIGNATURE_2018,
            algorithm: KeyAlgorithm::Ed25519,
        }
    }

    pub fn ed25519_signature_2020() -> Self {
        Self {
            proof_type: ED25519_SIGNATURE_2020,
            algorithm: KeyAlgorithm::Ed25519,
        }
    }

    pub fn ecdsa_secp256k1_signature_2019() -> Self {
        Self {
            proof_type: ECDSA_SECP256K1_SIGNATURE_2019,
            algorithm: KeyAlgorithm::Secp256k1,
        }
    }

    /// The preferred suite for signing with keys of `algorithm`.
    pub fn for_algorithm(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::Ed25519 => Self::ed25519_signature_2020(),
            KeyAlgorithm::Secp256k1 => Self::ecdsa_secp256k1_signature_2019(),
        }
    }

    fn check_algorithm(&self, algorithm: KeyAlgorithm) -> Result<(), CredentialError> {
        if algorithm != self.algorithm {
            return Err(CredentialError::InvalidProof(format!(
                "{} requires a {} key, got {}",
                self.proof_type, self.algorithm, algorithm
            )));
        }
        Ok(())
    }
}

impl ProofSuite for LinkedDataSuite {
    fn proof_type(&self) -> &'static str {
        self.proof_type
    }

    fn verify(
        &self,
        document: &Value,
        proof: &Map<String, Value>,
        key: &PublicKey,
    ) -> Result<(), CredentialError> {
        self.check_algorithm(key.algorithm())?;
        let signature = proof
            .get("proofValue")
            .and_then(Value::as_str)
            .and_then(|v| v.strip_prefix('z'))
            .ok_or_else(|| CredentialError::InvalidProof("missing proofValue".into()))
            .and_then(|v| {
                bs58::decode(v)
                    .into_vec()
                    .map_err(|e| CredentialError::InvalidProof(format!("invalid proofValue: {}", e)))
            })?;

        let input = signing_input(document, proof)
            .map_err(|e| CredentialError::InvalidProof(format!("cannot canonicalize: {}", e)))?;
        key.verify(&input, &signature)
            .map_err(|e| CredentialError::InvalidProof(e.to_string()))
    }

    fn sign(
        &self,
        document: &Value,
        proof_options: &Map<String, Value>,
        keypair: &KeyPair,
    ) -> Result<String, CredentialError> {
        self.check_algorithm(keypair.algorithm())
            .map_err(|e| CredentialError::Signing(e.to_string()))?;
        let input = signing_input(document, proof_options)
            .map_err(|e| CredentialError::Signing(format!("cannot canonicalize: {}", e)))?;
        let signature = keypair.sign(&input);
        Ok(format!("z{}", bs58::encode(signature).into_string()))
    }
}

/// The suites accepted by default.
pub fn default_suites() -> Vec<Box<dyn ProofSuite>> {
    vec![
        Box::new(LinkedDataSuite::ed25519_signature_2018()),
        Box::new(LinkedDataSuite::ed25519_signature_2020()),
        Box::new(LinkedDataSuite::ecdsa_secp256k1_signature_2019()),
    ]
}

/// Bytes to sign for a document and its proof options.
pub fn signing_input(
    document: &Value,
    proof_options: &Map<String, Value>,
) -> serde_json::Result<Vec<u8>> {
    let mut options = proof_options.clone();
    options.remove("proofValue");
    options.remove("jws");

    let mut document = document.clone();
    if let Value::Object(map) = &mut document {
        map.remove("proof");
    }

    let mut input = Vec::with_capacity(64);
    input.extend_from_slice(&Sha256::digest(canonicalize(&Value::Object(options))?.as_bytes()));
    input.extend_from_slice(&Sha256::digest(canonicalize(&document)?.as_bytes()));
    Ok(input)
}

/// RFC 8785 (JCS) serialization: sorted keys, compact separators,
/// ECMAScript number formatting.
pub fn canonicalize(value: &Value) -> serde_json::Result<String> {
    serde_jcs::to_string(value)
}
