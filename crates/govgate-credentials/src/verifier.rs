use chrono::{DateTime, Utc};

use crate::document::{Credential, Proof};
use crate::error::CredentialError;
use crate::resolver::KeyResolver;
use crate::suite::{default_suites, ProofSuite};

/// A credential whose single proof has been verified.
#[derive(Debug, Clone)]
pub struct VerifiedCredential {
    pub credential: Credential,
    pub proof: Proof,
}

/// Parses raw credentials and verifies their embedded proof.
///
/// Holds no per-call state; every call runs the whole chain.
pub struct CredentialVerifier {
    resolver: KeyResolver,
    suites: Vec<Box<dyn ProofSuite>>,
}

impl CredentialVerifier {
    /// Create a verifier with the default signature suites.
    pub fn new(resolver: KeyResolver) -> Self {
        Self::with_suites(resolver, default_suites())
    }

    /// Create a verifier accepting only the given suites.
    pub fn with_suites(resolver: KeyResolver, suites: Vec<Box<dyn ProofSuite>>) -> Self {
        Self { resolver, suites }
    }

    /// Parse and verify against the current time.
    pub fn parse_and_verify(&self, raw: &[u8]) -> Result<VerifiedCredential, CredentialError> {
        self.parse_and_verify_at(raw, Utc::now())
    }

    /// Parse and verify, evaluating validity dates against `now`.
    pub fn parse_and_verify_at(
        &self,
        raw: &[u8],
        now: DateTime<Utc>,
    ) -> Result<VerifiedCredential, CredentialError> {
        let credential = Credential::parse(raw)?;

        let raw_proof = match credential.raw_proofs() {
            [] => return Err(CredentialError::MissingProof),
            [single] => single,
            many => {
                return Err(CredentialError::InvalidProof(format!(
                    "expected a single proof, got {}",
                    many.len()
                )))
            }
        };
        let proof = Proof::from_value(raw_proof)?;
        self.verify_proof(&credential, &proof, raw_proof)?;

        if let Some(expiration) = credential.expiration_date {
            if now > expiration {
                return Err(CredentialError::Expired(expiration));
            }
        }
        if now < credential.issuance_date {
            return Err(CredentialError::IssuedInFuture(credential.issuance_date));
        }

        Ok(VerifiedCredential { credential, proof })
    }

    fn verify_proof(
        &self,
        credential: &Credential,
        proof: &Proof,
        raw_proof: &serde_json::Value,
    ) -> Result<(), CredentialError> {
        if proof.controller() != credential.issuer {
            return Err(CredentialError::InvalidProof(format!(
                "verification method {} is not controlled by issuer {}",
                proof.verification_method, credential.issuer
            )));
        }

        let suite = self
            .suites
            .iter()
            .find(|s| s.proof_type() == proof.proof_type)
            .ok_or_else(|| {
                CredentialError::InvalidProof(format!(
                    "unsupported proof type: {}",
                    proof.proof_type
                ))
            })?;

        let key = self
            .resolver
            .resolve(&credential.issuer, &proof.verification_method)?;

        let options = raw_proof
            .as_object()
            .ok_or_else(|| CredentialError::InvalidProof("proof must be an object".into()))?;
        suite.verify(&credential.unsigned_document(), options, &key)?;

        tracing::debug!(
            issuer = %credential.issuer,
            proof_type = %proof.proof_type,
            "credential proof verified"
        );
        Ok(())
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(KeyResolver::did_key())
    }
}
