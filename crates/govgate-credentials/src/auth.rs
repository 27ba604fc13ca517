use chrono::{DateTime, Utc};

use govgate_core::PROOF_PURPOSE_AUTHENTICATION;

use crate::error::CredentialError;
use crate::verifier::{CredentialVerifier, VerifiedCredential};

/// Custom subject field naming the service a credential targets.
pub const CLAIM_TO_SERVICE: &str = "toService";

/// Extracts a typed claim from a signed credential.
pub trait ClaimParser: Send + Sync {
    type Claim;

    /// Verify `raw` and extract its claim.
    fn parse_signed(&self, raw: &[u8]) -> Result<Self::Claim, CredentialError>;
}

/// Claim of a self-issued authentication credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaim {
    /// DID of the authenticating identity.
    pub subject_id: String,
    /// DID of the service the credential is meant for.
    pub target_service: String,
}

impl AuthClaim {
    /// Extract and check the claim of a verified credential.
    pub fn from_verified(verified: &VerifiedCredential) -> Result<Self, CredentialError> {
        let subject = match verified.credential.subjects.as_slice() {
            [single] => single,
            [] => {
                return Err(CredentialError::MalformedSubject(
                    "credential has no subject".into(),
                ))
            }
            many => {
                return Err(CredentialError::MalformedSubject(format!(
                    "expect a single verifiable credential claim, got {}",
                    many.len()
                )))
            }
        };

        let target_service = subject.string_claim(CLAIM_TO_SERVICE)?.to_string();
        let subject_id = subject
            .id
            .clone()
            .ok_or_else(|| CredentialError::MalformedSubject("subject has no id".into()))?;

        if subject_id != verified.credential.issuer {
            return Err(CredentialError::SubjectMismatch {
                subject: subject_id,
                issuer: verified.credential.issuer.clone(),
            });
        }

        if verified.proof.purpose != PROOF_PURPOSE_AUTHENTICATION {
            return Err(CredentialError::WrongProofPurpose(
                verified.proof.purpose.clone(),
            ));
        }

        Ok(Self {
            subject_id,
            target_service,
        })
    }
}

/// [`ClaimParser`] for authentication credentials.
pub struct AuthClaimParser {
    verifier: CredentialVerifier,
}

impl AuthClaimParser {
    pub fn new(verifier: CredentialVerifier) -> Self {
        Self { verifier }
    }

    /// Parse with validity dates evaluated against `now`.
    pub fn parse_signed_at(
        &self,
        raw: &[u8],
        now: DateTime<Utc>,
    ) -> Result<AuthClaim, CredentialError> {
        let verified = self.verifier.parse_and_verify_at(raw, now)?;
        AuthClaim::from_verified(&verified)
    }
}

impl Default for AuthClaimParser {
    fn default() -> Self {
        Self::new(CredentialVerifier::default())
    }
}

impl ClaimParser for AuthClaimParser {
    type Claim = AuthClaim;

    fn parse_signed(&self, raw: &[u8]) -> Result<AuthClaim, CredentialError> {
        self.parse_signed_at(raw, Utc::now())
    }
}
