use chrono::{DateTime, Utc};

/// Failure to turn an issuer DID and key id into a verification key.
#[derive(Debug, thiserror::Error)]
pub enum KeyResolutionError {
    #[error("malformed DID: {0}")]
    MalformedDid(String),

    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    #[error("undecodable key fingerprint: {0}")]
    UndecodableFingerprint(String),

    #[error("unsupported key algorithm (multicodec 0x{0:x})")]
    UnsupportedAlgorithm(u64),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("key {key_id} not found for {did}")]
    KeyNotFound { did: String, key_id: String },
}

/// Credential parsing, verification and claim extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("malformed verifiable credential: {0}")]
    Malformed(String),

    #[error("missing verifiable credential proof")]
    MissingProof,

    #[error("invalid verifiable credential proof: {0}")]
    InvalidProof(String),

    #[error("malformed verifiable credential subject: {0}")]
    MalformedSubject(String),

    #[error("failed to extract claim: {0}")]
    ExtractClaimFailed(String),

    #[error("verifiable credential expired: {0}")]
    Expired(DateTime<Utc>),

    #[error("verifiable credential issued in the future: {0}")]
    IssuedInFuture(DateTime<Utc>),

    #[error("subject differs from issuer (subject: {subject}, issuer: {issuer})")]
    SubjectMismatch { subject: String, issuer: String },

    #[error("proof purpose must be 'authentication', got '{0}'")]
    WrongProofPurpose(String),

    #[error("key resolution failed: {0}")]
    KeyResolution(#[from] KeyResolutionError),

    #[error("credential signing failed: {0}")]
    Signing(String),
}
