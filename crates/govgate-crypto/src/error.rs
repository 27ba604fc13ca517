/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length for {algorithm}: expected {expected}, got {actual}")]
    InvalidKeyLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("unsupported key algorithm (multicodec 0x{0:x})")]
    UnsupportedAlgorithm(u64),

    #[error("invalid key fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
