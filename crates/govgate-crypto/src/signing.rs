use ed25519_dalek::Signer as _;
use ed25519_dalek::Verifier as _;

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Length of both Ed25519 and compact secp256k1 ECDSA signatures.
pub const SIGNATURE_LEN: usize = 64;

/// Sign a message. secp256k1 signatures are ECDSA over SHA-256 in the
/// compact `r || s` form.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Vec<u8> {
    match keypair {
        KeyPair::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
        KeyPair::Secp256k1(key) => {
            let sig: k256::ecdsa::Signature = key.sign(message);
            sig.to_bytes().to_vec()
        }
    }
}

/// Verify a 64-byte signature against a public key.
pub fn verify(message: &[u8], signature: &[u8], pubkey: &PublicKey) -> Result<(), CryptoError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignature(format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_LEN,
            signature.len()
        )));
    }
    match pubkey {
        PublicKey::Ed25519(key) => {
            let sig = ed25519_dalek::Signature::from_slice(signature)
                .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
            key.verify(message, &sig)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
        PublicKey::Secp256k1(key) => {
            let sig = k256::ecdsa::Signature::from_slice(signature)
                .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
            key.verify(message, &sig)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
    }
}
