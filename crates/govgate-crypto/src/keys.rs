use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::SigningKey as Secp256k1SigningKey;
use k256::ecdsa::VerifyingKey as Secp256k1VerifyingKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;
use crate::multicodec::encode_fingerprint;
use crate::signing;

/// Multicodec code of an Ed25519 public key.
pub const MULTICODEC_ED25519_PUB: u64 = 0xed;
/// Multicodec code of a compressed secp256k1 public key.
pub const MULTICODEC_SECP256K1_PUB: u64 = 0xe7;

/// Signature algorithms a `did:key` may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    Ed25519,
    Secp256k1,
}

impl KeyAlgorithm {
    /// Multicodec code used in `did:key` fingerprints.
    pub fn multicodec(&self) -> u64 {
        match self {
            Self::Ed25519 => MULTICODEC_ED25519_PUB,
            Self::Secp256k1 => MULTICODEC_SECP256K1_PUB,
        }
    }

    /// Map a multicodec code back to an algorithm.
    pub fn from_multicodec(code: u64) -> Option<Self> {
        match code {
            MULTICODEC_ED25519_PUB => Some(Self::Ed25519),
            MULTICODEC_SECP256K1_PUB => Some(Self::Secp256k1),
            _ => None,
        }
    }

    /// Length of the encoded public key.
    pub fn public_key_len(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 => 33,
        }
    }

    /// Verification method type used in DID documents for this key.
    pub fn verification_method_type(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519VerificationKey2020",
            Self::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "secp256k1" => Ok(Self::Secp256k1),
            other => Err(CryptoError::InvalidInput(format!(
                "unknown key algorithm: {}",
                other
            ))),
        }
    }
}

/// Public key used to verify credential proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(Ed25519VerifyingKey),
    Secp256k1(Secp256k1VerifyingKey),
}

impl PublicKey {
    /// Decode a raw public key of the given algorithm.
    ///
    /// secp256k1 keys are SEC1-encoded (compressed or uncompressed).
    pub fn from_bytes(algorithm: KeyAlgorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let arr: [u8; 32] =
                    bytes
                        .try_into()
                        .map_err(|_| CryptoError::InvalidKeyLength {
                            algorithm: "ed25519",
                            expected: 32,
                            actual: bytes.len(),
                        })?;
                let key = Ed25519VerifyingKey::from_bytes(&arr)
                    .map_err(|e| CryptoError::InvalidKey(format!("ed25519: {}", e)))?;
                Ok(Self::Ed25519(key))
            }
            KeyAlgorithm::Secp256k1 => {
                let key = Secp256k1VerifyingKey::from_sec1_bytes(bytes)
                    .map_err(|e| CryptoError::InvalidKey(format!("secp256k1: {}", e)))?;
                Ok(Self::Secp256k1(key))
            }
        }
    }

    /// The key's algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Secp256k1(_) => KeyAlgorithm::Secp256k1,
        }
    }

    /// Raw key bytes; secp256k1 keys use the compressed SEC1 form.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.as_bytes().to_vec(),
            Self::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Multibase `did:key` fingerprint of this key.
    pub fn fingerprint(&self) -> String {
        encode_fingerprint(self.algorithm(), &self.to_bytes())
    }

    /// `did:key` identifier controlled by this key.
    pub fn did(&self) -> String {
        format!("did:key:{}", self.fingerprint())
    }

    /// Verify a signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        signing::verify(message, signature, self)
    }
}

/// Signing key pair. Secret material is zeroized on drop by the underlying
/// key types.
pub enum KeyPair {
    Ed25519(Ed25519SigningKey),
    Secp256k1(Secp256k1SigningKey),
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::Ed25519 => Self::Ed25519(Ed25519SigningKey::generate(&mut OsRng)),
            KeyAlgorithm::Secp256k1 => Self::Secp256k1(Secp256k1SigningKey::random(&mut OsRng)),
        }
    }

    /// Create a key pair from a 32-byte secret.
    pub fn from_secret(algorithm: KeyAlgorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                algorithm: algorithm.name(),
                expected: 32,
                actual: bytes.len(),
            });
        }
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(bytes);
                let key = Ed25519SigningKey::from_bytes(&seed);
                seed.zeroize();
                Ok(Self::Ed25519(key))
            }
            KeyAlgorithm::Secp256k1 => {
                let key = Secp256k1SigningKey::from_slice(bytes)
                    .map_err(|e| CryptoError::InvalidKey(format!("secp256k1: {}", e)))?;
                Ok(Self::Secp256k1(key))
            }
        }
    }

    /// Create a key pair from a hex-encoded 32-byte secret.
    pub fn from_hex(algorithm: KeyAlgorithm, hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?,
        );
        Self::from_secret(algorithm, &bytes)
    }

    /// Hex encoding of the secret. Use with caution.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(match self {
            Self::Ed25519(key) => key.to_bytes().to_vec(),
            Self::Secp256k1(key) => key.to_bytes().to_vec(),
        });
        Zeroizing::new(hex::encode(bytes.as_slice()))
    }

    /// The key's algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Secp256k1(_) => KeyAlgorithm::Secp256k1,
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            Self::Secp256k1(key) => PublicKey::Secp256k1(Secp256k1VerifyingKey::from(key)),
        }
    }

    /// `did:key` identifier controlled by this key pair.
    pub fn did(&self) -> String {
        self.public_key().did()
    }

    /// Verification method id: `did:key:<fp>#<fp>`.
    pub fn verification_method(&self) -> String {
        let fp = self.public_key().fingerprint();
        format!("did:key:{}#{}", fp, fp)
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        signing::sign(message, self)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .field("public_key", &self.public_key().to_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_keypairs() {
        let ed = KeyPair::generate(KeyAlgorithm::Ed25519);
        assert_eq!(ed.public_key().to_bytes().len(), 32);

        let k1 = KeyPair::generate(KeyAlgorithm::Secp256k1);
        assert_eq!(k1.public_key().to_bytes().len(), 33);
    }

    #[test]
    fn test_from_secret_deterministic() {
        for alg in [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1] {
            let kp1 = KeyPair::from_secret(alg, &[42u8; 32]).unwrap();
            let kp2 = KeyPair::from_secret(alg, &[42u8; 32]).unwrap();
            assert_eq!(kp1.public_key(), kp2.public_key());
        }
    }

    #[test]
    fn test_from_secret_invalid_length() {
        let result = KeyPair::from_secret(KeyAlgorithm::Secp256k1, &[1u8; 16]);
        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 16, .. })
        ));
    }

    #[test]
    fn test_secp256k1_zero_secret_rejected() {
        let result = KeyPair::from_secret(KeyAlgorithm::Secp256k1, &[0u8; 32]);
        assert!(matches!(result, Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_hex_secret_roundtrip() {
        for alg in [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1] {
            let kp = KeyPair::generate(alg);
            let restored = KeyPair::from_hex(alg, &kp.secret_hex()).unwrap();
            assert_eq!(kp.public_key(), restored.public_key());
        }
    }

    #[test]
    fn test_public_key_bytes_roundtrip() {
        for alg in [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1] {
            let pk = KeyPair::generate(alg).public_key();
            let back = PublicKey::from_bytes(alg, &pk.to_bytes()).unwrap();
            assert_eq!(pk, back);
        }
    }

    #[test]
    fn test_public_key_wrong_length() {
        assert!(PublicKey::from_bytes(KeyAlgorithm::Ed25519, &[0u8; 31]).is_err());
        assert!(PublicKey::from_bytes(KeyAlgorithm::Secp256k1, &[2u8; 10]).is_err());
    }

    #[test]
    fn test_did_prefixes() {
        let ed = KeyPair::generate(KeyAlgorithm::Ed25519);
        assert!(ed.did().starts_with("did:key:z6Mk"));

        let k1 = KeyPair::generate(KeyAlgorithm::Secp256k1);
        assert!(k1.did().starts_with("did:key:zQ3s"));
    }

    #[test]
    fn test_verification_method_uses_fingerprint_fragment() {
        let kp = KeyPair::from_secret(KeyAlgorithm::Secp256k1, &[7u8; 32]).unwrap();
        let vm = kp.verification_method();
        let (did, fragment) = vm.split_once('#').unwrap();
        assert_eq!(did, kp.did());
        assert_eq!(format!("did:key:{}", fragment), kp.did());
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("SECP256K1".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::Secp256k1);
        assert_eq!(KeyAlgorithm::Ed25519.to_string(), "ed25519");
        assert!("rsa".parse::<KeyAlgorithm>().is_err());
        assert_eq!(
            serde_json::to_string(&KeyAlgorithm::Secp256k1).unwrap(),
            "\"secp256k1\""
        );
    }

    #[test]
    fn test_multicodec_mapping() {
        assert_eq!(KeyAlgorithm::from_multicodec(0xe7), Some(KeyAlgorithm::Secp256k1));
        assert_eq!(KeyAlgorithm::from_multicodec(0xed), Some(KeyAlgorithm::Ed25519));
        assert_eq!(KeyAlgorithm::from_multicodec(0x1200), None);
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = KeyPair::from_secret(KeyAlgorithm::Ed25519, &[9u8; 32]).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(kp.secret_hex().as_str()));
    }
}
