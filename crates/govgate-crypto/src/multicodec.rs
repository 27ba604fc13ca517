//! `did:key` fingerprints: multibase base58btc (`z` prefix) over a
//! varint multicodec header followed by the raw public key.

use crate::error::CryptoError;
use crate::keys::KeyAlgorithm;

const MULTIBASE_BASE58BTC: char = 'z';

/// Encode a public key as a `did:key` fingerprint.
pub fn encode_fingerprint(algorithm: KeyAlgorithm, key: &[u8]) -> String {
    let mut buf = encode_varint(algorithm.multicodec());
    buf.extend_from_slice(key);
    format!("{}{}", MULTIBASE_BASE58BTC, bs58::encode(buf).into_string())
}

/// Decode a fingerprint into its multicodec code and key bytes.
///
/// Accepts either a bare fingerprint or a full `did:key:` identifier.
pub fn decode_fingerprint(fingerprint: &str) -> Result<(u64, Vec<u8>), CryptoError> {
    let fingerprint = fingerprint.strip_prefix("did:key:").unwrap_or(fingerprint);
    let encoded = fingerprint
        .strip_prefix(MULTIBASE_BASE58BTC)
        .ok_or_else(|| {
            CryptoError::InvalidFingerprint(format!(
                "expected multibase base58btc prefix 'z': {}",
                fingerprint
            ))
        })?;

    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| CryptoError::InvalidFingerprint(format!("invalid base58: {}", e)))?;

    let (code, read) = decode_varint(&bytes)?;
    Ok((code, bytes[read..].to_vec()))
}

fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), CryptoError> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate().take(9) {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CryptoError::InvalidFingerprint(
        "truncated multicodec header".into(),
    ))
}
