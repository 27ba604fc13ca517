pub mod error;
pub mod keys;
pub mod multicodec;
pub mod signing;

pub use error::CryptoError;
pub use keys::{KeyAlgorithm, KeyPair, PublicKey};
pub use multicodec::{decode_fingerprint, encode_fingerprint};
pub use signing::{sign, verify};
