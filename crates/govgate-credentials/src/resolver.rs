use govgate_core::Did;
use govgate_crypto::keys::{MULTICODEC_ED25519_PUB, MULTICODEC_SECP256K1_PUB};
use govgate_crypto::{decode_fingerprint, KeyAlgorithm, PublicKey};

use crate::error::KeyResolutionError;

/// Outcome of a single resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The strategy produced the verification key.
    Resolved(PublicKey),
    /// The strategy does not handle this key; the next one should be tried.
    NotApplicable,
}

/// One link of the key resolution chain.
///
/// Returning an error stops the chain; returning
/// [`Resolution::NotApplicable`] hands over to the next strategy.
pub trait KeyResolutionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to resolve `key_id` for a parsed `did:key` issuer.
    fn resolve(&self, issuer: &Did, key_id: &str) -> Result<Resolution, KeyResolutionError>;
}

/// Resolves secp256k1 `did:key` identifiers directly from their
/// fingerprint when the requested key is the DID's own key.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1DidKeyStrategy;

impl KeyResolutionStrategy for Secp256k1DidKeyStrategy {
    fn name(&self) -> &'static str {
        "secp256k1-did-key"
    }

    fn resolve(&self, issuer: &Did, key_id: &str) -> Result<Resolution, KeyResolutionError> {
        let (code, key) = decode(issuer)?;
        if code != MULTICODEC_SECP256K1_PUB || !is_own_key(issuer, key_id) {
            return Ok(Resolution::NotApplicable);
        }
        let pubkey = PublicKey::from_bytes(KeyAlgorithm::Secp256k1, &key)
            .map_err(|e| KeyResolutionError::InvalidKey(e.to_string()))?;
        Ok(Resolution::Resolved(pubkey))
    }
}

/// Generic `did:key` resolution: expands the DID into its implicit DID
/// document and looks the key id up among its verification methods.
///
/// The document only carries verification method types this strategy
/// knows how to express, which excludes secp256k1.
#[derive(Debug, Default, Clone, Copy)]
pub struct DidKeyDocumentStrategy;

impl KeyResolutionStrategy for DidKeyDocumentStrategy {
    fn name(&self) -> &'static str {
        "did-key-document"
    }

    fn resolve(&self, issuer: &Did, key_id: &str) -> Result<Resolution, KeyResolutionError> {
        let (code, key) = decode(issuer)?;
        let algorithm = match code {
            MULTICODEC_ED25519_PUB => KeyAlgorithm::Ed25519,
            other => return Err(KeyResolutionError::UnsupportedAlgorithm(other)),
        };
        if !is_own_key(issuer, key_id) {
            return Err(KeyResolutionError::KeyNotFound {
                did: issuer.without_fragment().to_string(),
                key_id: key_id.to_string(),
            });
        }
        let pubkey = PublicKey::from_bytes(algorithm, &key)
            .map_err(|e| KeyResolutionError::InvalidKey(e.to_string()))?;
        Ok(Resolution::Resolved(pubkey))
    }
}

/// Ordered chain of resolution strategies for `did:key` issuers.
pub struct KeyResolver {
    strategies: Vec<Box<dyn KeyResolutionStrategy>>,
}

impl KeyResolver {
    /// Create a resolver with no strategies.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The standard chain: secp256k1 short-circuit, then the generic
    /// DID document lookup.
    pub fn did_key() -> Self {
        let mut resolver = Self::new();
        resolver.add_strategy(Box::new(Secp256k1DidKeyStrategy));
        resolver.add_strategy(Box::new(DidKeyDocumentStrategy));
        resolver
    }

    /// Append a strategy to the chain.
    pub fn add_strategy(&mut self, strategy: Box<dyn KeyResolutionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Number of registered strategies.
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Resolve the verification key `key_id` of `issuer`.
    ///
    /// `key_id` is either a bare `#fragment` or a full DID URL.
    pub fn resolve(&self, issuer: &str, key_id: &str) -> Result<PublicKey, KeyResolutionError> {
        let did = Did::parse(issuer).map_err(|e| KeyResolutionError::MalformedDid(e.to_string()))?;
        if did.method() != "key" {
            return Err(KeyResolutionError::UnsupportedMethod(did.method().to_string()));
        }

        for strategy in &self.strategies {
            match strategy.resolve(&did, key_id)? {
                Resolution::Resolved(key) => {
                    tracing::debug!(
                        did = issuer,
                        key_id = key_id,
                        strategy = strategy.name(),
                        "verification key resolved"
                    );
                    return Ok(key);
                }
                Resolution::NotApplicable => {
                    tracing::debug!(
                        did = issuer,
                        strategy = strategy.name(),
                        "strategy not applicable, trying next"
                    );
                }
            }
        }

        Err(KeyResolutionError::KeyNotFound {
            did: issuer.to_string(),
            key_id: key_id.to_string(),
        })
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::did_key()
    }
}

fn decode(issuer: &Did) -> Result<(u64, Vec<u8>), KeyResolutionError> {
    decode_fingerprint(issuer.method_specific_id())
        .map_err(|e| KeyResolutionError::UndecodableFingerprint(e.to_string()))
}

/// A `did:key` has exactly one key, addressed by its own fingerprint.
fn is_own_key(issuer: &Did, key_id: &str) -> bool {
    let fragment = match key_id.rsplit_once('#') {
        Some((prefix, fragment)) => {
            if !prefix.is_empty() && prefix != issuer.without_fragment() {
                return false;
            }
            fragment
        }
        None => return false,
    };
    fragment == issuer.method_specific_id()
}
