use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Proof purpose an authentication credential must be signed for.
pub const PROOF_PURPOSE_AUTHENTICATION: &str = "authentication";

/// Decentralized Identifier (DID), optionally carrying a `#fragment`.
/// Format: `did:<method>:<method-specific-id>[#fragment]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did {
    uri: String,
    method_end: usize,
    fragment_start: Option<usize>,
}

impl Did {
    /// Parse a DID URI.
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let rest = uri.strip_prefix("did:").ok_or_else(|| {
            CoreError::InvalidDid(format!("DID must start with 'did:', got: {}", uri))
        })?;

        let (method, _) = rest.split_once(':').ok_or_else(|| {
            CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<identifier>', got: {}",
                uri
            ))
        })?;
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CoreError::InvalidDid(format!(
                "invalid DID method '{}' in: {}",
                method, uri
            )));
        }

        let method_end = "did:".len() + method.len();
        let fragment_start = uri.find('#');
        let id_end = fragment_start.unwrap_or(uri.len());
        if id_end <= method_end + 1 {
            return Err(CoreError::InvalidDid(format!(
                "empty method-specific identifier in: {}",
                uri
            )));
        }

        Ok(Self {
            uri: uri.to_string(),
            method_end,
            fragment_start,
        })
    }

    /// Get the full DID URI, including any fragment.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Extract the method (e.g. `key`).
    pub fn method(&self) -> &str {
        &self.uri["did:".len()..self.method_end]
    }

    /// Extract the method-specific identifier, without fragment.
    pub fn method_specific_id(&self) -> &str {
        let end = self.fragment_start.unwrap_or(self.uri.len());
        &self.uri[self.method_end + 1..end]
    }

    /// Extract the fragment, without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment_start.map(|i| &self.uri[i + 1..])
    }

    /// The DID with any fragment removed.
    pub fn without_fragment(&self) -> &str {
        &self.uri[..self.fragment_start.unwrap_or(self.uri.len())]
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.uri
    }
}
