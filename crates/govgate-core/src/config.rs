use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Session token settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Value of the `iss` claim on issued tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// HMAC secret. Must be set before tokens can be issued.
    #[serde(default)]
    pub secret: Option<String>,
    /// Token time-to-live in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Clock skew tolerated when validating `exp`/`nbf`, in seconds.
    #[serde(default)]
    pub leeway_secs: u64,
}

impl TokenConfig {
    /// The configured secret as bytes, or an error if none is set.
    pub fn secret_bytes(&self) -> Result<&[u8], CoreError> {
        match self.secret.as_deref() {
            Some(s) if !s.is_empty() => Ok(s.as_bytes()),
            _ => Err(CoreError::InvalidConfig("token secret is not set".into())),
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl_secs", &self.ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            secret: None,
            ttl_secs: default_ttl_secs(),
            leeway_secs: 0,
        }
    }
}

/// Connection settings for the dataverse contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataverseConfig {
    /// Base URL of the chain's REST (LCD) endpoint.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Address of the triple store (cognitarium) contract.
    #[serde(default)]
    pub cognitarium_address: String,
    /// Address of the dataverse contract. Only used for reporting.
    #[serde(default)]
    pub dataverse_address: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DataverseConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            cognitarium_address: String::new(),
            dataverse_address: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_issuer() -> String {
    "govgate".into()
}
fn default_ttl_secs() -> u64 {
    3600
}
fn default_rest_url() -> String {
    "http://127.0.0.1:1317".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}
