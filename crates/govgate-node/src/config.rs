//! Node configuration loading and management.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use govgate_core::{DataverseConfig, TokenConfig};

/// Environment variable holding the session token secret.
pub const TOKEN_SECRET_ENV: &str = "GOVGATE_TOKEN_SECRET";

/// Full configuration for the Govgate node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GovgateConfig {
    /// Identity of the service this node fronts.
    #[serde(default)]
    pub service: ServiceConfig,

    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session token settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Dataverse contracts.
    #[serde(default)]
    pub dataverse: DataverseConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// DID of the service; its governance decides who may authenticate.
    #[serde(default)]
    pub did: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    8080
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GovgateConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: GovgateConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Replace the token secret with `secret` when one is given.
    pub fn apply_token_secret(&mut self, secret: Option<String>) {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.token.secret = Some(secret);
        }
    }

    /// Check the settings the node cannot start without.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service.did.is_empty() {
            anyhow::bail!("service.did is not set");
        }
        govgate_core::Did::parse(&self.service.did)?;
        if self.dataverse.cognitarium_address.is_empty() {
            anyhow::bail!("dataverse.cognitarium_address is not set");
        }
        self.token.secret_bytes()?;
        Ok(())
    }

    pub fn api_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.api.listen_addr, self.api.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> GovgateConfig {
        let mut config = GovgateConfig::default();
        config.service.did = "did:key:zQ3shZxyDoD3QorxHJrFS68EjzDgQZSqZcj3wQqc1ngbF1vgz".into();
        config.dataverse.cognitarium_address = "axone1cognitarium".into();
        config.token.secret = Some("secret".into());
        config
    }

    #[test]
    fn test_default_config() {
        let config = GovgateConfig::default();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.token.ttl_secs, 3600);
        assert_eq!(config.dataverse.request_timeout_secs, 10);
        assert!(config.service.did.is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = complete();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let decoded: GovgateConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(decoded.service.did, config.service.did);
        assert_eq!(decoded.api.port, config.api.port);
        assert_eq!(decoded.token.secret, config.token.secret);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let config = GovgateConfig::load(Path::new("/nonexistent/govgate.toml")).unwrap();
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r#"
[service]
did = "did:key:zQ3shZxyDoD3QorxHJrFS68EjzDgQZSqZcj3wQqc1ngbF1vgz"

[api]
port = 9100

[token]
ttl_secs = 60
"#;
        let config: GovgateConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.api.port, 9100);
        assert_eq!(config.token.ttl_secs, 60);
        assert_eq!(config.token.issuer, "govgate");
        assert_eq!(config.api.listen_addr, "127.0.0.1");
    }

    #[test]
    fn test_env_secret_wins() {
        let mut config = complete();
        config.apply_token_secret(Some("from-env".into()));
        assert_eq!(config.token.secret.as_deref(), Some("from-env"));

        config.apply_token_secret(Some(String::new()));
        config.apply_token_secret(None);
        assert_eq!(config.token.secret.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_validate() {
        assert!(complete().validate().is_ok());

        let mut missing_did = complete();
        missing_did.service.did.clear();
        assert!(missing_did.validate().is_err());

        let mut bad_did = complete();
        bad_did.service.did = "not-a-did".into();
        assert!(bad_did.validate().is_err());

        let mut no_secret = complete();
        no_secret.token.secret = None;
        assert!(no_secret.validate().is_err());
    }

    #[test]
    fn test_api_socket_addr() {
        let config = GovgateConfig::default();
        assert_eq!(
            config.api_socket_addr().unwrap().to_string(),
            "127.0.0.1:8080"
        );
    }
}
