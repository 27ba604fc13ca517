//! `govgate credential`: Sign an authentication credential.

use chrono::{Duration, Utc};
use clap::Args;
use govgate_credentials::{AuthCredentialBuilder, AuthCredentialConfig};
use govgate_crypto::{KeyAlgorithm, KeyPair};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Hex-encoded 32-byte secret key.
    #[arg(short, long)]
    pub secret: String,

    /// Algorithm of the secret key (secp256k1, ed25519).
    #[arg(short, long, default_value = "secp256k1")]
    pub algorithm: KeyAlgorithm,

    /// DID of the service the credential is meant for.
    #[arg(long)]
    pub service: String,

    /// Seconds until the credential expires; no expiration when omitted.
    #[arg(long)]
    pub ttl_secs: Option<i64>,

    /// Write the credential to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CredentialArgs) -> anyhow::Result<()> {
    let keypair = KeyPair::from_hex(args.algorithm, args.secret.trim())
        .map_err(|e| anyhow::anyhow!("invalid secret key: {}", e))?;

    let now = Utc::now();
    let config = AuthCredentialConfig {
        to_service: args.service.clone(),
        issuance_date: Some(now),
        expiration_date: args.ttl_secs.map(|secs| now + Duration::seconds(secs)),
        ..Default::default()
    };
    let credential = AuthCredentialBuilder::new(config).sign(&keypair)?;
    let json = serde_json::to_string_pretty(&credential)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("Credential for {} written to {}", keypair.did(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
