//! `govgate keygen`: Generate a key pair.

use clap::Args;
use govgate_crypto::{KeyAlgorithm, KeyPair};

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key algorithm (secp256k1, ed25519).
    #[arg(short, long, default_value = "secp256k1")]
    pub algorithm: KeyAlgorithm,

    /// Print the key as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    let keypair = KeyPair::generate(args.algorithm);
    let secret = keypair.secret_hex();

    if args.json {
        let out = serde_json::json!({
            "algorithm": args.algorithm.to_string(),
            "did": keypair.did(),
            "verificationMethod": keypair.verification_method(),
            "publicKey": keypair.public_key().to_hex(),
            "secret": secret.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Algorithm:   {}", args.algorithm);
    println!("DID:         {}", keypair.did());
    println!("Public key:  {}", keypair.public_key().to_hex());
    println!("Secret:      {}", secret.as_str());
    println!();
    println!("Keep the secret safe; it signs credentials for this DID.");
    Ok(())
}
