//! `govgate authenticate`: Exchange a credential for a session token.

use clap::Args;

use super::{ensure_success, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct AuthenticateArgs {
    /// Credential JSON (as string or path to file).
    #[arg(short, long)]
    pub credential: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &AuthenticateArgs) -> anyhow::Result<()> {
    // Try reading as file first, then as inline JSON
    let body = if std::path::Path::new(&args.credential).exists() {
        std::fs::read(&args.credential)?
    } else {
        args.credential.clone().into_bytes()
    };

    let url = format!("{}/authenticate", args.endpoint.trim_end_matches('/'));
    tracing::debug!(%url, bytes = body.len(), "submitting credential");

    let resp = reqwest::Client::new()
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("could not reach node at {}: {}", args.endpoint, e))?;
    let token = ensure_success(resp, "authentication").await?.text().await?;

    println!("{}", token.trim());
    Ok(())
}
