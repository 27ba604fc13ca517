//! `govgate store`: Store a governed resource.

use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;

use super::{ensure_success, resource_url, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Resource path, usually the resource DID.
    pub path: String,

    /// File whose content is stored.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Session token from `govgate authenticate`.
    #[arg(short, long)]
    pub token: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StoreResponse {
    resource: String,
    size: usize,
}

pub async fn run(args: &StoreArgs) -> anyhow::Result<()> {
    let body = std::fs::read(&args.file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.file.display(), e))?;

    let url = resource_url(&args.endpoint, &args.path);
    let resp = reqwest::Client::new()
        .post(&url)
        .bearer_auth(args.token.trim())
        .body(body)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("could not reach node at {}: {}", args.endpoint, e))?;
    let stored: StoreResponse = ensure_success(resp, "store").await?.json().await?;

    println!("Stored {} ({} bytes)", stored.resource, stored.size);
    Ok(())
}
