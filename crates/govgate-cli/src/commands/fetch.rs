//! `govgate fetch`: Read a governed resource.

use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::{ensure_success, resource_url, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Resource path, usually the resource DID.
    pub path: String,

    /// Session token from `govgate authenticate`.
    #[arg(short, long)]
    pub token: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Write the resource to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: &FetchArgs) -> anyhow::Result<()> {
    let url = resource_url(&args.endpoint, &args.path);
    let resp = reqwest::Client::new()
        .get(&url)
        .bearer_auth(args.token.trim())
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("could not reach node at {}: {}", args.endpoint, e))?;
    let data = ensure_success(resp, "fetch").await?.bytes().await?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &data)?;
            eprintln!("{} bytes written to {}", data.len(), path.display());
        }
        None => std::io::stdout().write_all(&data)?,
    }
    Ok(())
}
