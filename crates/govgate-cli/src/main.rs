//! Govgate CLI: Command-line client for a Govgate node.
//!
//! Subcommands: keygen, credential, authenticate, fetch, store, info.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Govgate: decentralized identity authentication.
#[derive(Parser, Debug)]
#[command(name = "govgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new key pair and print its did:key.
    Keygen(commands::keygen::KeygenArgs),
    /// Sign an authentication credential for a service.
    Credential(commands::credential::CredentialArgs),
    /// Exchange a signed credential for a session token.
    Authenticate(commands::authenticate::AuthenticateArgs),
    /// Read a governed resource.
    Fetch(commands::fetch::FetchArgs),
    /// Store a governed resource.
    Store(commands::store::StoreArgs),
    /// Show the dataverse and cognitarium contracts.
    Info(commands::info::InfoArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Credential(args) => commands::credential::run(args),
        Commands::Authenticate(args) => commands::authenticate::run(args).await,
        Commands::Fetch(args) => commands::fetch::run(args).await,
        Commands::Store(args) => commands::store::run(args).await,
        Commands::Info(args) => commands::info::run(args).await,
    }
}
