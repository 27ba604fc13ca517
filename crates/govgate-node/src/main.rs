//! Govgate Node: entry point.
//!
//! Authenticates callers presenting a self-signed credential against the
//! service governance and serves governed resources to token bearers.

mod api;
mod config;
mod state;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use govgate_auth::{AuthProxy, ResourceGuard, SessionTokenIssuer};
use govgate_credentials::AuthClaimParser;
use govgate_dataverse::{CosmWasmClient, Governance, GovernanceClient};

use config::{GovgateConfig, TOKEN_SECRET_ENV};
use state::AppState;
use storage::Storage;

/// Govgate Node
#[derive(Parser, Debug)]
#[command(name = "govgate-node", version, about = "Govgate authentication node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "govgate.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Report the contracts in use. Failures are logged, never fatal.
async fn log_dataverse_info(
    client: &CosmWasmClient,
    governance: &GovernanceClient,
    dataverse_address: &str,
) {
    if !dataverse_address.is_empty() {
        match client.dataverse_info(dataverse_address).await {
            Ok(info) => tracing::info!(address = %info.address, name = %info.name, "dataverse"),
            Err(e) => tracing::warn!(address = dataverse_address, error = %e, "dataverse info unavailable"),
        }
    }
    match governance.cognitarium_info().await {
        Ok(info) => tracing::info!(
            address = %info.address,
            owner = %info.owner,
            triples = %info.stat.triple_count,
            namespaces = %info.stat.namespace_count,
            bytes = %info.stat.byte_size,
            "cognitarium"
        ),
        Err(e) => tracing::warn!(error = %e, "cognitarium info unavailable"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        init_tracing(args.log_level.as_deref().unwrap_or("info"), "text");
        let config = GovgateConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration and apply overrides
    let mut config = GovgateConfig::load(&args.config)?;
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(ref data_dir) = args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.apply_token_secret(std::env::var(TOKEN_SECRET_ENV).ok());

    init_tracing(&config.logging.level, &config.logging.format);
    tracing::info!("Govgate Node v{}", env!("CARGO_PKG_VERSION"));
    config.validate()?;

    let client = Arc::new(CosmWasmClient::new(&config.dataverse)?);
    let governance_client = Arc::new(GovernanceClient::new(
        client.clone(),
        client.clone(),
        config.dataverse.cognitarium_address.clone(),
    ));
    log_dataverse_info(&client, &governance_client, &config.dataverse.dataverse_address).await;
    let governance: Arc<dyn Governance> = governance_client;

    // The service governance must resolve before anything is served.
    let proxy = AuthProxy::new(
        config.service.did.clone(),
        Arc::new(AuthClaimParser::default()),
        governance.clone(),
    )
    .await?;
    let tokens = SessionTokenIssuer::new(&config.token)?;
    let storage = Storage::open(&config.storage.data_dir)?;
    let state = Arc::new(AppState::new(
        proxy,
        tokens,
        ResourceGuard::new(governance),
        storage,
    ));

    let listen_addr = config.api_socket_addr()?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = api::start_api_server(listen_addr, state) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "API server error");
                return Err(e);
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    tracing::info!("Govgate node exited cleanly");
    Ok(())
}
