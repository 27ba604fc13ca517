//! `govgate info`: Show the dataverse and cognitarium contracts.

use clap::Args;
use serde_json::json;

use govgate_core::DataverseConfig;
use govgate_dataverse::CosmWasmClient;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// REST (LCD) endpoint of the chain.
    #[arg(long, default_value = "http://127.0.0.1:1317")]
    pub rest_url: String,

    /// Address of the dataverse contract.
    #[arg(long)]
    pub dataverse: Option<String>,

    /// Address of the cognitarium contract.
    #[arg(long)]
    pub cognitarium: Option<String>,
}

pub async fn run(args: &InfoArgs) -> anyhow::Result<()> {
    if args.dataverse.is_none() && args.cognitarium.is_none() {
        anyhow::bail!("pass --dataverse and/or --cognitarium");
    }
    let client = CosmWasmClient::new(&DataverseConfig {
        rest_url: args.rest_url.clone(),
        ..Default::default()
    })?;

    let mut out = serde_json::Map::new();
    if let Some(address) = &args.dataverse {
        out.insert("dataverse".into(), json!(client.dataverse_info(address).await?));
    }
    if let Some(address) = &args.cognitarium {
        out.insert(
            "cognitarium".into(),
            json!(client.cognitarium_info(address).await?),
        );
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
