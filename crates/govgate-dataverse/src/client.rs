use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use govgate_core::DataverseConfig;

use crate::answer::{AskResponse, LawStoneQuery};
use crate::error::DataverseError;
use crate::info::{CognitariumInfo, DataverseInfo, DataverseQuery, DataverseResponse, StoreResponse};
use crate::query::{CognitariumQuery, SelectQuery, SelectResponse};

/// A triple store contract answering select queries.
#[async_trait]
pub trait TripleStore: Send + Sync {
    async fn select(
        &self,
        address: &str,
        query: &SelectQuery,
    ) -> Result<SelectResponse, DataverseError>;

    /// Owner and statistics of the store.
    async fn store(&self, address: &str) -> Result<StoreResponse, DataverseError>;
}

/// A policy (law-stone) contract answering logic queries.
#[async_trait]
pub trait PolicyContract: Send + Sync {
    /// Evaluate a Prolog query against the contract's program.
    async fn ask(&self, address: &str, query: &str) -> Result<AskResponse, DataverseError>;

    /// The contract's program source, base64-encoded, if it has one.
    async fn program_code(&self, address: &str) -> Result<Option<String>, DataverseError>;
}

/// CosmWasm smart-query client over a chain's REST endpoint.
#[derive(Debug, Clone)]
pub struct CosmWasmClient {
    http: reqwest::Client,
    rest_url: String,
}

#[derive(Deserialize)]
struct SmartQueryResponse<T> {
    data: T,
}

#[derive(Deserialize)]
struct RestError {
    message: String,
}

impl CosmWasmClient {
    /// Create a client for the configured REST endpoint.
    pub fn new(config: &DataverseConfig) -> Result<Self, DataverseError> {
        if config.rest_url.is_empty() {
            return Err(DataverseError::InvalidConfig("rest_url is empty".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DataverseError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            http,
            rest_url: config.rest_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of a smart query of `msg` on `contract`.
    pub fn smart_query_url<Q: Serialize>(
        &self,
        contract: &str,
        msg: &Q,
    ) -> Result<String, DataverseError> {
        let body = serde_json::to_vec(msg).map_err(|e| DataverseError::Decode(e.to_string()))?;
        Ok(format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.rest_url,
            contract,
            URL_SAFE.encode(body)
        ))
    }

    /// Run a smart query and decode its `data` member.
    pub async fn smart_query<Q, R>(&self, contract: &str, msg: &Q) -> Result<R, DataverseError>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.smart_query_url(contract, msg)?;
        tracing::debug!(contract = contract, "sending smart query");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RestError>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(DataverseError::Contract {
                address: contract.to_string(),
                message: format!("HTTP {}: {}", status, message),
            });
        }

        let body: SmartQueryResponse<R> = response.json().await?;
        Ok(body.data)
    }

    /// Name of the dataverse contract at `address`.
    pub async fn dataverse_info(&self, address: &str) -> Result<DataverseInfo, DataverseError> {
        let response: DataverseResponse = self
            .smart_query(address, &DataverseQuery::Dataverse {})
            .await?;
        Ok(DataverseInfo::from_response(address, response))
    }

    /// Owner and statistics of the cognitarium contract at `address`.
    pub async fn cognitarium_info(&self, address: &str) -> Result<CognitariumInfo, DataverseError> {
        let response = self.store(address).await?;
        Ok(CognitariumInfo::from_response(address, response))
    }
}

#[async_trait]
impl TripleStore for CosmWasmClient {
    async fn select(
        &self,
        address: &str,
        query: &SelectQuery,
    ) -> Result<SelectResponse, DataverseError> {
        let msg = CognitariumQuery::Select {
            query: query.clone(),
        };
        self.smart_query(address, &msg).await
    }

    async fn store(&self, address: &str) -> Result<StoreResponse, DataverseError> {
        self.smart_query(address, &CognitariumQuery::Store {}).await
    }
}

#[async_trait]
impl PolicyContract for CosmWasmClient {
    async fn ask(&self, address: &str, query: &str) -> Result<AskResponse, DataverseError> {
        let msg = LawStoneQuery::Ask {
            query: query.to_string(),
        };
        self.smart_query(address, &msg).await
    }

    async fn program_code(&self, address: &str) -> Result<Option<String>, DataverseError> {
        self.smart_query(address, &LawStoneQuery::ProgramCode {})
            .await
    }
}

/// Decode a base64 program into source text.
pub fn decode_program(encoded: &str) -> Result<String, DataverseError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| DataverseError::Decode(format!("invalid program encoding: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| DataverseError::Decode(format!("program is not UTF-8: {}", e)))
}
