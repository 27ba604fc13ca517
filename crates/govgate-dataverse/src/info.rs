//! Dataverse and cognitarium contract information.

use serde::{Deserialize, Serialize};

/// Message sent to the dataverse contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataverseQuery {
    Dataverse {},
}

/// Answer to a `dataverse {}` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataverseResponse {
    pub name: String,
    #[serde(default)]
    pub triplestore_address: String,
}

/// Answer to a `store {}` query on the cognitarium.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse {
    pub owner: String,
    pub stat: StoreStat,
}

/// Cognitarium statistics. Counts are `Uint128` values, carried as
/// decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStat {
    pub byte_size: String,
    pub namespace_count: String,
    pub triple_count: String,
}

impl StoreStat {
    pub fn new(byte_size: u128, namespace_count: u128, triple_count: u128) -> Self {
        Self {
            byte_size: byte_size.to_string(),
            namespace_count: namespace_count.to_string(),
            triple_count: triple_count.to_string(),
        }
    }
}

/// A dataverse contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataverseInfo {
    pub address: String,
    pub name: String,
}

impl DataverseInfo {
    pub fn from_response(address: &str, response: DataverseResponse) -> Self {
        Self {
            address: address.to_string(),
            name: response.name,
        }
    }
}

/// A cognitarium contract instance, its owner and its statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CognitariumInfo {
    pub address: String,
    pub owner: String,
    pub stat: StoreStat,
}

impl CognitariumInfo {
    pub fn from_response(address: &str, response: StoreResponse) -> Self {
        Self {
            address: address.to_string(),
            owner: response.owner,
            stat: response.stat,
        }
    }
}
