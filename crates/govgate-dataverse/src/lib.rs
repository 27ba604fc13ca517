//! Govgate Dataverse: Resolve the policy contract governing a resource
//! and evaluate what it permits.

pub mod answer;
pub mod client;
pub mod error;
pub mod governance;
pub mod info;
pub mod memory;
pub mod query;

pub use answer::{parse_list, AskResponse, LawStoneQuery};
pub use client::{CosmWasmClient, PolicyContract, TripleStore};
pub use error::DataverseError;
pub use governance::{Governance, GovernanceClient};
pub use info::{CognitariumInfo, DataverseInfo, StoreStat};
pub use memory::{InMemoryPolicyContract, InMemoryTripleStore};
pub use query::{governance_address_query, SelectQuery, SelectResponse};
