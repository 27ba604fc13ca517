use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::answer;
use crate::client::{decode_program, PolicyContract, TripleStore};
use crate::error::DataverseError;
use crate::info::CognitariumInfo;
use crate::query::{governance_address_query, BindingValue, Iri, CODE_VAR};

/// On-chain governance of resources.
#[async_trait]
pub trait Governance: Send + Sync {
    /// Address of the policy contract governing `resource_did`.
    async fn resolve_governance_address(&self, resource_did: &str)
        -> Result<String, DataverseError>;

    /// Actions the policy at `address` grants to `did`.
    ///
    /// An absent or ambiguous answer is the empty set.
    async fn list_permitted_actions(
        &self,
        address: &str,
        did: &str,
    ) -> Result<BTreeSet<String>, DataverseError>;

    /// Whether the policy at `address` permits `action` for `did`.
    async fn is_action_permitted(
        &self,
        address: &str,
        did: &str,
        action: &str,
    ) -> Result<bool, DataverseError>;
}

/// Governance backed by a cognitarium triple store and law-stone contracts.
pub struct GovernanceClient {
    triple_store: Arc<dyn TripleStore>,
    policies: Arc<dyn PolicyContract>,
    cognitarium_address: String,
}

impl GovernanceClient {
    pub fn new(
        triple_store: Arc<dyn TripleStore>,
        policies: Arc<dyn PolicyContract>,
        cognitarium_address: impl Into<String>,
    ) -> Self {
        Self {
            triple_store,
            policies,
            cognitarium_address: cognitarium_address.into(),
        }
    }

    /// Source of the policy program at `address`; empty when it has none.
    pub async fn governance_code(&self, address: &str) -> Result<String, DataverseError> {
        match self.policies.program_code(address).await? {
            Some(encoded) => decode_program(&encoded),
            None => Ok(String::new()),
        }
    }

    /// Owner and statistics of the cognitarium holding governance links.
    pub async fn cognitarium_info(&self) -> Result<CognitariumInfo, DataverseError> {
        let response = self.triple_store.store(&self.cognitarium_address).await?;
        Ok(CognitariumInfo::from_response(&self.cognitarium_address, response))
    }

    async fn ask_sole_expression(
        &self,
        address: &str,
        query: &str,
    ) -> Result<Option<String>, DataverseError> {
        let response = self.policies.ask(address, query).await?;
        Ok(response.sole_expression().map(str::to_string))
    }
}

#[async_trait]
impl Governance for GovernanceClient {
    async fn resolve_governance_address(
        &self,
        resource_did: &str,
    ) -> Result<String, DataverseError> {
        let query = governance_address_query(resource_did);
        let response = self
            .triple_store
            .select(&self.cognitarium_address, &query)
            .await?;

        let binding = match response.results.bindings.as_slice() {
            [binding] => binding,
            _ => return Err(DataverseError::NoResult),
        };
        let code = binding
            .get(CODE_VAR)
            .ok_or_else(|| DataverseError::VarNotFound(CODE_VAR.to_string()))?;

        let full = match code {
            BindingValue::Uri {
                value: Iri::Full(full),
            } => full,
            BindingValue::Uri {
                value: Iri::Prefixed(prefixed),
            } => {
                return Err(DataverseError::TypeMismatch(format!(
                    "expected full URI, got prefixed {}",
                    prefixed
                )))
            }
            other => {
                return Err(DataverseError::TypeMismatch(format!(
                    "expected URI, got {}",
                    other.kind()
                )))
            }
        };

        let address = full.rsplit(':').next().unwrap_or(full).to_string();
        tracing::debug!(resource = resource_did, address = %address, "governance address resolved");
        Ok(address)
    }

    async fn list_permitted_actions(
        &self,
        address: &str,
        did: &str,
    ) -> Result<BTreeSet<String>, DataverseError> {
        let query = answer::permitted_actions_query(did);
        Ok(self
            .ask_sole_expression(address, &query)
            .await?
            .map(|expr| answer::parse_list(&expr))
            .unwrap_or_default())
    }

    async fn is_action_permitted(
        &self,
        address: &str,
        did: &str,
        action: &str,
    ) -> Result<bool, DataverseError> {
        let query = answer::tell_action_query(did, action);
        let permitted = self
            .ask_sole_expression(address, &query)
            .await?
            .is_some_and(|expr| answer::is_permitted(&expr));
        Ok(permitted)
    }
}
