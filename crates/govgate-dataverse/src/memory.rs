//! In-memory triple store and policy contracts for tests and local runs.
//!
//! The policy contract only understands the two query shapes issued by
//! [`GovernanceClient`](crate::governance::GovernanceClient); it does not
//! evaluate Prolog.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};

use crate::answer::{AskResponse, PERMITTED};
use crate::client::{PolicyContract, TripleStore};
use crate::error::DataverseError;
use crate::info::{StoreResponse, StoreStat};
use crate::query::{queried_resource, BindingValue, Head, Iri, Results, SelectQuery, SelectResponse, CODE_VAR};

const PROHIBITED: &str = "prohibited";

/// Maps resources to the IRI of their governance contract.
#[derive(Debug, Default)]
pub struct InMemoryTripleStore {
    governance: DashMap<String, String>,
    owner: String,
}

impl InMemoryTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the owner reported by `store`.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Record that `resource` is governed by the contract `code_iri`
    /// (e.g. `contract:law-stone:axone1...`).
    pub fn set_governance(&self, resource: impl Into<String>, code_iri: impl Into<String>) {
        self.governance.insert(resource.into(), code_iri.into());
    }

    pub fn len(&self) -> usize {
        self.governance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.governance.is_empty()
    }
}

#[async_trait]
impl TripleStore for InMemoryTripleStore {
    async fn select(
        &self,
        _address: &str,
        query: &SelectQuery,
    ) -> Result<SelectResponse, DataverseError> {
        let bindings = queried_resource(query)
            .and_then(|resource| self.governance.get(resource))
            .map(|iri| {
                vec![BTreeMap::from([(
                    CODE_VAR.to_string(),
                    BindingValue::Uri {
                        value: Iri::Full(iri.value().clone()),
                    },
                )])]
            })
            .unwrap_or_default();

        Ok(SelectResponse {
            head: Head {
                vars: vec![CODE_VAR.to_string()],
            },
            results: Results { bindings },
        })
    }

    /// Each governance link counts as one triple in the governance namespace.
    async fn store(&self, _address: &str) -> Result<StoreResponse, DataverseError> {
        let byte_size: usize = self
            .governance
            .iter()
            .map(|link| link.key().len() + link.value().len())
            .sum();
        let namespaces = u128::from(!self.governance.is_empty());
        Ok(StoreResponse {
            owner: self.owner.clone(),
            stat: StoreStat::new(byte_size as u128, namespaces, self.governance.len() as u128),
        })
    }
}

#[derive(Debug, Default, Clone)]
struct Policy {
    grants: BTreeMap<String, BTreeSet<String>>,
    program: Option<String>,
}

/// Policy contracts keyed by address, granting fixed actions per DID.
#[derive(Debug, Default)]
pub struct InMemoryPolicyContract {
    policies: DashMap<String, Policy>,
}

impl InMemoryPolicyContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy an empty policy at `address`, granting nothing.
    pub fn deploy(&self, address: impl Into<String>) {
        self.policies.entry(address.into()).or_default();
    }

    /// Grant `actions` to `did` under the policy at `address`.
    pub fn grant<I, S>(&self, address: &str, did: &str, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = self.policies.entry(address.to_string()).or_default();
        policy
            .grants
            .entry(did.to_string())
            .or_default()
            .extend(actions.into_iter().map(Into::into));
    }

    /// Set the program source returned by `program_code`.
    pub fn set_program(&self, address: &str, source: impl Into<String>) {
        self.policies
            .entry(address.to_string())
            .or_default()
            .program = Some(source.into());
    }

    fn policy(&self, address: &str) -> Result<Policy, DataverseError> {
        self.policies
            .get(address)
            .map(|p| p.value().clone())
            .ok_or_else(|| DataverseError::Contract {
                address: address.to_string(),
                message: "contract not found".into(),
            })
    }
}

#[async_trait]
impl PolicyContract for InMemoryPolicyContract {
    async fn ask(&self, address: &str, query: &str) -> Result<AskResponse, DataverseError> {
        let policy = self.policy(address)?;
        let args = quoted_atoms(query);
        let granted = |did: &str| policy.grants.get(did).cloned().unwrap_or_default();

        if query.starts_with("tell_permitted_actions(") && args.len() == 1 {
            let list = granted(&args[0])
                .iter()
                .map(|a| format!("'{}'", a))
                .collect::<Vec<_>>()
                .join(",");
            return Ok(AskResponse::single("Actions", &format!("[{}]", list)));
        }

        if query.starts_with("tell(") && args.len() == 2 {
            let verdict = if granted(&args[0]).contains(&args[1]) {
                PERMITTED
            } else {
                PROHIBITED
            };
            return Ok(AskResponse::single("Result", verdict));
        }

        Err(DataverseError::Contract {
            address: address.to_string(),
            message: format!("unsupported query: {}", query),
        })
    }

    async fn program_code(&self, address: &str) -> Result<Option<String>, DataverseError> {
        Ok(self.policy(address)?.program.map(|src| STANDARD.encode(src)))
    }
}

/// Single-quoted atoms of a query, in order.
fn quoted_atoms(query: &str) -> Vec<String> {
    query
        .split('\'')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}
