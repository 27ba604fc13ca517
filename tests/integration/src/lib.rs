//! Fixtures shared by the cross-crate flows: an in-memory dataverse with
//! governed resources, and signed authentication credentials.

use std::sync::Arc;

use govgate_credentials::{AuthCredentialBuilder, AuthCredentialConfig};
use govgate_crypto::KeyPair;
use govgate_dataverse::{GovernanceClient, InMemoryPolicyContract, InMemoryTripleStore};

pub const COGNITARIUM: &str = "axone1cognitarium";

/// A triple store and a set of law-stone contracts, both in memory.
#[derive(Default)]
pub struct Dataverse {
    pub store: Arc<InMemoryTripleStore>,
    pub contracts: Arc<InMemoryPolicyContract>,
}

impl Dataverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a contract at `address` and record it as the governance of `resource`.
    pub fn govern(&self, resource: &str, address: &str) -> &Self {
        self.contracts.deploy(address);
        self.store
            .set_governance(resource, format!("contract:law-stone:{}", address));
        self
    }

    pub fn grant(&self, address: &str, did: &str, actions: &[&str]) -> &Self {
        self.contracts.grant(address, did, actions.iter().copied());
        self
    }

    pub fn governance(&self) -> Arc<GovernanceClient> {
        Arc::new(GovernanceClient::new(
            self.store.clone(),
            self.contracts.clone(),
            COGNITARIUM,
        ))
    }
}

/// A signed authentication credential from `keypair` for `service`.
pub fn auth_credential(keypair: &KeyPair, service: &str) -> Vec<u8> {
    auth_credential_with(
        keypair,
        AuthCredentialConfig {
            to_service: service.into(),
            ..Default::default()
        },
    )
}

pub fn auth_credential_with(keypair: &KeyPair, config: AuthCredentialConfig) -> Vec<u8> {
    AuthCredentialBuilder::new(config)
        .sign_to_vec(keypair)
        .expect("fixture credential must sign")
}
