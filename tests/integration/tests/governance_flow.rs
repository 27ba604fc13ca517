//! Integration test: governance resolution and evaluation.
//!
//! Resources are linked to law-stone contracts through the triple store,
//! then queried for what a DID may do.

use govgate_core::DataverseConfig;
use govgate_dataverse::{
    governance_address_query, parse_list, CosmWasmClient, DataverseError, Governance,
    InMemoryTripleStore, LawStoneQuery, TripleStore,
};
use govgate_integration_tests::{Dataverse, COGNITARIUM};

const ALICE: &str = "did:key:zQ3shpoUHzwcgdt2gxjqHHnJnNkBVd4uX3ZBhmPiM7J93yqCr";
const BOB: &str = "did:key:z6MkpTHR8VNsBxYAAWHut2Geadd9jSwuBV8xRoAnwWsdvktH";
const RESOURCE: &str = "did:key:z6MkResource";
const GOV: &str = "axone1lawstone";

fn dataverse() -> Dataverse {
    let dataverse = Dataverse::new();
    dataverse
        .govern(RESOURCE, GOV)
        .grant(GOV, ALICE, &["read", "store"]);
    dataverse
}

#[tokio::test]
async fn test_resolve_strips_contract_scheme() {
    let governance = dataverse().governance();
    assert_eq!(
        governance.resolve_governance_address(RESOURCE).await.unwrap(),
        GOV
    );
}

#[tokio::test]
async fn test_resolve_unknown_resource() {
    let governance = dataverse().governance();
    assert!(matches!(
        governance.resolve_governance_address("did:key:z6MkNobody").await,
        Err(DataverseError::NoResult)
    ));
}

#[tokio::test]
async fn test_permitted_actions_per_did() {
    let governance = dataverse().governance();
    let address = governance.resolve_governance_address(RESOURCE).await.unwrap();

    let alice = governance.list_permitted_actions(&address, ALICE).await.unwrap();
    assert_eq!(
        alice.into_iter().collect::<Vec<_>>(),
        vec!["read".to_string(), "store".to_string()]
    );
    assert!(governance
        .list_permitted_actions(&address, BOB)
        .await
        .unwrap()
        .is_empty());

    assert!(governance.is_action_permitted(&address, ALICE, "read").await.unwrap());
    assert!(!governance.is_action_permitted(&address, ALICE, "delete").await.unwrap());
    assert!(!governance.is_action_permitted(&address, BOB, "read").await.unwrap());
}

#[tokio::test]
async fn test_grants_apply_without_reresolving() {
    let dataverse = dataverse();
    let governance = dataverse.governance();
    let address = governance.resolve_governance_address(RESOURCE).await.unwrap();
    assert!(!governance.is_action_permitted(&address, BOB, "read").await.unwrap());

    dataverse.grant(GOV, BOB, &["read"]);
    assert!(governance.is_action_permitted(&address, BOB, "read").await.unwrap());
}

#[tokio::test]
async fn test_governance_code() {
    let dataverse = dataverse();
    let governance = dataverse.governance();
    assert_eq!(governance.governance_code(GOV).await.unwrap(), "");

    let program = "permitted_actions(DID, [read]) :- true.";
    dataverse.contracts.set_program(GOV, program);
    assert_eq!(governance.governance_code(GOV).await.unwrap(), program);
}

#[tokio::test]
async fn test_cognitarium_info_counts_links() {
    let dataverse = dataverse();
    dataverse.govern("did:key:z6MkOther", GOV);
    let info = dataverse.governance().cognitarium_info().await.unwrap();
    assert_eq!(info.address, COGNITARIUM);
    assert_eq!(info.stat.triple_count, "2");
    assert_eq!(info.stat.namespace_count, "1");
}

#[tokio::test]
async fn test_resolution_query_shape() {
    let store = InMemoryTripleStore::new();
    store.set_governance(RESOURCE, "contract:law-stone:axone1direct");

    let query = governance_address_query(RESOURCE);
    assert_eq!(query.limit, Some(1));
    let response = store.select(COGNITARIUM, &query).await.unwrap();
    assert_eq!(response.results.bindings.len(), 1);
}

#[test]
fn test_prolog_lists() {
    let actions = parse_list("['read', store]");
    assert_eq!(
        actions.into_iter().collect::<Vec<_>>(),
        vec!["read".to_string(), "store".to_string()]
    );
    assert!(parse_list(" [] ").is_empty());
    assert!(parse_list("'read', store").is_empty());
}

#[test]
fn test_smart_query_url() {
    let client = CosmWasmClient::new(&DataverseConfig {
        rest_url: "https://api.testnet.example/".into(),
        ..Default::default()
    })
    .unwrap();
    let url = client
        .smart_query_url(GOV, &LawStoneQuery::ProgramCode {})
        .unwrap();
    let prefix = "https://api.testnet.example/cosmwasm/wasm/v1/contract/axone1lawstone/smart/";
    let encoded = url.strip_prefix(prefix).expect("smart query path");
    assert!(!encoded.is_empty());
    assert!(!encoded.contains('/') && !encoded.contains('+'));
}
