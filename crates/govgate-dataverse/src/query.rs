//! Cognitarium select query model and the governance lookup query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace of governance text credentials, bound to the `gov` prefix.
pub const GOVERNANCE_NAMESPACE: &str =
    "https://w3id.org/axone/ontology/v4/schema/credential/governance/text/";

pub const VC_BODY_SUBJECT: &str = "dataverse:credential:body#subject";
pub const VC_BODY_TYPE: &str = "dataverse:credential:body#type";
pub const VC_BODY_CLAIM: &str = "dataverse:credential:body#claim";

pub const GOV_TEXT_CREDENTIAL: &str = "gov:GovernanceTextCredential";
pub const GOV_IS_GOVERNED_BY: &str = "gov:isGovernedBy";
pub const GOV_FROM_GOVERNANCE: &str = "gov:fromGovernance";

/// Variable holding the governance contract IRI.
pub const CODE_VAR: &str = "code";

/// Message sent to the cognitarium contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitariumQuery {
    Select { query: SelectQuery },
    Store {},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub prefixes: Vec<Prefix>,
    pub select: Vec<SelectItem>,
    #[serde(rename = "where")]
    pub where_clause: WhereClause,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    pub prefix: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectItem {
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereClause {
    Bgp { patterns: Vec<TriplePattern> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: VarOrNode,
    pub predicate: VarOrNamedNode,
    pub object: VarOrNodeOrLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNode {
    Variable(String),
    Node(Node),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNamedNode {
    Variable(String),
    NamedNode(Iri),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNodeOrLiteral {
    Variable(String),
    Node(Node),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    NamedNode(Iri),
    BlankNode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iri {
    Prefixed(String),
    Full(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Simple(String),
    LanguageTaggedString { value: String, language: String },
    TypedValue { value: String, datatype: Iri },
}

/// Result of a select query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectResponse {
    pub head: Head,
    pub results: Results,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Head {
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Results {
    pub bindings: Vec<BTreeMap<String, BindingValue>>,
}

/// A bound RDF term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingValue {
    Uri {
        value: Iri,
    },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<Iri>,
    },
    BlankNode {
        value: String,
    },
}

impl BindingValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Uri { .. } => "uri",
            Self::Literal { .. } => "literal",
            Self::BlankNode { .. } => "blank_node",
        }
    }
}

fn var(name: &str) -> String {
    name.to_string()
}

fn named(iri: Iri) -> VarOrNamedNode {
    VarOrNamedNode::NamedNode(iri)
}

/// Query finding the governance contract of `resource`:
/// the `gov:fromGovernance` value of the governance node that a
/// governance text credential about `resource` claims it is governed by.
pub fn governance_address_query(resource: &str) -> SelectQuery {
    let cred = || VarOrNode::Variable(var("credId"));

    SelectQuery {
        prefixes: vec![Prefix {
            prefix: "gov".into(),
            namespace: GOVERNANCE_NAMESPACE.into(),
        }],
        select: vec![SelectItem::Variable(var(CODE_VAR))],
        where_clause: WhereClause::Bgp {
            patterns: vec![
                TriplePattern {
                    subject: cred(),
                    predicate: named(Iri::Full(VC_BODY_SUBJECT.into())),
                    object: VarOrNodeOrLiteral::Node(Node::NamedNode(Iri::Full(
                        resource.to_string(),
                    ))),
                },
                TriplePattern {
                    subject: cred(),
                    predicate: named(Iri::Full(VC_BODY_TYPE.into())),
                    object: VarOrNodeOrLiteral::Node(Node::NamedNode(Iri::Prefixed(
                        GOV_TEXT_CREDENTIAL.into(),
                    ))),
                },
                TriplePattern {
                    subject: cred(),
                    predicate: named(Iri::Full(VC_BODY_CLAIM.into())),
                    object: VarOrNodeOrLiteral::Variable(var("claim")),
                },
                TriplePattern {
                    subject: VarOrNode::Variable(var("claim")),
                    predicate: named(Iri::Prefixed(GOV_IS_GOVERNED_BY.into())),
                    object: VarOrNodeOrLiteral::Variable(var("gov")),
                },
                TriplePattern {
                    subject: VarOrNode::Variable(var("gov")),
                    predicate: named(Iri::Prefixed(GOV_FROM_GOVERNANCE.into())),
                    object: VarOrNodeOrLiteral::Variable(var(CODE_VAR)),
                },
            ],
        },
        limit: Some(1),
    }
}

/// The resource an instance of [`governance_address_query`] is about.
pub fn queried_resource(query: &SelectQuery) -> Option<&str> {
    let WhereClause::Bgp { patterns } = &query.where_clause;
    patterns.iter().find_map(|p| match (&p.predicate, &p.object) {
        (
            VarOrNamedNode::NamedNode(Iri::Full(pred)),
            VarOrNodeOrLiteral::Node(Node::NamedNode(Iri::Full(resource))),
        ) if pred == VC_BODY_SUBJECT => Some(resource.as_str()),
        _ => None,
    })
}
