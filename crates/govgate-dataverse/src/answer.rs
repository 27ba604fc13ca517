//! Law-stone query messages and the answer grammar.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Token returned by `tell/4` for an allowed action.
pub const PERMITTED: &str = "permitted";

/// Message sent to a law-stone contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawStoneQuery {
    Ask { query: String },
    ProgramCode {},
}

/// Response of an `ask` query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub answer: Option<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub results: Vec<PrologResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrologResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub variable: String,
    pub expression: String,
}

impl AskResponse {
    /// Response carrying one result bound to a single substitution.
    pub fn single(variable: &str, expression: &str) -> Self {
        Self {
            answer: Some(Answer {
                has_more: false,
                variables: vec![variable.to_string()],
                results: vec![PrologResult {
                    error: None,
                    substitutions: vec![Substitution {
                        variable: variable.to_string(),
                        expression: expression.to_string(),
                    }],
                }],
            }),
            ..Default::default()
        }
    }

    /// The expression of the only substitution of the only result.
    ///
    /// Anything else, including no answer at all, is `None`.
    pub fn sole_expression(&self) -> Option<&str> {
        let answer = self.answer.as_ref()?;
        match answer.results.as_slice() {
            [result] => match result.substitutions.as_slice() {
                [sub] => Some(sub.expression.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `tell_permitted_actions('<did>',Actions).`
pub fn permitted_actions_query(did: &str) -> String {
    format!("tell_permitted_actions('{}',Actions).", did)
}

/// `tell('<did>','<action>',Result,_).`
pub fn tell_action_query(did: &str, action: &str) -> String {
    format!("tell('{}','{}',Result,_).", did, action)
}

/// Parse a Prolog list of atoms into a set.
///
/// Atoms may be single-quoted or bare: `['read',store]`. Anything that is
/// not a bracketed list, such as an unbound variable, yields no atoms.
pub fn parse_list(expression: &str) -> BTreeSet<String> {
    let Some(inner) = expression
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    else {
        return BTreeSet::new();
    };

    inner
        .split(',')
        .map(|atom| atom.trim().trim_matches('\'').trim())
        .filter(|atom| !atom.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a `tell/4` result expression grants the action.
pub fn is_permitted(expression: &str) -> bool {
    expression == PERMITTED
}
