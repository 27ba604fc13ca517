use std::collections::BTreeSet;

/// An authenticated identity and the actions it was granted.
///
/// Only obtainable from [`AuthProxy::authenticate`](crate::AuthProxy::authenticate)
/// or [`SessionTokenIssuer::verify`](crate::SessionTokenIssuer::verify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
    actions: BTreeSet<String>,
}

impl Identity {
    pub(crate) fn new(subject: impl Into<String>, actions: BTreeSet<String>) -> Self {
        Self {
            subject: subject.into(),
            actions,
        }
    }

    /// DID of the identity.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorized_actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    /// Whether `action` is among the authorized actions.
    pub fn can(&self, action: &str) -> bool {
        self.actions.contains(action)
    }
}
