use std::sync::Arc;

use govgate_dataverse::Governance;

use crate::error::AuthError;
use crate::identity::Identity;

/// Authorizes actions of an identity on individual resources.
pub struct ResourceGuard {
    governance: Arc<dyn Governance>,
}

impl ResourceGuard {
    pub fn new(governance: Arc<dyn Governance>) -> Self {
        Self { governance }
    }

    /// Check that `identity` may perform `action` on `resource_did`.
    ///
    /// The action must have been granted by the service governance at
    /// authentication time, and the resource's own governance (resolved
    /// on every call) must permit it.
    pub async fn authorize(
        &self,
        identity: &Identity,
        resource_did: &str,
        action: &str,
    ) -> Result<(), AuthError> {
        let deny = || AuthError::Unauthorized {
            did: identity.subject().to_string(),
            action: action.to_string(),
            resource: resource_did.to_string(),
        };

        if !identity.can(action) {
            tracing::warn!(did = %identity.subject(), action, resource = resource_did, "action not granted by service governance");
            return Err(deny());
        }

        let address = self
            .governance
            .resolve_governance_address(resource_did)
            .await?;
        if !self
            .governance
            .is_action_permitted(&address, identity.subject(), action)
            .await?
        {
            tracing::warn!(did = %identity.subject(), action, resource = resource_did, governance = %address, "action prohibited by resource governance");
            return Err(deny());
        }

        tracing::debug!(did = %identity.subject(), action, resource = resource_did, "action authorized");
        Ok(())
    }
}
