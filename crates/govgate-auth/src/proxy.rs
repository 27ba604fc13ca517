use std::sync::Arc;

use govgate_core::{AuthEvent, AuthState, AuthStateMachine};
use govgate_credentials::{AuthClaim, ClaimParser};
use govgate_dataverse::Governance;

use crate::error::AuthError;
use crate::identity::Identity;

/// Entry point of a service: authenticates identities from credentials and
/// resolves what the service governance lets them do.
///
/// It does not know about transports or tokens.
pub struct AuthProxy {
    service_did: String,
    governance_address: String,
    parser: Arc<dyn ClaimParser<Claim = AuthClaim>>,
    governance: Arc<dyn Governance>,
}

impl AuthProxy {
    /// Create a proxy for `service_did`, resolving its governance address.
    pub async fn new(
        service_did: impl Into<String>,
        parser: Arc<dyn ClaimParser<Claim = AuthClaim>>,
        governance: Arc<dyn Governance>,
    ) -> Result<Self, AuthError> {
        let service_did = service_did.into();
        let governance_address = governance.resolve_governance_address(&service_did).await?;
        tracing::info!(
            service = %service_did,
            governance = %governance_address,
            "service governance resolved"
        );
        Ok(Self::with_governance_address(
            service_did,
            governance_address,
            parser,
            governance,
        ))
    }

    /// Create a proxy with an already known governance address.
    pub fn with_governance_address(
        service_did: impl Into<String>,
        governance_address: impl Into<String>,
        parser: Arc<dyn ClaimParser<Claim = AuthClaim>>,
        governance: Arc<dyn Governance>,
    ) -> Self {
        Self {
            service_did: service_did.into(),
            governance_address: governance_address.into(),
            parser,
            governance,
        }
    }

    pub fn service_did(&self) -> &str {
        &self.service_did
    }

    pub fn governance_address(&self) -> &str {
        &self.governance_address
    }

    /// Verify `credential` and resolve the identity it authenticates.
    pub async fn authenticate(&self, credential: &[u8]) -> Result<Identity, AuthError> {
        let mut state = AuthState::Unauthenticated;
        match self.advance(credential, &mut state).await {
            Ok(identity) => {
                tracing::info!(
                    did = %identity.subject(),
                    actions = identity.authorized_actions().len(),
                    "identity authenticated"
                );
                Ok(identity)
            }
            Err(e) => {
                AuthStateMachine::transition(state, AuthEvent::Reject)?;
                tracing::warn!(
                    service = %self.service_did,
                    state = %state,
                    error = %e,
                    "authentication rejected"
                );
                Err(e)
            }
        }
    }

    async fn advance(&self, credential: &[u8], state: &mut AuthState) -> Result<Identity, AuthError> {
        let claim = self.parser.parse_signed(credential)?;
        *state = AuthStateMachine::transition(*state, AuthEvent::VerifyClaim)?;

        if claim.target_service != self.service_did {
            return Err(AuthError::ServiceMismatch {
                service: self.service_did.clone(),
                target: claim.target_service,
            });
        }
        *state = AuthStateMachine::transition(*state, AuthEvent::MatchService)?;

        let actions = self
            .governance
            .list_permitted_actions(&self.governance_address, &claim.subject_id)
            .await?;
        *state = AuthStateMachine::transition(*state, AuthEvent::ResolveActions)?;

        let identity = Identity::new(claim.subject_id, actions);
        *state = AuthStateMachine::transition(*state, AuthEvent::Identify)?;
        Ok(identity)
    }
}
