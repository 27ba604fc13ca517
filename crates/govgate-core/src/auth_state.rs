use std::fmt;

use crate::error::CoreError;

/// The states an authentication attempt moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AuthState {
    /// Raw credential received, nothing verified yet.
    Unauthenticated,
    /// Credential signature, temporal and claim invariants hold.
    ClaimVerified,
    /// The credential targets this service.
    ServiceMatched,
    /// Permitted actions were resolved against the service governance.
    Authorized,
    /// An identity was produced. Final state.
    Identified,
    /// A step failed. Final state.
    Rejected,
}

impl AuthState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Identified | Self::Rejected)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::ClaimVerified => write!(f, "ClaimVerified"),
            Self::ServiceMatched => write!(f, "ServiceMatched"),
            Self::Authorized => write!(f, "Authorized"),
            Self::Identified => write!(f, "Identified"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Events that trigger authentication state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The auth claim was extracted from a verified credential.
    VerifyClaim,
    /// The claim's target service equals the proxy's service.
    MatchService,
    /// The governance returned the permitted action set.
    ResolveActions,
    /// The identity was assembled.
    Identify,
    /// Any step failed.
    Reject,
}

/// Drives an authentication attempt through its states.
///
/// Valid transitions:
/// - Unauthenticated → ClaimVerified (VerifyClaim)
/// - ClaimVerified → ServiceMatched (MatchService)
/// - ServiceMatched → Authorized (ResolveActions)
/// - Authorized → Identified (Identify)
/// - any non-final state → Rejected (Reject)
pub struct AuthStateMachine;

impl AuthStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(current: AuthState, event: AuthEvent) -> Result<AuthState, CoreError> {
        let new_state = match (current, event) {
            (AuthState::Unauthenticated, AuthEvent::VerifyClaim) => AuthState::ClaimVerified,
            (AuthState::ClaimVerified, AuthEvent::MatchService) => AuthState::ServiceMatched,
            (AuthState::ServiceMatched, AuthEvent::ResolveActions) => AuthState::Authorized,
            (AuthState::Authorized, AuthEvent::Identify) => AuthState::Identified,
            (state, AuthEvent::Reject) if !state.is_final() => AuthState::Rejected,
            _ => {
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    event,
                })
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "authentication state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: AuthState, event: AuthEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
