use crate::auth_state::{AuthEvent, AuthState};

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid authentication transition from {from} on {event:?}")]
    InvalidStateTransition { from: AuthState, event: AuthEvent },

    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
